use std::sync::{Mutex, MutexGuard, PoisonError};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use time::OffsetDateTime;

use crate::errors::{CaptureError, FrameError};
use crate::services::clock;

/// Something that can hand over the latest camera frame as base64 JPEG.
pub trait FrameSource: Send + Sync {
    fn capture_frame(&self) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureFault {
    pub kind: CaptureError,
    pub title: &'static str,
    pub message: &'static str,
}

impl From<CaptureError> for CaptureFault {
    fn from(kind: CaptureError) -> Self {
        Self {
            kind,
            title: kind.title(),
            message: kind.message(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraStatus {
    pub active: bool,
    pub error: Option<CaptureFault>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Default)]
struct Uplink {
    frame: Option<String>,
    error: Option<CaptureError>,
    updated_at: Option<OffsetDateTime>,
}

/// Uplink slot that a capturing client keeps filled with its latest frame.
#[derive(Debug, Default)]
pub struct CameraFeed {
    uplink: Mutex<Uplink>,
}

impl CameraFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a frame, given as plain base64 or as a `data:` URL. A valid frame clears any
    /// previously reported error.
    pub fn push_frame(&self, frame: &str) -> Result<(), FrameError> {
        let data = match frame.split_once(";base64,") {
            Some((prefix, data)) if prefix.starts_with("data:") => data,
            _ => frame,
        }
        .trim();

        if data.is_empty() {
            return Err(FrameError::Empty);
        }
        STANDARD.decode(data)?;

        let mut uplink = self.lock();
        uplink.frame = Some(data.to_string());
        uplink.error = None;
        uplink.updated_at = Some(clock::now());

        Ok(())
    }

    pub fn end_session(&self) {
        let mut uplink = self.lock();
        uplink.frame = None;
        uplink.updated_at = Some(clock::now());

        tracing::info!("camera session ended");
    }

    /// Records an acquisition failure by its platform error name and ends the session.
    pub fn report_error(&self, name: &str) -> CaptureError {
        let kind = CaptureError::classify(name);

        let mut uplink = self.lock();
        uplink.frame = None;
        uplink.error = Some(kind);
        uplink.updated_at = Some(clock::now());

        tracing::warn!("camera uplink failed with {}: {}", name, kind);

        kind
    }

    pub fn status(&self) -> CameraStatus {
        let uplink = self.lock();

        CameraStatus {
            active: uplink.frame.is_some(),
            error: uplink.error.map(CaptureFault::from),
            updated_at: uplink.updated_at,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Uplink> {
        self.uplink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FrameSource for CameraFeed {
    fn capture_frame(&self) -> Option<String> {
        self.lock().frame.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_frame_strips_data_url() {
        let feed = CameraFeed::new();
        assert_eq!(feed.capture_frame(), None);

        feed.push_frame("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(feed.capture_frame().as_deref(), Some("aGVsbG8="));
        assert!(feed.status().active);
    }

    #[test]
    fn test_push_frame_rejects_garbage() {
        let feed = CameraFeed::new();
        assert!(matches!(
            feed.push_frame("not base64!"),
            Err(FrameError::InvalidBase64(_))
        ));
        assert!(matches!(feed.push_frame("data:image/jpeg;base64,"), Err(FrameError::Empty)));
        assert_eq!(feed.capture_frame(), None);
    }

    #[test]
    fn test_report_error_ends_session() {
        let feed = CameraFeed::new();
        feed.push_frame("aGVsbG8=").unwrap();

        assert_eq!(feed.report_error("NotReadableError"), CaptureError::HardwareBusy);

        let status = feed.status();
        assert!(!status.active);
        assert_eq!(status.error.as_ref().map(|e| e.title), Some("Node Conflict"));
        assert_eq!(feed.capture_frame(), None);

        // Retrying with a fresh frame clears the fault.
        feed.push_frame("aGVsbG8=").unwrap();
        assert_eq!(feed.status().error, None);
    }
}
