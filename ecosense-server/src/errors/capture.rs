use serde::{Deserialize, Serialize};

/// Why the camera uplink could not be established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaptureError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("No camera detected")]
    HardwareMissing,

    #[error("Camera is in use by another process")]
    HardwareBusy,

    #[error("Camera link failure")]
    Link,
}

impl CaptureError {
    /// Maps a media-capture error name, as reported by the capturing client, to a category.
    pub fn classify(name: &str) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" => CaptureError::PermissionDenied,
            "NotFoundError" | "DevicesNotFoundError" => CaptureError::HardwareMissing,
            "NotReadableError" | "TrackStartError" => CaptureError::HardwareBusy,
            _ => CaptureError::Link,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CaptureError::PermissionDenied => "Access Restricted",
            CaptureError::HardwareMissing => "Hardware Missing",
            CaptureError::HardwareBusy => "Node Conflict",
            CaptureError::Link => "Link Error",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            CaptureError::PermissionDenied => {
                "Camera permission denied. Enable camera access to give the vision system a live feed."
            }
            CaptureError::HardwareMissing => {
                "No imaging device detected. Connect a compatible camera to the node."
            }
            CaptureError::HardwareBusy => {
                "The camera is reserved by another process. Close other applications using the video feed."
            }
            CaptureError::Link => {
                "Unable to establish the video uplink. Check the hardware connection."
            }
        }
    }
}
