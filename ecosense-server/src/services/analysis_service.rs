use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use ecosense_analyser::{Observation, OccupancyDetector, evaluate};
use ecosense_api::models::{AnalysisResult, Id, Room, Severity};
use serde::Serialize;

use crate::errors::RoomError;
use crate::services::activity_service::ActivityService;
use crate::services::camera_service::FrameSource;
use crate::services::rate_limit_service::RateLimitService;
use crate::services::room_service::{ApplyOutcome, RoomService};
use crate::services::vision_service::{ImageSource, VisionRequest, VisionService};

pub const SYSTEM_ROOM: &str = "System";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalyzeOutcome {
    Completed {
        room: Room,
        result: AnalysisResult,
        source: ResultSource,
    },
    /// An analysis of the room was already running.
    Skipped,
    /// The remote service reported its quota exhausted; local override is now active.
    Throttled,
    Failed { reason: String },
}

type InFlight = Arc<Mutex<HashSet<Id>>>;

/// Holds a room's slot in the in-flight set and frees it when dropped.
struct InFlightGuard {
    in_flight: InFlight,
    room_id: Id,
}

impl InFlightGuard {
    fn acquire(in_flight: &InFlight, room_id: &str) -> Option<Self> {
        if !lock(in_flight).insert(room_id.to_string()) {
            return None;
        }

        Some(Self {
            in_flight: Arc::clone(in_flight),
            room_id: room_id.to_string(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.room_id);
    }
}

fn lock(in_flight: &InFlight) -> MutexGuard<'_, HashSet<Id>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Coordinates per-room analyses: at most one per room, remote when possible and local rules
/// while the remote service is throttling.
pub struct AnalysisService {
    rooms: Arc<RoomService>,
    rate_limit: Arc<RateLimitService>,
    activity: Arc<ActivityService>,
    vision: Arc<dyn VisionService>,
    detector: Arc<dyn OccupancyDetector>,
    frames: Arc<dyn FrameSource>,
    fallback_delay: Duration,
    in_flight: InFlight,
}

impl AnalysisService {
    pub fn new(
        rooms: &Arc<RoomService>,
        rate_limit: &Arc<RateLimitService>,
        activity: &Arc<ActivityService>,
        vision: Arc<dyn VisionService>,
        detector: Arc<dyn OccupancyDetector>,
        frames: Arc<dyn FrameSource>,
        fallback_delay: Duration,
    ) -> Self {
        Self {
            rooms: Arc::clone(rooms),
            rate_limit: Arc::clone(rate_limit),
            activity: Arc::clone(activity),
            vision,
            detector,
            frames,
            fallback_delay,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn is_in_flight(&self, room_id: &str) -> bool {
        lock(&self.in_flight).contains(room_id)
    }

    pub async fn analyze(&self, room_id: &str) -> Result<AnalyzeOutcome, RoomError> {
        let room = self.rooms.get(room_id).await?;

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, room_id) else {
            tracing::debug!("analysis of {} already in flight", room_id);
            return Ok(AnalyzeOutcome::Skipped);
        };

        if self.rate_limit.is_throttled().await {
            let result = self.fallback(&room).await;
            return self.complete(&room, result, ResultSource::Fallback).await;
        }

        let request = self.request_for(&room).await;
        tracing::debug!("dispatching analysis of {}", room.id);

        match self.vision.analyze(request).await {
            Ok(result) => self.complete(&room, result, ResultSource::Remote).await,
            Err(e) if e.is_quota_exceeded() => {
                self.rate_limit.trip().await;
                self.activity
                    .push(SYSTEM_ROOM, "Traffic Warning: Local Override Active", Severity::Warning)
                    .await;
                Ok(AnalyzeOutcome::Throttled)
            }
            Err(e) => {
                tracing::warn!("analysis of {} failed: {}", room.id, e);
                Ok(AnalyzeOutcome::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn fallback(&self, room: &Room) -> AnalysisResult {
        tokio::time::sleep(self.fallback_delay).await;

        let detection = self.detector.detect();
        tracing::debug!("local override for {}: {:?}", room.id, detection);

        evaluate(&Observation {
            occupied: detection.occupied,
            person_count: detection.person_count,
            temperature: room.temperature,
            brightness: room.brightness,
        })
    }

    async fn request_for(&self, room: &Room) -> VisionRequest {
        let live_frame = if self.rooms.camera_room().await.as_deref() == Some(room.id.as_str()) {
            self.frames.capture_frame()
        } else {
            None
        };

        VisionRequest {
            image: match live_frame {
                Some(frame) => ImageSource::Inline(frame),
                None => ImageSource::Url(room.image_url.clone()),
            },
            temperature: room.temperature.round() as i32,
            brightness: room.brightness.round() as i32,
        }
    }

    async fn complete(
        &self,
        room: &Room,
        result: AnalysisResult,
        source: ResultSource,
    ) -> Result<AnalyzeOutcome, RoomError> {
        let result = result.normalized();
        let outcome = self.rooms.apply(&room.id, &result).await?;
        self.log_outcome(&outcome, &result).await;

        Ok(AnalyzeOutcome::Completed {
            room: outcome.room,
            result,
            source,
        })
    }

    async fn log_outcome(&self, outcome: &ApplyOutcome, result: &AnalysisResult) {
        let name = outcome.room.name.as_str();

        if outcome.is_eco_lock() {
            self.activity
                .push(name, "Eco-Lock: Node Secure. High-Power Assets Terminated.", Severity::Success)
                .await;
        } else if result.occupied {
            self.activity
                .push(
                    name,
                    format!(
                        "Optimized: {} Detected. Temp: {}°C.",
                        result.person_count, outcome.previous.temperature
                    ),
                    Severity::Info,
                )
                .await;
        } else {
            self.activity
                .push(name, "Standby: Node Vacant. No Active Assets.", Severity::Info)
                .await;
        }
    }
}
