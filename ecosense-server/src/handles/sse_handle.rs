use std::convert::Infallible;

use axum::extract::State;
use axum::response::Sse;
use axum::response::sse::{Event, KeepAlive};
use ecosense_api::models::{ActivityLogEntry, EnergySample, Id, RateLimitState, Room};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::Sender;
use tokio_stream::StreamExt;
use tokio_stream::{Stream, wrappers};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServiceEvent {
    RoomUpdate(Room),
    Activity(ActivityLogEntry),
    Telemetry(EnergySample),
    RateLimit(RateLimitState),
    AutoCycle { enabled: bool },
    CameraBinding { room_id: Option<Id> },
}

impl ServiceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServiceEvent::RoomUpdate(_) => "room_update",
            ServiceEvent::Activity(_) => "activity",
            ServiceEvent::Telemetry(_) => "telemetry",
            ServiceEvent::RateLimit(_) => "rate_limit",
            ServiceEvent::AutoCycle { .. } => "auto_cycle",
            ServiceEvent::CameraBinding { .. } => "camera_binding",
        }
    }
}

#[derive(Clone)]
pub struct SSEState {
    pub sender: Sender<ServiceEvent>,
}

pub async fn sse_handler(
    State(state): State<SSEState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.sender.subscribe();

    let stream = wrappers::BroadcastStream::new(receiver).filter_map(|result| match result {
        Ok(event) => Event::default()
            .event(event.name())
            .json_data(&event)
            .ok()
            .map(Ok),
        // Lagged receivers skip what they missed.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
