use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use ecosense_api::models::{ActivityLogEntry, EnergySample};

use crate::services::{ActivityService, TelemetryService};

#[derive(Clone)]
pub struct TelemetryState {
    pub telemetry_service: Arc<TelemetryService>,
    pub activity_service: Arc<ActivityService>,
}

pub fn telemetry_router(telemetry_state: TelemetryState) -> Router {
    Router::new()
        .route("/telemetry", get(get_telemetry))
        .route("/activity", get(get_activity))
        .with_state(telemetry_state)
}

/// Energy samples, oldest first.
pub async fn get_telemetry(State(state): State<TelemetryState>) -> Json<Vec<EnergySample>> {
    Json(state.telemetry_service.samples().await)
}

/// Activity entries, newest first.
pub async fn get_activity(State(state): State<TelemetryState>) -> Json<Vec<ActivityLogEntry>> {
    Json(state.activity_service.entries().await)
}
