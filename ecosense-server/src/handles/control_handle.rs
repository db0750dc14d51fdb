use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, put};
use axum::{Json, Router};
use ecosense_api::models::{AutoCycleRequest, CameraBindingRequest, SystemStatus};

use crate::errors::ApiError;
use crate::services::room_service::HIGH_GRID_LOAD_WATTS;
use crate::services::{AutoCycleService, RateLimitService, RoomService};

#[derive(Clone)]
pub struct ControlState {
    pub room_service: Arc<RoomService>,
    pub rate_limit_service: Arc<RateLimitService>,
    pub auto_cycle_service: Arc<AutoCycleService>,
}

pub fn control_router(control_state: ControlState) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/control/auto-cycle", put(set_auto_cycle))
        .route("/control/camera", put(bind_camera))
        .with_state(control_state)
}

async fn system_status(state: &ControlState) -> SystemStatus {
    let grid_load_watts = state.room_service.grid_load_watts().await;

    SystemStatus {
        rate_limit: state.rate_limit_service.snapshot().await,
        grid_load_watts,
        grid_load_high: grid_load_watts > HIGH_GRID_LOAD_WATTS,
        savings: state.room_service.savings().await,
        auto_cycle: state.auto_cycle_service.is_enabled(),
        camera_room: state.room_service.camera_room().await,
    }
}

pub async fn get_status(State(state): State<ControlState>) -> Json<SystemStatus> {
    Json(system_status(&state).await)
}

pub async fn set_auto_cycle(
    State(state): State<ControlState>,
    Json(body): Json<AutoCycleRequest>,
) -> Json<SystemStatus> {
    state.auto_cycle_service.set_enabled(body.enabled);

    Json(system_status(&state).await)
}

pub async fn bind_camera(
    State(state): State<ControlState>,
    Json(body): Json<CameraBindingRequest>,
) -> Result<Json<SystemStatus>, ApiError> {
    state.room_service.bind_camera(body.room_id).await?;

    Ok(Json(system_status(&state).await))
}
