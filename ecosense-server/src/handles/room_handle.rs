use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use ecosense_api::models::Room;

use crate::errors::ApiError;
use crate::services::{AnalysisService, AnalyzeOutcome, RoomService};

#[derive(Clone)]
pub struct RoomState {
    pub room_service: Arc<RoomService>,
    pub analysis_service: Arc<AnalysisService>,
}

pub fn room_router(room_state: RoomState) -> Router {
    Router::new()
        .route("/rooms", get(get_rooms))
        .route("/rooms/:room_id", get(get_room_by_id))
        .route("/rooms/:room_id/analyze", post(analyze_room))
        .with_state(room_state)
}

pub async fn get_rooms(State(state): State<RoomState>) -> Json<Vec<Room>> {
    Json(state.room_service.list().await)
}

pub async fn get_room_by_id(
    State(state): State<RoomState>,
    Path(room_id): Path<String>,
) -> Result<Json<Room>, ApiError> {
    let room = state.room_service.get(&room_id).await?;

    Ok(Json(room))
}

/// Runs one analysis and waits for it to settle.
pub async fn analyze_room(
    State(state): State<RoomState>,
    Path(room_id): Path<String>,
) -> Result<Json<AnalyzeOutcome>, ApiError> {
    let outcome = state.analysis_service.analyze(&room_id).await?;

    Ok(Json(outcome))
}
