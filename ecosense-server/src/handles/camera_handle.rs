use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use ecosense_api::models::{CaptureErrorRequest, FrameRequest};

use crate::errors::ApiError;
use crate::services::{CameraFeed, CameraStatus};

#[derive(Clone)]
pub struct CameraState {
    pub camera_feed: Arc<CameraFeed>,
}

pub fn camera_router(camera_state: CameraState) -> Router {
    Router::new()
        .route("/camera", get(get_camera))
        .route("/camera/frame", post(push_frame).delete(end_session))
        .route("/camera/error", post(report_error))
        .with_state(camera_state)
}

pub async fn get_camera(State(state): State<CameraState>) -> Json<CameraStatus> {
    Json(state.camera_feed.status())
}

pub async fn push_frame(
    State(state): State<CameraState>,
    Json(body): Json<FrameRequest>,
) -> Result<Json<CameraStatus>, ApiError> {
    state.camera_feed.push_frame(&body.frame)?;

    Ok(Json(state.camera_feed.status()))
}

pub async fn end_session(State(state): State<CameraState>) -> Json<CameraStatus> {
    state.camera_feed.end_session();

    Json(state.camera_feed.status())
}

pub async fn report_error(
    State(state): State<CameraState>,
    Json(body): Json<CaptureErrorRequest>,
) -> Json<CameraStatus> {
    state.camera_feed.report_error(&body.name);

    Json(state.camera_feed.status())
}
