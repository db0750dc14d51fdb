pub mod api;
pub mod capture;
pub mod config;
pub mod frame;
pub mod preference;
pub mod room;
pub mod vision;

pub use api::ApiError;
pub use capture::CaptureError;
pub use config::ConfigError;
pub use frame::FrameError;
pub use preference::PreferenceError;
pub use room::RoomError;
pub use vision::VisionError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, error_id) = match self {
            ApiError::RoomError(e) => (e.status_code(), e.to_string(), None),
            ApiError::FrameError(e) => (e.status_code(), e.to_string(), None),
            ApiError::PreferenceError(e) => {
                let error_id = Uuid::new_v4();
                tracing::error!(error_id = ?error_id, "Preference error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(error_id.to_string()),
                )
            }
        };

        let mut error_obj = json!({
            "code": status.as_u16(),
            "message": error_message
        });

        if let Some(error_id) = error_id {
            error_obj["error_id"] = json!(error_id);
        }

        (status, Json(json!({ "error": error_obj }))).into_response()
    }
}
