use axum::http::StatusCode;

/// A pushed camera frame that cannot be used as a JPEG payload.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("Frame is empty")]
    Empty,

    #[error("Frame is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

impl FrameError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FrameError::Empty | FrameError::InvalidBase64(_) => StatusCode::BAD_REQUEST,
        }
    }
}
