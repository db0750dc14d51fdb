use super::{FrameError, PreferenceError, RoomError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Room error: {0}")]
    RoomError(#[from] RoomError),

    #[error("Frame error: {0}")]
    FrameError(#[from] FrameError),

    #[error("Preference error: {0}")]
    PreferenceError(#[from] PreferenceError),
}
