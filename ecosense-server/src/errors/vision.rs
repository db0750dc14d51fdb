#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vision service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unreadable vision response: {0}")]
    InvalidResponse(String),

    #[error("Failed to fetch image: {0}")]
    Image(String),
}

impl VisionError {
    /// Whether the failure is the remote service throttling us (HTTP 429).
    pub fn is_quota_exceeded(&self) -> bool {
        match self {
            VisionError::QuotaExceeded(_) => true,
            VisionError::Status { status, .. } => *status == 429,
            VisionError::Http(e) => e.status().is_some_and(|s| s.as_u16() == 429),
            VisionError::InvalidResponse(_) | VisionError::Image(_) => false,
        }
    }
}
