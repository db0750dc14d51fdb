use serde::{Deserialize, Serialize};

use super::{Id, RateLimitState, SavingsLedger, Theme};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    /// Remote analysis throttling banner
    pub rate_limit: RateLimitState,
    /// Draw of every powered device, in watts
    pub grid_load_watts: u32,
    /// Whether the grid load is above the high watermark
    pub grid_load_high: bool,
    pub savings: SavingsLedger,
    pub auto_cycle: bool,
    /// Room the live camera is bound to
    pub camera_room: Option<Id>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoCycleRequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraBindingRequest {
    pub room_id: Option<Id>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRequest {
    /// Base64 JPEG, optionally as a `data:` URL
    pub frame: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureErrorRequest {
    /// Platform error name, e.g. `NotAllowedError`
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeBody {
    pub theme: Theme,
}
