use serde::{Deserialize, Serialize};

use super::MAX_FAN_SPEED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn is_on(self) -> bool {
        self == Switch::On
    }
}

impl From<bool> for Switch {
    fn from(value: bool) -> Self {
        if value { Switch::On } else { Switch::Off }
    }
}

/// Occupancy and device recommendations for one room.
///
/// The field names on the wire are the ones the remote vision model is asked to produce, so the
/// same type is used for the request schema, the parsed response and the local fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Whether anyone is in the room
    pub occupied: bool,
    /// Number of people detected
    pub person_count: u32,
    /// Lighting recommendation
    pub light_recommendation: Switch,
    /// Fan recommendation
    pub fan_recommendation: Switch,
    /// Fan speed step (0-5), zero whenever the fan is off
    pub fan_speed: u8,
    /// Air conditioning recommendation
    pub ac_recommendation: Switch,
    /// Set point in Celsius, applied only when the AC is turned on
    pub target_temp: f32,
}

impl AnalysisResult {
    /// Clamps the fan speed into range and zeroes it when the fan is off.
    pub fn normalized(mut self) -> Self {
        self.fan_speed = if self.fan_recommendation.is_on() {
            self.fan_speed.min(MAX_FAN_SPEED)
        } else {
            0
        };

        self
    }
}
