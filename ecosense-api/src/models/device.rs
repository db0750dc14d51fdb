use serde::{Deserialize, Serialize};

use super::Id;

/// Highest speed step a fan accepts.
pub const MAX_FAN_SPEED: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceType {
    /// Room lighting
    Light,
    /// Air conditioning unit
    Ac,
    /// Ceiling, wall or exhaust fan
    Fan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Device identifier
    pub id: Id,
    /// Display name
    pub name: String,
    /// Device category
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    /// Whether the device is currently powered
    pub is_on: bool,
    /// Rated power draw in watts
    pub power_watts: u32,
    /// Speed step (0-5), fans only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<u8>,
}

impl Device {
    /// Power drawn right now in watts.
    pub fn active_watts(&self) -> u32 {
        if self.is_on { self.power_watts } else { 0 }
    }

    /// Power avoided right now in watts.
    pub fn idle_watts(&self) -> u32 {
        if self.is_on { 0 } else { self.power_watts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_type_wire_names() {
        assert_eq!(serde_json::to_string(&DeviceType::Ac).unwrap(), "\"AC\"");
        assert_eq!(
            serde_json::from_str::<DeviceType>("\"LIGHT\"").unwrap(),
            DeviceType::Light
        );
    }

    #[test]
    fn test_active_and_idle_watts() {
        let mut fan = Device {
            id: "101-f1".to_string(),
            name: "Ceiling Fan 1".to_string(),
            device_type: DeviceType::Fan,
            is_on: false,
            power_watts: 75,
            speed: Some(0),
        };

        assert_eq!(fan.active_watts(), 0);
        assert_eq!(fan.idle_watts(), 75);

        fan.is_on = true;
        assert_eq!(fan.active_watts(), 75);
        assert_eq!(fan.idle_watts(), 0);
    }
}
