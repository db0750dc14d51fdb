use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{Device, Id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoomStatus {
    Occupied,
    Empty,
}

impl From<bool> for RoomStatus {
    fn from(occupied: bool) -> Self {
        if occupied { RoomStatus::Occupied } else { RoomStatus::Empty }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier
    pub id: Id,
    /// Display name
    pub name: String,
    /// Last detected occupancy
    pub status: RoomStatus,
    /// Last detected head count
    pub occupancy_count: u32,
    /// Ambient temperature in Celsius
    pub temperature: f32,
    /// Ambient brightness (0-100)
    pub brightness: f32,
    /// Devices installed in the room
    pub devices: Vec<Device>,
    /// Still image analysed when no live frame is available
    pub image_url: String,
    /// Time the room was last updated
    #[serde(with = "time::serde::rfc3339")]
    pub last_update: OffsetDateTime,
}

impl Room {
    pub fn is_empty(&self) -> bool {
        self.status == RoomStatus::Empty
    }

    pub fn has_active_devices(&self) -> bool {
        self.devices.iter().any(|d| d.is_on)
    }

    /// Total draw of powered devices in watts.
    pub fn active_watts(&self) -> u32 {
        self.devices.iter().map(Device::active_watts).sum()
    }

    /// Total rating of unpowered devices in watts.
    pub fn idle_watts(&self) -> u32 {
        self.devices.iter().map(Device::idle_watts).sum()
    }
}
