use ecosense_api::models::{AnalysisResult, DeviceType, Id, Room, RoomStatus, SavingsLedger};
use tokio::sync::RwLock;
use tokio::sync::broadcast::Sender;

use crate::configs::RoomSeed;
use crate::errors::RoomError;
use crate::handles::sse_handle::ServiceEvent;
use crate::services::clock;

pub const INITIAL_SAVED_KWH: f64 = 142.5;
pub const CO2_KG_PER_KWH: f64 = 0.4;
pub const HIGH_GRID_LOAD_WATTS: u32 = 4000;

/// Share of the power switched off in a freed room that is credited to the savings ledger.
const SAVINGS_CREDIT_RATIO: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub previous: Room,
    pub room: Room,
    /// Power of devices that were on before and are off now, in kW.
    pub terminated_kw: f64,
}

impl ApplyOutcome {
    /// The room emptied out and its powered devices were shut down.
    pub fn is_eco_lock(&self) -> bool {
        self.room.is_empty() && self.previous.has_active_devices()
    }
}

/// Applies a recommendation to a single room and returns the power it switched off, in watts.
pub fn apply_result(room: &mut Room, result: &AnalysisResult) -> u32 {
    let mut terminated = 0;

    for device in room.devices.iter_mut() {
        let was_on = device.is_on;

        match device.device_type {
            DeviceType::Light => device.is_on = result.light_recommendation.is_on(),
            DeviceType::Ac => device.is_on = result.ac_recommendation.is_on(),
            DeviceType::Fan => {
                device.is_on = result.fan_recommendation.is_on();
                device.speed = Some(if device.is_on { result.fan_speed } else { 0 });
            }
        }

        if was_on && !device.is_on {
            terminated += device.power_watts;
        }
    }

    room.status = RoomStatus::from(result.occupied);
    room.occupancy_count = result.person_count;
    if result.ac_recommendation.is_on() {
        room.temperature = result.target_temp;
    }
    room.last_update = clock::now();

    terminated
}

#[derive(Debug)]
struct Registry {
    rooms: Vec<Room>,
    camera_room: Option<Id>,
    saved_kwh: f64,
}

/// Room registry, live camera binding and the cumulative savings ledger.
pub struct RoomService {
    registry: RwLock<Registry>,
    sender: Sender<ServiceEvent>,
}

impl RoomService {
    pub fn new(seeds: Vec<RoomSeed>, sender: &Sender<ServiceEvent>) -> Self {
        let now = clock::now();
        let rooms: Vec<Room> = seeds.into_iter().map(|seed| seed.into_room(now)).collect();
        let camera_room = rooms.first().map(|room| room.id.clone());

        Self {
            registry: RwLock::new(Registry {
                rooms,
                camera_room,
                saved_kwh: INITIAL_SAVED_KWH,
            }),
            sender: sender.clone(),
        }
    }

    pub async fn list(&self) -> Vec<Room> {
        self.registry.read().await.rooms.clone()
    }

    pub async fn get(&self, room_id: &str) -> Result<Room, RoomError> {
        self.registry
            .read()
            .await
            .rooms
            .iter()
            .find(|room| room.id == room_id)
            .cloned()
            .ok_or_else(|| RoomError::RoomNotFound(room_id.to_string()))
    }

    pub async fn apply(&self, room_id: &str, result: &AnalysisResult) -> Result<ApplyOutcome, RoomError> {
        let outcome = {
            let mut registry = self.registry.write().await;
            let room = registry
                .rooms
                .iter_mut()
                .find(|room| room.id == room_id)
                .ok_or_else(|| RoomError::RoomNotFound(room_id.to_string()))?;

            let previous = room.clone();
            let terminated_kw = f64::from(apply_result(room, result)) / 1000.0;
            let outcome = ApplyOutcome {
                previous,
                room: room.clone(),
                terminated_kw,
            };

            if outcome.is_eco_lock() {
                registry.saved_kwh += terminated_kw * SAVINGS_CREDIT_RATIO;
            }

            outcome
        };

        let _ = self.sender.send(ServiceEvent::RoomUpdate(outcome.room.clone()));

        Ok(outcome)
    }

    /// Binds the live camera to `room_id`, or unbinds it with `None`.
    pub async fn bind_camera(&self, room_id: Option<Id>) -> Result<Option<Id>, RoomError> {
        {
            let mut registry = self.registry.write().await;
            if let Some(id) = &room_id {
                if !registry.rooms.iter().any(|room| &room.id == id) {
                    return Err(RoomError::RoomNotFound(id.clone()));
                }
            }
            registry.camera_room = room_id.clone();
        }

        tracing::info!("camera bound to {:?}", room_id);
        let _ = self.sender.send(ServiceEvent::CameraBinding {
            room_id: room_id.clone(),
        });

        Ok(room_id)
    }

    pub async fn camera_room(&self) -> Option<Id> {
        self.registry.read().await.camera_room.clone()
    }

    /// Moves the camera to the room after the bound one, wrapping around. Starts at the first
    /// room when nothing (or an unknown room) is bound.
    pub async fn advance_camera(&self) -> Option<Room> {
        let next = {
            let mut registry = self.registry.write().await;
            if registry.rooms.is_empty() {
                return None;
            }

            let index = registry
                .camera_room
                .as_ref()
                .and_then(|id| registry.rooms.iter().position(|room| &room.id == id))
                .map_or(0, |current| (current + 1) % registry.rooms.len());

            let next = registry.rooms[index].clone();
            registry.camera_room = Some(next.id.clone());
            next
        };

        let _ = self.sender.send(ServiceEvent::CameraBinding {
            room_id: Some(next.id.clone()),
        });

        Some(next)
    }

    /// Draw of every powered device across the building, in watts.
    pub async fn grid_load_watts(&self) -> u32 {
        self.registry.read().await.rooms.iter().map(Room::active_watts).sum()
    }

    pub async fn savings(&self) -> SavingsLedger {
        let total_saved_kwh = self.registry.read().await.saved_kwh;

        SavingsLedger {
            total_saved_kwh,
            co2_avoided_kg: total_saved_kwh * CO2_KG_PER_KWH,
        }
    }
}
