use std::collections::HashSet;
use std::env;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use ecosense_api::models::{Device, Id, Room, RoomStatus, Theme};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::configs::normalize_path;
use crate::errors::ConfigError;

pub const DEFAULT_SETTINGS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../",
    "configs/default.toml"
));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vision {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub telemetry_interval_secs: u64,
    pub auto_cycle_interval_secs: u64,
    pub cooldown_secs: u32,
    pub fallback_delay_ms: u64,
}

impl Schedule {
    pub fn telemetry_interval(&self) -> Duration {
        Duration::from_secs(self.telemetry_interval_secs)
    }

    pub fn auto_cycle_interval(&self) -> Duration {
        Duration::from_secs(self.auto_cycle_interval_secs)
    }

    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            telemetry_interval_secs: 5,
            auto_cycle_interval_secs: 15,
            cooldown_secs: 90,
            fallback_delay_ms: 1500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Telemetry {
    pub seed_history: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub path: String,
    pub ambient_theme: Theme,
}

/// A room as declared in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSeed {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub occupied: bool,
    #[serde(default)]
    pub occupancy_count: u32,
    pub temperature: f32,
    pub brightness: f32,
    pub image_url: String,
    #[serde(default)]
    pub devices: Vec<Device>,
}

impl RoomSeed {
    pub fn into_room(self, now: OffsetDateTime) -> Room {
        Room {
            id: self.id,
            name: self.name,
            status: RoomStatus::from(self.occupied),
            occupancy_count: self.occupancy_count,
            temperature: self.temperature,
            brightness: self.brightness,
            devices: self.devices,
            image_url: self.image_url,
            last_update: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub vision: Vision,
    pub schedule: Schedule,
    pub telemetry: Telemetry,
    pub preferences: Preferences,
    #[serde(default)]
    pub rooms: Vec<RoomSeed>,
}

impl Settings {
    /// Built-in defaults, overlaid with `configs/{RUN_MODE}.toml`, `ECOSENSE_<SECTION>__<KEY>`
    /// variables and the API key variables.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());
        let api_key = env::var("ECOSENSE_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|key| !key.is_empty());

        let mut settings: Settings = Config::builder()
            .add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(
                Environment::with_prefix("ECOSENSE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("vision.api_key", api_key)?
            .build()?
            .try_deserialize()?;
        settings.validate()?;

        let path = normalize_path(&settings.preferences.path).map_err(|source| ConfigError::Io {
            path: settings.preferences.path.clone(),
            source,
        })?;
        settings.preferences.path = path.to_string_lossy().to_string();

        Ok(settings)
    }

    /// Layers `overlay` over `base`, both TOML documents. Tables merge key by key, arrays are
    /// replaced.
    pub fn from_sources(base: &str, overlay: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(File::from_str(base, FileFormat::Toml));
        if let Some(overlay) = overlay {
            builder = builder.add_source(File::from_str(overlay, FileFormat::Toml));
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for room in &self.rooms {
            if !seen.insert(room.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate room id {}", room.id)));
            }
            if !(0.0..=100.0).contains(&room.brightness) {
                return Err(ConfigError::Invalid(format!(
                    "room {} brightness out of range: {}",
                    room.id, room.brightness
                )));
            }
        }

        if self.schedule.telemetry_interval_secs == 0 || self.schedule.auto_cycle_interval_secs == 0
        {
            return Err(ConfigError::Invalid("schedule intervals must be non-zero".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_parse() {
        let settings = Settings::from_sources(DEFAULT_SETTINGS, None).unwrap();

        assert_eq!(settings.schedule.cooldown_secs, 90);
        assert_eq!(settings.schedule.auto_cycle_interval(), Duration::from_secs(15));
        assert_eq!(settings.rooms.len(), 3);
        assert_eq!(settings.rooms[0].id, "room-101");
        assert_eq!(settings.rooms[1].devices.len(), 3);
        assert_eq!(settings.preferences.ambient_theme, Theme::Light);
    }

    #[test]
    fn test_overlay_merges_nested_tables() {
        let overlay = r#"
            [server]
            port = 9000

            [schedule]
            cooldown_secs = 30
        "#;

        let settings = Settings::from_sources(DEFAULT_SETTINGS, Some(overlay)).unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.schedule.cooldown_secs, 30);
        assert_eq!(settings.schedule.telemetry_interval_secs, 5);
    }

    #[test]
    fn test_overlay_replaces_rooms() {
        let overlay = r#"
            [[rooms]]
            id = "lab"
            name = "Lab"
            temperature = 21.5
            brightness = 40.0
            image_url = "lab.jpg"
        "#;

        let settings = Settings::from_sources(DEFAULT_SETTINGS, Some(overlay)).unwrap();

        assert_eq!(settings.rooms.len(), 1);
        assert_eq!(settings.rooms[0].id, "lab");
        assert!(settings.rooms[0].devices.is_empty());
        assert_eq!(settings.vision.timeout_secs, 30);
    }

    #[test]
    fn test_malformed_overlay_is_a_load_error() {
        let result = Settings::from_sources(DEFAULT_SETTINGS, Some("[server]\nport = \"eighty\""));

        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_duplicate_room_ids_rejected() {
        let overlay = r#"
            [[rooms]]
            id = "room-1"
            name = "A"
            temperature = 20.0
            brightness = 50.0
            image_url = "a.jpg"

            [[rooms]]
            id = "room-1"
            name = "B"
            temperature = 20.0
            brightness = 50.0
            image_url = "b.jpg"
        "#;

        let result = Settings::from_sources(DEFAULT_SETTINGS, Some(overlay));

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_room_seed_into_room() {
        let settings = Settings::from_sources(DEFAULT_SETTINGS, None).unwrap();
        let now = OffsetDateTime::now_utc();

        let room = settings.rooms[1].clone().into_room(now);

        assert_eq!(room.status, RoomStatus::Occupied);
        assert_eq!(room.occupancy_count, 15);
        assert_eq!(room.active_watts(), 2400);
        assert_eq!(room.last_update, now);
    }
}
