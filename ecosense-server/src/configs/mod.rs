use std::path::PathBuf;
use std::{env, io};

mod preferences;
mod settings;

pub use preferences::PreferenceStore;
pub use settings::{
    DEFAULT_SETTINGS, Logger, Preferences, RoomSeed, Schedule, Server, Settings, Telemetry, Vision,
};

pub(crate) fn normalize_path(path: &str) -> io::Result<PathBuf> {
    let path_buf = PathBuf::from(path);

    Ok(if path_buf.is_absolute() {
        path_buf
    } else {
        env::current_dir()?.join(path_buf)
    })
}
