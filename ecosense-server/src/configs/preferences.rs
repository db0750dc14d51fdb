use std::io::ErrorKind;
use std::path::PathBuf;

use ecosense_api::models::Theme;
use tokio::fs;
use tokio::sync::Mutex;

use crate::errors::PreferenceError;

pub const THEME_KEY: &str = "ecosense-theme";

/// User preferences persisted as a flat TOML table.
pub struct PreferenceStore {
    path: PathBuf,
    ambient: Theme,
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    /// `ambient` is returned whenever nothing has been stored yet.
    pub fn new(path: impl Into<PathBuf>, ambient: Theme) -> Self {
        Self {
            path: path.into(),
            ambient,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn load_theme(&self) -> Result<Theme, PreferenceError> {
        let table = self.read_table().await?;

        match table.get(THEME_KEY).and_then(toml::Value::as_str) {
            Some(value) => Ok(value.parse()?),
            None => Ok(self.ambient),
        }
    }

    /// Rewrites the file with the new theme, keeping any other keys. Writers are serialised.
    pub async fn store_theme(&self, theme: Theme) -> Result<(), PreferenceError> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.read_table().await?;
        table.insert(THEME_KEY.to_string(), toml::Value::String(theme.to_string()));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, toml::to_string(&table)?).await?;

        tracing::debug!("stored theme {} in {}", theme, self.path.display());

        Ok(())
    }

    async fn read_table(&self) -> Result<toml::Table, PreferenceError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(toml::Table::new()),
            Err(e) => Err(e.into()),
        }
    }
}
