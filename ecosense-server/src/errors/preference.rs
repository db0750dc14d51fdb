use ecosense_api::models::UnknownTheme;

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("Preference file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed preference file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Stored preference is invalid: {0}")]
    UnknownTheme(#[from] UnknownTheme),
}
