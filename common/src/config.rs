use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

pub fn from_toml_str<T: DeserializeOwned>(text: &str) -> ConfigResult<T> {
    Ok(toml::from_str(text)?)
}

pub fn load_toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> ConfigResult<T> {
    let text = std::fs::read_to_string(path)?;
    from_toml_str(&text)
}

/// Loads `path` if it exists, otherwise returns `T::default()`.
pub fn load_toml_or_default<T>(path: impl AsRef<Path>) -> ConfigResult<T>
where
    T: DeserializeOwned + Default,
{
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!("Config file {} not found, using defaults", path.display());
        return Ok(T::default());
    }
    load_toml(path)
}

pub fn save_toml<T: Serialize>(value: &T, path: impl AsRef<Path>) -> ConfigResult<()> {
    let text = toml::to_string_pretty(value)?;
    std::fs::write(path, text)?;
    Ok(())
}
