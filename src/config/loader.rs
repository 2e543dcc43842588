// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{FfrunError, Result};

/// Load a configuration file and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform
/// semantic validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run basic validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load the configuration, creating the file with defaults if it does not
/// exist yet (so a first run leaves an editable config behind).
pub fn load_or_init(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "config file missing; writing defaults");
        let raw = RawConfigFile::default();
        save(path, &raw)?;
        return ConfigFile::try_from(raw);
    }
    load_and_validate(path)
}

/// Persist a configuration to disk as TOML.
pub fn save(path: impl AsRef<Path>, raw: &RawConfigFile) -> Result<()> {
    let text = toml::to_string_pretty(raw)
        .map_err(|e| FfrunError::ConfigError(format!("serializing config: {e}")))?;
    fs::write(path, text)?;
    Ok(())
}

/// Default config path: `Ffrun.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Ffrun.toml")
}
