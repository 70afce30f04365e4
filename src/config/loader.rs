// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::model::{sample_config, AppConfig};
use crate::errors::{Result, SchedwatchError};
use crate::task::TaskSet;

/// On-disk encoding of the config file, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` selects TOML; everything else is read as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Decode raw config bytes. Any failure is a `ConfigDecode` error.
pub fn decode(bytes: &[u8], format: ConfigFormat) -> Result<AppConfig> {
    match format {
        ConfigFormat::Json => {
            serde_json::from_slice(bytes).map_err(|e| SchedwatchError::ConfigDecode(e.to_string()))
        }
        ConfigFormat::Toml => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| SchedwatchError::ConfigDecode(e.to_string()))?;
            toml::from_str(text).map_err(|e| SchedwatchError::ConfigDecode(e.to_string()))
        }
    }
}

/// Encode a config in the given format (pretty-printed).
pub fn encode(config: &AppConfig, format: ConfigFormat) -> Result<String> {
    match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| SchedwatchError::ConfigDecode(e.to_string())),
        ConfigFormat::Toml => {
            toml::to_string_pretty(config).map_err(|e| SchedwatchError::ConfigDecode(e.to_string()))
        }
    }
}

/// Read and decode the config file at `path`.
///
/// This only performs deserialization; it does **not** verify tasks or parse
/// schedules. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    decode(&bytes, ConfigFormat::from_path(path))
}

/// Read, decode and validate the config file at `path`.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<TaskSet> {
    let config = load_from_path(path)?;
    TaskSet::try_from(config)
}

/// Write the sample config to `path` if nothing exists there yet.
///
/// Returns `true` when a file was created.
pub fn ensure_config_file(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let contents = encode(&sample_config(), ConfigFormat::from_path(path))?;
    fs::write(path, contents)?;
    info!(path = %path.display(), "wrote sample configuration");
    Ok(true)
}

/// Default config location: next to the executable, named after it with a
/// `.json` extension (e.g. `/opt/schedwatch/schedwatch.json`).
///
/// Falls back to `schedwatch.json` in the working directory if the executable
/// path cannot be determined.
pub fn default_config_path() -> PathBuf {
    std::env::current_exe()
        .map(|exe| exe.with_extension("json"))
        .unwrap_or_else(|_| PathBuf::from("schedwatch.json"))
}
