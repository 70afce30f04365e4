// src/config/source.rs

//! "Give me the latest configuration" capability used by the reload loop.

use std::path::{Path, PathBuf};

use crate::config::loader::load_from_path;
use crate::config::model::AppConfig;
use crate::errors::Result;

/// Something the runtime can load the current configuration from.
///
/// Production code reads the config file ([`FileConfigSource`]); tests can
/// hand out configs from memory.
pub trait ConfigSource: Send {
    /// Decode the latest configuration. Errors are reload failures, never
    /// fatal.
    fn load(&mut self) -> Result<AppConfig>;
}

/// Reads the config file from disk on every call.
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&mut self) -> Result<AppConfig> {
        load_from_path(&self.path)
    }
}
