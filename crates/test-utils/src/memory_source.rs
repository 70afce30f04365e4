use std::sync::{Arc, Mutex};

use schedwatch::config::{AppConfig, ConfigSource};
use schedwatch::errors::{Result, SchedwatchError};

/// A `ConfigSource` backed by a shared slot that tests can overwrite between
/// `ConfigChanged` events.
///
/// An empty slot behaves like an undecodable file.
#[derive(Clone, Default)]
pub struct MemorySource {
    current: Arc<Mutex<Option<AppConfig>>>,
    loads: Arc<Mutex<usize>>,
}

impl MemorySource {
    pub fn new(initial: AppConfig) -> Self {
        let source = Self::default();
        source.set(initial);
        source
    }

    pub fn set(&self, cfg: AppConfig) {
        *self.current.lock().unwrap() = Some(cfg);
    }

    /// Make the next loads fail with a decode error.
    pub fn corrupt(&self) {
        *self.current.lock().unwrap() = None;
    }

    pub fn load_count(&self) -> usize {
        *self.loads.lock().unwrap()
    }
}

impl ConfigSource for MemorySource {
    fn load(&mut self) -> Result<AppConfig> {
        *self.loads.lock().unwrap() += 1;
        self.current
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| SchedwatchError::ConfigDecode("expected value at line 1".to_string()))
    }
}
