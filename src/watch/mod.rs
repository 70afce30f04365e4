// src/watch/mod.rs

//! Config file change detection.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`) on the config
//!   file's directory.
//! - Fingerprinting the file content so that only real changes reach the
//!   reload loop.
//!
//! It does **not** parse or validate the config; it only turns filesystem
//! changes into [`ServiceEvent::ConfigChanged`](crate::engine::ServiceEvent).

pub mod hash;
pub mod watcher;

pub use hash::{compute_file_hash, ContentFingerprint};
pub use watcher::{spawn_config_watcher, WatcherHandle};
