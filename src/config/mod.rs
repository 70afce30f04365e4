// src/config/mod.rs

//! Configuration loading and validation for schedwatch.
//!
//! Responsibilities:
//! - Define the serde-backed data model (`model.rs`).
//! - Decode / encode config files as JSON or TOML (`loader.rs`).
//! - Turn a raw config into a validated [`TaskSet`](crate::task::TaskSet)
//!   (`validate.rs`).
//! - Expose the "load the latest config" capability used by the reload loop
//!   (`source.rs`).

pub mod loader;
pub mod model;
pub mod source;
pub mod validate;

pub use loader::{
    decode, default_config_path, encode, ensure_config_file, load_and_validate, load_from_path,
    ConfigFormat,
};
pub use model::{sample_config, AppConfig, TaskConfig};
pub use source::{ConfigSource, FileConfigSource};
pub use validate::validate_config;
