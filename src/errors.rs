// src/errors.rs

//! Crate-wide error type.
//!
//! Validation errors abort a reload and are only logged; action errors are
//! routed through the failure router; `TriggerRegistration` is the single
//! fatal case.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedwatchError {
    #[error("invalid arguments for \"{kind}\": {reason}")]
    InvalidArguments { kind: String, reason: String },

    #[error("unknown \"Do\": {0}")]
    UnknownActionKind(String),

    #[error("bad schedule <{expr}>: {reason}")]
    TriggerParse { expr: String, reason: String },

    #[error("task already running")]
    AlreadyRunning,

    #[error("request to {url} failed: {reason}")]
    ActionTransport { url: String, reason: String },

    #[error("expected \"{expected}\", got: \"{actual}\"")]
    ActionMismatch { expected: String, actual: String },

    #[error("failed to run command: {reason}, output: {output}")]
    ActionExec { reason: String, output: String },

    #[error("configuration decode error: {0}")]
    ConfigDecode(String),

    #[error("failed to register trigger <{expr}> that already passed validation: {reason}")]
    TriggerRegistration { expr: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SchedwatchError {
    /// Errors that reject a candidate configuration as a whole.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SchedwatchError::InvalidArguments { .. }
                | SchedwatchError::UnknownActionKind(_)
                | SchedwatchError::TriggerParse { .. }
                | SchedwatchError::ConfigDecode(_)
        )
    }

    /// The validate/install contract was broken; the process should exit.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SchedwatchError::TriggerRegistration { .. })
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SchedwatchError>;
