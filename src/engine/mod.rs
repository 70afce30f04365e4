// src/engine/mod.rs

//! Orchestration engine for schedwatch.
//!
//! This module ties together:
//! - the [`Scheduler`], which validates candidate configurations and swaps
//!   the active generation (task set + armed triggers + failure router)
//! - the per-generation [`FailureRouter`], which escalates failures of
//!   ordinary tasks to `@error` tasks
//! - the [`Runtime`] reload loop, which reacts to:
//!   - configuration change notifications
//!   - shutdown requests

use crate::errors::SchedwatchError;

/// Lifecycle state of the [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No task set installed (initial and after shutdown).
    Stopped,
    /// A candidate is being validated; the previous generation keeps running.
    Reloading,
    /// A task set is installed and its triggers are armed.
    Active,
}

/// Result of handing a candidate configuration to the scheduler.
#[derive(Debug)]
pub enum ReloadOutcome {
    /// The candidate replaced the active generation.
    Installed {
        generation: u64,
        /// Number of tasks with an armed schedule.
        ordinary: usize,
        /// Number of `@error` tasks.
        error: usize,
    },
    /// The candidate was invalid; nothing changed.
    Rejected(SchedwatchError),
}

impl ReloadOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, ReloadOutcome::Installed { .. })
    }
}

/// Events flowing into the runtime from the config watcher and signal
/// handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceEvent {
    /// The configuration may have changed; load and apply it.
    ConfigChanged,
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod failure;
pub mod runtime;
pub mod scheduler;

pub use failure::FailureRouter;
pub use runtime::Runtime;
pub use scheduler::Scheduler;
