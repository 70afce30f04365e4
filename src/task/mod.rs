// src/task/mod.rs

//! Tasks and task sets.
//!
//! A [`Task`] only exists once its raw [`TaskConfig`] has been verified, so
//! its action kind and arguments are always consistent. A [`TaskSet`] is the
//! immutable, validated collection for one configuration generation.

pub mod guard;
pub mod set;

use std::fmt;
use std::time::Duration;

use crate::config::model::TaskConfig;
use crate::types::{ActionKind, ERROR_TRIGGER};

pub use guard::{RunGuard, RunPermit};
pub use set::TaskSet;

/// When a task runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskTrigger {
    /// A schedule expression that has already been parsed successfully.
    Schedule(String),
    /// No schedule; runs when an ordinary task fails.
    OnError,
}

impl TaskTrigger {
    pub fn as_str(&self) -> &str {
        match self {
            TaskTrigger::Schedule(expr) => expr,
            TaskTrigger::OnError => ERROR_TRIGGER,
        }
    }
}

/// One verified schedule entry plus its run-state.
#[derive(Debug)]
pub struct Task {
    index: usize,
    trigger: TaskTrigger,
    kind: ActionKind,
    args: Vec<String>,
    timeout: Option<Duration>,
    guard: RunGuard,
}

impl Task {
    /// Build a task from a record that already passed
    /// [`TaskConfig::verify`] (and schedule parsing for ordinary tasks).
    pub(crate) fn from_verified(
        index: usize,
        cfg: TaskConfig,
        kind: ActionKind,
        timeout: Option<Duration>,
    ) -> Self {
        let trigger = if cfg.is_error_task() {
            TaskTrigger::OnError
        } else {
            TaskTrigger::Schedule(cfg.at)
        };

        Self {
            index,
            trigger,
            kind,
            args: cfg.args,
            timeout,
            guard: RunGuard::new(),
        }
    }

    /// Position in the config's task list.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn trigger(&self) -> &TaskTrigger {
        &self.trigger
    }

    /// Schedule expression, or `None` for error tasks.
    pub fn schedule(&self) -> Option<&str> {
        match &self.trigger {
            TaskTrigger::Schedule(expr) => Some(expr),
            TaskTrigger::OnError => None,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_error_task(&self) -> bool {
        self.trigger == TaskTrigger::OnError
    }

    /// Whether an execution is in flight.
    pub fn running(&self) -> bool {
        self.guard.is_running()
    }

    /// Claim the single execution slot.
    pub fn try_begin(&self) -> Option<RunPermit<'_>> {
        self.guard.try_acquire()
    }

    /// The raw record this task was built from.
    pub fn to_config(&self) -> TaskConfig {
        TaskConfig::new(self.trigger.as_str(), self.kind.as_str(), self.args.clone())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} <{:?}>", self.kind, self.trigger.as_str(), self.args)
    }
}
