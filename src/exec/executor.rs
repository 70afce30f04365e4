// src/exec/executor.rs

//! Failure-guarded single-flight execution of tasks.

use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::SchedwatchError;
use crate::exec::backend::ActionBackend;
use crate::task::Task;
use crate::BoxFuture;

/// Receives every failed or refused execution.
pub trait FailureHandler: Send + Sync {
    fn on_failure<'a>(&'a self, task: &'a Arc<Task>, err: SchedwatchError) -> BoxFuture<'a, ()>;
}

/// What happened to one execution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed,
    /// Another execution of the same task was still in flight.
    AlreadyRunning,
}

/// Runs task actions through an [`ActionBackend`], one execution per task at
/// a time.
#[derive(Clone)]
pub struct Executor {
    backend: Arc<dyn ActionBackend>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor").finish_non_exhaustive()
    }
}

impl Executor {
    pub fn new(backend: Arc<dyn ActionBackend>) -> Self {
        Self { backend }
    }

    /// Execute `task` once.
    ///
    /// - If the task is already running, the action is not started and
    ///   `on_failure` receives [`SchedwatchError::AlreadyRunning`].
    /// - Otherwise the task's slot is held while the action runs and, on
    ///   failure, until `on_failure` (invoked exactly once) has returned.
    /// - Success invokes nothing.
    pub async fn execute(&self, task: &Arc<Task>, on_failure: &dyn FailureHandler) -> TaskOutcome {
        let Some(permit) = task.try_begin() else {
            debug!(task = %task, "execution refused; previous run still in flight");
            on_failure
                .on_failure(task, SchedwatchError::AlreadyRunning)
                .await;
            return TaskOutcome::AlreadyRunning;
        };

        debug!(task = %task, "executing task");
        let outcome = match self.backend.run_action(task).await {
            Ok(()) => {
                info!(task = %task, "task succeeded");
                TaskOutcome::Success
            }
            Err(err) => {
                on_failure.on_failure(task, err).await;
                TaskOutcome::Failed
            }
        };

        drop(permit);
        outcome
    }
}
