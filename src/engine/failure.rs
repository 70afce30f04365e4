// src/engine/failure.rs

//! Escalation of task failures to `@error` tasks.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::SchedwatchError;
use crate::exec::{Executor, FailureHandler};
use crate::task::Task;
use crate::BoxFuture;

/// Failure handler for one reload generation.
///
/// Holds that generation's error tasks; a new router is built on every
/// successful reload and swapped together with the trigger set.
#[derive(Debug)]
pub struct FailureRouter {
    generation: u64,
    error_tasks: Vec<Arc<Task>>,
    executor: Executor,
}

impl FailureRouter {
    pub fn new(generation: u64, error_tasks: Vec<Arc<Task>>, executor: Executor) -> Self {
        Self {
            generation,
            error_tasks,
            executor,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn error_tasks(&self) -> &[Arc<Task>] {
        &self.error_tasks
    }
}

impl FailureHandler for FailureRouter {
    fn on_failure<'a>(&'a self, task: &'a Arc<Task>, err: SchedwatchError) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            warn!(
                task = %task,
                kind = %task.kind(),
                generation = self.generation,
                error = %err,
                "task failed to run"
            );

            // Error tasks never escalate, so a failing error task cannot loop.
            if task.is_error_task() {
                return;
            }

            debug!(
                task = %task,
                error_tasks = self.error_tasks.len(),
                "running error tasks"
            );
            for error_task in self.error_tasks.iter() {
                self.executor.execute(error_task, self).await;
            }
        })
    }
}
