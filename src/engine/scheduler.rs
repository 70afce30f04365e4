// src/engine/scheduler.rs

//! Validate-then-swap installation of task sets.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::config::model::AppConfig;
use crate::engine::failure::FailureRouter;
use crate::engine::{ReloadOutcome, SchedulerState};
use crate::errors::{Result, SchedwatchError};
use crate::exec::{ActionBackend, Executor};
use crate::task::{Task, TaskSet};
use crate::trigger::{Job, TriggerSet};
use crate::types::TimeBase;
use crate::BoxFuture;

/// One scheduled fire of an ordinary task, bound to the router of the
/// generation that registered it.
struct TaskJob {
    task: Arc<Task>,
    executor: Executor,
    router: Arc<FailureRouter>,
}

impl Job for TaskJob {
    fn run(self: Arc<Self>) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            self.executor.execute(&self.task, self.router.as_ref()).await;
        })
    }
}

/// The installed task set with its armed triggers and failure router.
#[derive(Debug)]
struct Generation {
    id: u64,
    task_set: Arc<TaskSet>,
    router: Arc<FailureRouter>,
    triggers: TriggerSet,
}

/// Owns the active generation. Only the reload loop mutates it.
#[derive(Debug)]
pub struct Scheduler {
    executor: Executor,
    tracker: TaskTracker,
    state: SchedulerState,
    active: Option<Generation>,
    next_generation: u64,
}

impl Scheduler {
    pub fn new(backend: Arc<dyn ActionBackend>) -> Self {
        Self {
            executor: Executor::new(backend),
            tracker: TaskTracker::new(),
            state: SchedulerState::Stopped,
            active: None,
            next_generation: 1,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Id of the installed generation, if any.
    pub fn generation(&self) -> Option<u64> {
        self.active.as_ref().map(|g| g.id)
    }

    pub fn active_task_set(&self) -> Option<Arc<TaskSet>> {
        self.active.as_ref().map(|g| Arc::clone(&g.task_set))
    }

    /// Error tasks the current failure router escalates to.
    pub fn error_tasks(&self) -> &[Arc<Task>] {
        self.active
            .as_ref()
            .map(|g| g.router.error_tasks())
            .unwrap_or(&[])
    }

    /// Schedule expressions that currently have an armed trigger.
    pub fn armed_schedules(&self) -> Vec<&str> {
        match &self.active {
            Some(g) if g.triggers.is_armed() => g.triggers.exprs(),
            _ => Vec::new(),
        }
    }

    /// Wall clock the armed triggers evaluate cron fields on.
    pub fn armed_time_base(&self) -> Option<TimeBase> {
        match &self.active {
            Some(g) if g.triggers.is_armed() => Some(g.triggers.time_base()),
            _ => None,
        }
    }

    /// Next fire time of every armed schedule after `now`.
    pub fn next_fire_times(&self, now: DateTime<Utc>) -> Vec<(&str, Option<DateTime<Utc>>)> {
        match &self.active {
            Some(g) if g.triggers.is_armed() => g.triggers.next_fire_times(now),
            _ => Vec::new(),
        }
    }

    /// Validate `candidate` and, only if every task passes, replace the active
    /// generation with it.
    ///
    /// A rejected candidate leaves the current generation untouched and is
    /// reported as [`ReloadOutcome::Rejected`]. `Err` is returned only when a
    /// validated schedule cannot be registered, which is fatal.
    pub async fn apply(&mut self, candidate: AppConfig) -> Result<ReloadOutcome> {
        let previous_state = self.state;
        self.state = SchedulerState::Reloading;

        let task_set = match TaskSet::try_from(candidate) {
            Ok(set) => Arc::new(set),
            Err(err) => {
                self.state = previous_state;
                warn!(error = %err, "bad task configuration; keeping current schedule");
                return Ok(ReloadOutcome::Rejected(err));
            }
        };

        let mut generation = match self.build_generation(task_set) {
            Ok(g) => g,
            Err(err) => {
                self.state = previous_state;
                return Err(err);
            }
        };

        if let Some(mut old) = self.active.take() {
            old.triggers.stop().await;
            debug!(generation = old.id, "previous generation disarmed");
        }

        let outcome = ReloadOutcome::Installed {
            generation: generation.id,
            ordinary: generation.triggers.len(),
            error: generation.router.error_tasks().len(),
        };

        generation.triggers.start();
        info!(
            generation = generation.id,
            ordinary = generation.triggers.len(),
            error_tasks = generation.router.error_tasks().len(),
            utc = generation.task_set.utc(),
            "configuration loaded"
        );

        self.active = Some(generation);
        self.state = SchedulerState::Active;
        Ok(outcome)
    }

    fn build_generation(&mut self, task_set: Arc<TaskSet>) -> Result<Generation> {
        let id = self.next_generation;
        self.next_generation += 1;

        let router = Arc::new(FailureRouter::new(
            id,
            task_set.error_tasks().to_vec(),
            self.executor.clone(),
        ));

        let mut triggers = TriggerSet::new(task_set.time_base(), self.tracker.clone());
        for task in task_set.ordinary_tasks() {
            let Some(expr) = task.schedule() else {
                continue;
            };
            let job = Arc::new(TaskJob {
                task: Arc::clone(task),
                executor: self.executor.clone(),
                router: Arc::clone(&router),
            });
            triggers
                .add_job(expr, job)
                .map_err(|e| SchedwatchError::TriggerRegistration {
                    expr: expr.to_string(),
                    reason: e.to_string(),
                })?;
        }

        Ok(Generation {
            id,
            task_set,
            router,
            triggers,
        })
    }

    /// Disarm all triggers. Executions already in flight keep running; use
    /// [`Scheduler::wait`] to wait for them.
    pub async fn stop(&mut self) {
        if let Some(mut generation) = self.active.take() {
            generation.triggers.stop().await;
            info!(generation = generation.id, "scheduler stopped");
        }
        self.state = SchedulerState::Stopped;
    }

    /// Wait until every execution started by any generation has finished.
    pub async fn wait(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}
