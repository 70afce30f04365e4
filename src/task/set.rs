// src/task/set.rs

use std::sync::Arc;
use std::time::Duration;

use crate::config::model::AppConfig;
use crate::task::Task;
use crate::types::TimeBase;

/// Validated tasks for one configuration generation.
///
/// Built only through `TryFrom<AppConfig>`; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TaskSet {
    time_base: TimeBase,
    timeout: Option<Duration>,
    tasks: Vec<Arc<Task>>,
    error_tasks: Vec<Arc<Task>>,
}

impl TaskSet {
    pub(crate) fn new_unchecked(
        time_base: TimeBase,
        timeout: Option<Duration>,
        tasks: Vec<Arc<Task>>,
    ) -> Self {
        let error_tasks = tasks
            .iter()
            .filter(|t| t.is_error_task())
            .cloned()
            .collect();

        Self {
            time_base,
            timeout,
            tasks,
            error_tasks,
        }
    }

    pub fn time_base(&self) -> TimeBase {
        self.time_base
    }

    pub fn utc(&self) -> bool {
        self.time_base == TimeBase::Utc
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// All tasks in declaration order.
    pub fn tasks(&self) -> &[Arc<Task>] {
        &self.tasks
    }

    /// Tasks with a real schedule, in declaration order.
    pub fn ordinary_tasks(&self) -> impl Iterator<Item = &Arc<Task>> {
        self.tasks.iter().filter(|t| !t.is_error_task())
    }

    /// `@error` tasks, in declaration order.
    pub fn error_tasks(&self) -> &[Arc<Task>] {
        &self.error_tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Encode back into the configuration schema.
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            utc: self.utc(),
            timeout: self.timeout.map(format_timeout),
            tasks: self.tasks.iter().map(|t| t.to_config()).collect(),
        }
    }
}

fn format_timeout(timeout: Duration) -> String {
    if timeout.subsec_nanos() == 0 {
        format!("{}s", timeout.as_secs())
    } else {
        format!("{}ns", timeout.as_nanos())
    }
}
