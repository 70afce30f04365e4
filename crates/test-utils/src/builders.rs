#![allow(dead_code)]

use schedwatch::config::{AppConfig, TaskConfig};
use schedwatch::task::TaskSet;

/// Builder for `AppConfig` to simplify test setup.
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn utc(mut self, val: bool) -> Self {
        self.config.utc = val;
        self
    }

    pub fn timeout(mut self, val: &str) -> Self {
        self.config.timeout = Some(val.to_string());
        self
    }

    pub fn with_task(mut self, task: TaskConfig) -> Self {
        self.config.tasks.push(task);
        self
    }

    /// The raw config, not validated.
    pub fn build(self) -> AppConfig {
        self.config
    }

    /// A validated task set; panics if the config is invalid.
    pub fn build_task_set(self) -> TaskSet {
        TaskSet::try_from(self.config).expect("Failed to build valid task set from builder")
    }
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    /// A `ping` task: GET `url`, expect `body`.
    pub fn ping(url: &str, body: &str) -> Self {
        Self::action("ping", &[url, body])
    }

    /// An `exec` task running `cmd` with `args`.
    pub fn exec(cmd: &str, args: &[&str]) -> Self {
        let mut all = vec![cmd];
        all.extend_from_slice(args);
        Self::action("exec", &all)
    }

    /// Any action string, including unknown ones.
    pub fn action(action: &str, args: &[&str]) -> Self {
        Self {
            task: TaskConfig {
                at: "@hourly".to_string(),
                action: action.to_string(),
                args: args.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    pub fn at(mut self, expr: &str) -> Self {
        self.task.at = expr.to_string();
        self
    }

    /// Mark as an `@error` task.
    pub fn on_error(self) -> Self {
        self.at("@error")
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
