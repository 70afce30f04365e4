// src/config/validate.rs

use std::sync::Arc;
use std::time::Duration;

use crate::config::model::{AppConfig, TaskConfig};
use crate::errors::{Result, SchedwatchError};
use crate::task::{Task, TaskSet};
use crate::trigger::{parse_duration, Trigger};
use crate::types::{ActionKind, TimeBase};

impl TaskConfig {
    /// Check `Do` against the known actions and `Args` against its arity.
    ///
    /// Pure; does not look at `At`.
    pub fn verify(&self) -> Result<ActionKind> {
        let kind: ActionKind = self.action.parse()?;
        match kind {
            ActionKind::Ping if self.args.len() != 2 => Err(SchedwatchError::InvalidArguments {
                kind: kind.to_string(),
                reason: format!(
                    "must have two arguments: Url, and expected result (got {})",
                    self.args.len()
                ),
            }),
            ActionKind::Exec if self.args.is_empty() => Err(SchedwatchError::InvalidArguments {
                kind: kind.to_string(),
                reason: "must have at least one argument: CMD [ARGS]".to_string(),
            }),
            _ => Ok(kind),
        }
    }
}

impl TryFrom<AppConfig> for TaskSet {
    type Error = SchedwatchError;

    fn try_from(raw: AppConfig) -> std::result::Result<Self, Self::Error> {
        let checked = validate_config(&raw)?;
        let timeout = checked.timeout;

        let tasks = raw
            .tasks
            .into_iter()
            .zip(checked.kinds)
            .enumerate()
            .map(|(index, (cfg, kind))| Arc::new(Task::from_verified(index, cfg, kind, timeout)))
            .collect();

        Ok(TaskSet::new_unchecked(TimeBase::from(raw.utc), timeout, tasks))
    }
}

/// Result of a successful validation pass.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// Action kind of each task, in declaration order.
    pub kinds: Vec<ActionKind>,
    pub timeout: Option<Duration>,
}

/// Validate every task of a candidate config without building anything.
///
/// The first invalid task or schedule rejects the whole config.
pub fn validate_config(cfg: &AppConfig) -> Result<ValidatedConfig> {
    let timeout = cfg
        .timeout
        .as_deref()
        .map(|s| {
            parse_duration(s)
                .and_then(|d| {
                    if d.is_zero() {
                        Err("must be greater than zero".to_string())
                    } else {
                        Ok(d)
                    }
                })
                .map_err(|e| SchedwatchError::ConfigDecode(format!("invalid Timeout {s:?}: {e}")))
        })
        .transpose()?;

    let mut kinds = Vec::with_capacity(cfg.tasks.len());
    for task in cfg.tasks.iter() {
        let kind = task.verify()?;
        if !task.is_error_task() {
            Trigger::parse(&task.at)?;
        }
        kinds.push(kind);
    }

    Ok(ValidatedConfig { kinds, timeout })
}
