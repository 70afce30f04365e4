// src/exec/backend.rs

//! Pluggable action backend.
//!
//! The [`Executor`](super::Executor) talks to an `ActionBackend` instead of
//! performing HTTP requests and spawning processes itself. Production code
//! uses [`RealActionBackend`]; tests can substitute a backend that records
//! calls or blocks until told to finish.

use crate::errors::{Result, SchedwatchError};
use crate::exec::command::run_command;
use crate::exec::ping::ping;
use crate::task::Task;
use crate::types::ActionKind;
use crate::BoxFuture;

/// Performs the action of a single task, once.
pub trait ActionBackend: Send + Sync {
    fn run_action<'a>(&'a self, task: &'a Task) -> BoxFuture<'a, Result<()>>;
}

/// Real backend: `reqwest` for `ping`, `tokio::process` for `exec`.
#[derive(Debug, Clone)]
pub struct RealActionBackend {
    http: reqwest::Client,
}

impl RealActionBackend {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("schedwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SchedwatchError::Other(e.into()))?;
        Ok(Self { http })
    }
}

impl ActionBackend for RealActionBackend {
    fn run_action<'a>(&'a self, task: &'a Task) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            match (task.kind(), task.args()) {
                (ActionKind::Ping, [url, expected]) => {
                    ping(&self.http, url, expected, task.timeout()).await
                }
                (ActionKind::Exec, [program, args @ ..]) => {
                    run_command(program, args, task.timeout()).await
                }
                (kind, args) => Err(SchedwatchError::InvalidArguments {
                    kind: kind.to_string(),
                    reason: format!("{} arguments reached execution", args.len()),
                }),
            }
        })
    }
}
