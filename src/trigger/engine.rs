// src/trigger/engine.rs

//! A set of armed schedules, each driving a [`Job`].
//!
//! Every registered schedule gets its own Tokio timer loop once the set is
//! started. Each fire spawns the job on a shared [`TaskTracker`], so slow jobs
//! never delay later fires and executions keep running after the set is
//! stopped.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, trace};

use crate::errors::Result;
use crate::trigger::expr::Trigger;
use crate::types::TimeBase;
use crate::BoxFuture;

/// Work bound to a schedule.
pub trait Job: Send + Sync + 'static {
    /// Produce the future for one fire.
    fn run(self: Arc<Self>) -> BoxFuture<'static, ()>;
}

struct Entry {
    expr: String,
    trigger: Trigger,
    job: Arc<dyn Job>,
}

/// Registered schedules plus, once started, their timer loops.
pub struct TriggerSet {
    time_base: TimeBase,
    entries: Vec<Entry>,
    tracker: TaskTracker,
    cancel: CancellationToken,
    loops: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for TriggerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerSet")
            .field("time_base", &self.time_base)
            .field("exprs", &self.exprs())
            .field("armed", &self.is_armed())
            .finish()
    }
}

impl TriggerSet {
    /// Create an empty, unarmed set. Fires are spawned on `tracker`.
    pub fn new(time_base: TimeBase, tracker: TaskTracker) -> Self {
        Self {
            time_base,
            entries: Vec::new(),
            tracker,
            cancel: CancellationToken::new(),
            loops: Vec::new(),
        }
    }

    /// Register `job` to run on every fire of `expr`.
    ///
    /// Jobs added after [`TriggerSet::start`] are not armed until the next
    /// start.
    pub fn add_job(&mut self, expr: &str, job: Arc<dyn Job>) -> Result<()> {
        let trigger = Trigger::parse(expr)?;
        self.entries.push(Entry {
            expr: expr.to_string(),
            trigger,
            job,
        });
        Ok(())
    }

    /// Arm every registered schedule. Must be called inside a Tokio runtime.
    pub fn start(&mut self) {
        if self.is_armed() {
            return;
        }
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }

        for entry in self.entries.iter() {
            let fire_loop = fire_loop(
                entry.expr.clone(),
                entry.trigger.clone(),
                self.time_base,
                Arc::clone(&entry.job),
                self.cancel.clone(),
                self.tracker.clone(),
            );
            self.loops.push(tokio::spawn(fire_loop));
        }

        debug!(schedules = self.entries.len(), time_base = ?self.time_base, "trigger set armed");
    }

    /// Disarm every schedule and wait until no timer loop can fire again.
    ///
    /// Executions that already started are left running.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        for handle in self.loops.drain(..) {
            if let Err(err) = handle.await {
                debug!(error = %err, "trigger loop ended abnormally");
            }
        }
        debug!("trigger set disarmed");
    }

    pub fn is_armed(&self) -> bool {
        !self.loops.is_empty() && !self.cancel.is_cancelled()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn time_base(&self) -> TimeBase {
        self.time_base
    }

    /// Registered expressions in registration order.
    pub fn exprs(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.expr.as_str()).collect()
    }

    /// Next fire time of every registered expression after `now`.
    pub fn next_fire_times(&self, now: DateTime<Utc>) -> Vec<(&str, Option<DateTime<Utc>>)> {
        self.entries
            .iter()
            .map(|e| (e.expr.as_str(), self.time_base.next_fire(&e.trigger, now)))
            .collect()
    }
}

impl Drop for TriggerSet {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn fire_loop(
    expr: String,
    trigger: Trigger,
    time_base: TimeBase,
    job: Arc<dyn Job>,
    cancel: CancellationToken,
    tracker: TaskTracker,
) {
    let mut last_fire: Option<DateTime<Utc>> = None;

    loop {
        let now = Utc::now();
        // Never compute from before the previous fire, in case the timer woke
        // slightly early relative to the wall clock.
        let base = match last_fire {
            Some(last) if last > now => last,
            _ => now,
        };

        let Some(next) = time_base.next_fire(&trigger, base) else {
            debug!(schedule = %expr, "schedule has no further fire times");
            return;
        };
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        trace!(schedule = %expr, next = %next, "waiting for next fire");

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(wait) => {}
        }
        if cancel.is_cancelled() {
            return;
        }

        debug!(schedule = %expr, "schedule fired");
        tracker.spawn(Arc::clone(&job).run());
        last_fire = Some(next);
    }
}
