use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Semaphore;

use schedwatch::errors::{Result, SchedwatchError};
use schedwatch::exec::ActionBackend;
use schedwatch::task::Task;
use schedwatch::BoxFuture;

/// A fake action backend that:
/// - records the first argument (URL or command) of every action it runs
/// - fails for configured first arguments, succeeds otherwise
/// - optionally holds every action until [`FakeBackend::release`] is called
/// - tracks how many actions were in flight at the same time.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
    gate: Option<Semaphore>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every action blocks until a matching [`FakeBackend::release`].
    pub fn gated() -> Self {
        Self {
            inner: Arc::new(Inner {
                gate: Some(Semaphore::new(0)),
                ..Inner::default()
            }),
        }
    }

    /// Every action sleeps for `delay` before completing.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                delay: Some(delay),
                ..Inner::default()
            }),
        }
    }

    /// Actions whose first argument equals `key` fail.
    pub fn fail_on(self, key: &str) -> Self {
        self.inner.failing.lock().unwrap().insert(key.to_string());
        self
    }

    /// Let `n` gated actions finish.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.inner.gate {
            gate.add_permits(n);
        }
    }

    /// First arguments of every action started so far, in start order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, key: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == key).count()
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.inner.max_in_flight.load(Ordering::SeqCst)
    }

    /// As a trait object for `Scheduler::new` / `Executor::new`.
    pub fn as_backend(&self) -> Arc<dyn ActionBackend> {
        Arc::new(self.clone())
    }
}

impl ActionBackend for FakeBackend {
    fn run_action<'a>(&'a self, task: &'a Task) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let key = task.args().first().cloned().unwrap_or_default();
            self.inner.calls.lock().unwrap().push(key.clone());

            let now = self.inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.inner.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(gate) = &self.inner.gate {
                if let Ok(permit) = gate.acquire().await {
                    permit.forget();
                }
            }
            if let Some(delay) = self.inner.delay {
                tokio::time::sleep(delay).await;
            }

            self.inner.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.inner.failing.lock().unwrap().contains(&key) {
                return Err(SchedwatchError::ActionExec {
                    reason: "fake failure".to_string(),
                    output: key,
                });
            }
            Ok(())
        })
    }
}
