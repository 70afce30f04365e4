// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::ConfigSource;
use crate::errors::Result;

use super::{ReloadOutcome, Scheduler, ServiceEvent};

/// Sequential reload loop.
///
/// Consumes [`ServiceEvent`]s one at a time, so reloads never interleave.
/// Every `ConfigChanged` loads the configuration from the `ConfigSource` and
/// hands it to the [`Scheduler`]; load failures are logged and leave the
/// active generation in place.
pub struct Runtime<S: ConfigSource> {
    scheduler: Scheduler,
    source: S,
    event_rx: mpsc::Receiver<ServiceEvent>,
}

impl<S: ConfigSource> fmt::Debug for Runtime<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl<S: ConfigSource> Runtime<S> {
    pub fn new(scheduler: Scheduler, source: S, event_rx: mpsc::Receiver<ServiceEvent>) -> Self {
        Self {
            scheduler,
            source,
            event_rx,
        }
    }

    /// Main event loop.
    ///
    /// Runs until a shutdown is requested or every sender is dropped, then
    /// disarms the scheduler and waits for in-flight executions. Returns the
    /// stopped scheduler. A fatal reload error stops the scheduler and is
    /// returned.
    pub async fn run(mut self) -> Result<Scheduler> {
        info!("schedwatch runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            match event {
                ServiceEvent::ConfigChanged => {
                    if let Err(err) = self.reload().await {
                        error!(error = %err, "unrecoverable reload failure");
                        self.scheduler.stop().await;
                        return Err(err);
                    }
                }
                ServiceEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping runtime");
                    break;
                }
            }
        }

        self.scheduler.stop().await;
        self.scheduler.wait().await;
        info!("runtime exiting");
        Ok(self.scheduler)
    }

    async fn reload(&mut self) -> Result<()> {
        let candidate = match self.source.load() {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(error = %err, "failed to load config");
                return Ok(());
            }
        };

        match self.scheduler.apply(candidate).await? {
            ReloadOutcome::Installed { generation, .. } => {
                debug!(generation, "reload applied");
            }
            ReloadOutcome::Rejected(err) => {
                debug!(error = %err, "reload rejected");
            }
        }
        Ok(())
    }
}
