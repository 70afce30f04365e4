// src/service.rs

//! Service lifecycle hooks: `init`, `start`, `stop`.
//!
//! The binary (or any supervisor embedding the library) calls
//! [`Service::init`] once, keeps a [`ServiceHandle`] for stopping, and awaits
//! [`Service::start`], which only returns after shutdown has drained every
//! in-flight execution.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::{ensure_config_file, FileConfigSource};
use crate::engine::{Runtime, Scheduler, ServiceEvent};
use crate::errors::Result;
use crate::exec::{ActionBackend, RealActionBackend};
use crate::watch::{spawn_config_watcher, WatcherHandle};

/// Cloneable sender used to stop (or nudge) a running service.
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    tx: mpsc::Sender<ServiceEvent>,
}

impl ServiceHandle {
    /// Request a graceful shutdown: triggers are disarmed, in-flight
    /// executions are awaited.
    pub async fn stop(&self) {
        if self.tx.send(ServiceEvent::ShutdownRequested).await.is_err() {
            info!("service already stopped");
        }
    }

    /// Force a reload of the config file.
    pub async fn reload(&self) {
        if self.tx.send(ServiceEvent::ConfigChanged).await.is_err() {
            warn!("reload requested after the service stopped; ignored");
        }
    }
}

/// An initialised but not yet started service.
pub struct Service {
    config_path: PathBuf,
    scheduler: Scheduler,
    events_tx: mpsc::Sender<ServiceEvent>,
    events_rx: mpsc::Receiver<ServiceEvent>,
    watcher: WatcherHandle,
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("config_path", &self.config_path)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl Service {
    /// Prepare the config file (writing the sample if missing) and open the
    /// change watch on it. Must be called inside a Tokio runtime.
    pub fn init(config_path: impl AsRef<Path>) -> Result<Self> {
        let backend = Arc::new(RealActionBackend::new()?);
        Self::with_backend(config_path, backend)
    }

    /// Like [`Service::init`], with a custom action backend.
    pub fn with_backend(
        config_path: impl AsRef<Path>,
        backend: Arc<dyn ActionBackend>,
    ) -> Result<Self> {
        let config_path = config_path.as_ref().to_path_buf();

        if let Err(err) = ensure_config_file(&config_path) {
            error!(path = %config_path.display(), error = %err, "could not prepare config file");
            return Err(err);
        }

        let (events_tx, events_rx) = mpsc::channel::<ServiceEvent>(16);

        let watcher = match spawn_config_watcher(&config_path, events_tx.clone()) {
            Ok(w) => w,
            Err(err) => {
                error!(path = %config_path.display(), error = %err, "could not watch config file");
                return Err(err.into());
            }
        };

        Ok(Self {
            config_path,
            scheduler: Scheduler::new(backend),
            events_tx,
            events_rx,
            watcher,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn handle(&self) -> ServiceHandle {
        ServiceHandle {
            tx: self.events_tx.clone(),
        }
    }

    /// Load the initial config and run the reload loop until stopped.
    pub async fn start(self) -> Result<()> {
        let Service {
            config_path,
            scheduler,
            events_tx,
            events_rx,
            watcher,
        } = self;

        info!(path = %config_path.display(), "starting service");

        // Initial load; later loads are driven by the watcher.
        if events_tx.send(ServiceEvent::ConfigChanged).await.is_err() {
            warn!("initial load could not be queued");
        }
        drop(events_tx);

        let runtime = Runtime::new(scheduler, FileConfigSource::new(config_path), events_rx);
        let result = runtime.run().await.map(|_| ());

        drop(watcher);
        result
    }
}
