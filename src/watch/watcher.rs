// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::ServiceEvent;
use crate::watch::hash::ContentFingerprint;

/// Handle for the config file watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `config_path` and send [`ServiceEvent::ConfigChanged`] whenever its
/// content changes.
///
/// The parent directory is watched (non-recursively) so that editors which
/// replace the file instead of writing in place are still noticed. The
/// content at spawn time is the baseline; the caller is expected to perform
/// the initial load itself.
pub fn spawn_config_watcher(
    config_path: impl Into<PathBuf>,
    runtime_tx: mpsc::Sender<ServiceEvent>,
) -> Result<WatcherHandle> {
    let config_path = config_path.into();
    let config_path = config_path
        .canonicalize()
        .with_context(|| format!("resolving config path {:?}", config_path))?;
    let dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut fingerprint = ContentFingerprint::of(&config_path)?;

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("schedwatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("schedwatch: config watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    info!(path = %config_path.display(), "config watcher started");

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if matches!(event.kind, EventKind::Access(_)) || !touches(&event, &config_path) {
                continue;
            }
            debug!(?event, "config file event");

            match fingerprint.refresh(&config_path) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(err) => {
                    warn!(error = %err, "failed to hash config file; reloading anyway");
                }
            }

            if runtime_tx.send(ServiceEvent::ConfigChanged).await.is_err() {
                debug!("runtime channel closed; config watcher exiting");
                return;
            }
        }
        debug!("config watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

fn touches(event: &Event, config_path: &Path) -> bool {
    let file_name = config_path.file_name();
    event
        .paths
        .iter()
        .any(|p| p == config_path || (file_name.is_some() && p.file_name() == file_name))
}
