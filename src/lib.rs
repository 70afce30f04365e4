// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod service;
pub mod task;
pub mod trigger;
pub mod types;
pub mod watch;

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{default_config_path, encode, load_and_validate, sample_config, ConfigFormat};
use crate::service::Service;
use crate::task::TaskSet;
use crate::trigger::Trigger;

/// Boxed, sendable future used at the trait seams (`Job`, `ActionBackend`,
/// `FailureHandler`).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config path resolution (and the sample config)
/// - the service: config watcher, scheduler, reload loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    if args.print_sample {
        println!("{}", encode(&sample_config(), ConfigFormat::Json)?);
        return Ok(());
    }

    let config_path = args.config.clone().unwrap_or_else(default_config_path);

    if args.dry_run {
        let task_set = load_and_validate(&config_path)?;
        print_dry_run(&config_path, &task_set);
        return Ok(());
    }

    let service = Service::init(&config_path)?;
    info!(path = %service.config_path().display(), "service initialised");

    // Ctrl-C → graceful shutdown.
    {
        let handle = service.handle();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            handle.stop().await;
        });
    }

    service.start().await?;
    Ok(())
}

/// Simple dry-run output: print tasks and their next fire times.
fn print_dry_run(config_path: &Path, task_set: &TaskSet) {
    let now = Utc::now();

    println!("schedwatch dry-run ({})", config_path.display());
    println!("  UTC = {}", task_set.utc());
    if let Some(timeout) = task_set.timeout() {
        println!("  Timeout = {timeout:?}");
    }
    println!();

    println!("tasks ({}):", task_set.len());
    for task in task_set.tasks() {
        println!("  - {task}");
        if let Some(expr) = task.schedule() {
            let next = Trigger::parse(expr)
                .ok()
                .and_then(|t| task_set.time_base().next_fire(&t, now));
            match next {
                Some(at) => println!("      next: {}", at.to_rfc3339()),
                None => println!("      next: never"),
            }
        } else {
            println!("      runs when an ordinary task fails");
        }
    }

    debug!("dry-run complete (nothing scheduled)");
}
