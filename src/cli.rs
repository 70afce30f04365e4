// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `schedwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "schedwatch",
    version,
    about = "Run health checks and commands on cron schedules, escalating failures to error tasks.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (JSON, or TOML with a `.toml` extension).
    ///
    /// Default: the executable path with a `.json` extension. A sample
    /// config is written there if the file does not exist.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SCHEDWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the task set and next fire times, but don't
    /// schedule anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the sample configuration as JSON and exit.
    #[arg(long)]
    pub print_sample: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
