// src/config/model.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ERROR_TRIGGER;

/// Top-level configuration as read from the config file.
///
/// ```json
/// {
///   "UTC": false,
///   "Tasks": [
///     { "At": "@error", "Do": "ping", "Args": ["http://example.com/error", "OK"] },
///     { "At": "0 5 * * * *", "Do": "ping", "Args": ["http://example.com/here", "OK"] },
///     { "At": "@every 1h30m", "Do": "exec", "Args": ["/usr/local/bin/backup", "--quiet"] }
///   ]
/// }
/// ```
///
/// The same shape is accepted as TOML (`UTC = false` plus `[[Tasks]]` tables).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Compute cron fire times against UTC instead of local time.
    #[serde(rename = "UTC", alias = "utc", default)]
    pub utc: bool,

    /// Optional upper bound on a single action run (e.g. `"30s"`).
    ///
    /// Absent means actions are bounded only by the transport.
    #[serde(
        rename = "Timeout",
        alias = "timeout",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<String>,

    /// Task records in declaration order.
    #[serde(rename = "Tasks", alias = "tasks", default)]
    pub tasks: Vec<TaskConfig>,
}

/// One raw task record. Not trusted until [`TaskConfig::verify`] passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Schedule expression, or `@error`.
    #[serde(rename = "At", alias = "at")]
    pub at: String,

    /// Action kind (`ping` or `exec`).
    #[serde(rename = "Do", alias = "do")]
    pub action: String,

    #[serde(rename = "Args", alias = "args", default)]
    pub args: Vec<String>,
}

impl TaskConfig {
    pub fn new(at: impl Into<String>, action: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            at: at.into(),
            action: action.into(),
            args,
        }
    }

    pub fn is_error_task(&self) -> bool {
        self.at == ERROR_TRIGGER
    }
}

impl fmt::Display for TaskConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} <{:?}>", self.action, self.at, self.args)
    }
}

/// Configuration written out when no config file exists yet.
pub fn sample_config() -> AppConfig {
    let ping = |at: &str, url: &str| TaskConfig {
        at: at.to_string(),
        action: "ping".to_string(),
        args: vec![url.to_string(), "OK".to_string()],
    };

    AppConfig {
        utc: false,
        timeout: None,
        tasks: vec![
            ping(ERROR_TRIGGER, "http://hitthisurl.com/error"),
            ping("0 5 * * * *", "http://hitthisurl.com/here"),
            ping("@every 1h30m", "http://hitthisurl.com/here"),
        ],
    }
}
