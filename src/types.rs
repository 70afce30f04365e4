use std::fmt;
use std::str::FromStr;

use crate::errors::SchedwatchError;

/// `At` value marking a task that only runs when another task fails.
pub const ERROR_TRIGGER: &str = "@error";

/// The closed set of actions a task can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// HTTP GET a URL and compare the body against an expected string.
    Ping,
    /// Spawn a command and require a zero exit status.
    Exec,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Ping => "ping",
            ActionKind::Exec => "exec",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = SchedwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ping" => Ok(ActionKind::Ping),
            "exec" => Ok(ActionKind::Exec),
            other => Err(SchedwatchError::UnknownActionKind(other.to_string())),
        }
    }
}

/// Wall clock used when computing cron fire times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeBase {
    #[default]
    Local,
    Utc,
}

impl From<bool> for TimeBase {
    fn from(utc: bool) -> Self {
        if utc { TimeBase::Utc } else { TimeBase::Local }
    }
}
