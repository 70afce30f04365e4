// src/trigger/expr.rs

//! Schedule expressions.
//!
//! Accepted forms:
//! - 6-field cron, seconds first: `"0 5 * * * *"` (a 7th year field is also
//!   accepted)
//! - 5-field cron, seconds default to `0`: `"*/15 * * * *"`
//!
//! Days of week follow standard cron: `0`-`6` from Sunday, `7` is Sunday
//! again, and `SUN`..`SAT` may be used instead of numbers. The field is
//! rewritten into day names before it reaches the `cron` crate, which counts
//! Sunday as `1`.
//! - descriptors: `@yearly`, `@annually`, `@monthly`, `@weekly`, `@daily`,
//!   `@midnight`, `@hourly`
//! - fixed intervals: `@every 1h30m`

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use cron::Schedule;

use crate::errors::{Result, SchedwatchError};
use crate::trigger::duration::parse_duration;
use crate::types::TimeBase;

/// A parsed schedule that can compute its next fire time.
#[derive(Debug, Clone)]
pub enum Trigger {
    Cron(Box<Schedule>),
    /// Fixed delay, whole seconds, at least one second.
    Every(Duration),
}

impl Trigger {
    pub fn parse(expr: &str) -> Result<Self> {
        let fail = |reason: String| SchedwatchError::TriggerParse {
            expr: expr.to_string(),
            reason,
        };

        let fields: Vec<&str> = expr.split_whitespace().collect();
        let mut cron_fields: Vec<String> = match fields.as_slice() {
            [] => return Err(fail("empty schedule".to_string())),
            ["@every", duration] => {
                let delay = parse_duration(duration).map_err(fail)?;
                return Ok(Trigger::Every(every_delay(delay)));
            }
            ["@every", ..] => {
                return Err(fail("expected exactly one duration after @every".to_string()));
            }
            [descriptor] if descriptor.starts_with('@') => {
                let spec = descriptor_spec(descriptor)
                    .ok_or_else(|| fail(format!("unrecognized descriptor {descriptor}")))?;
                return Schedule::from_str(spec)
                    .map(|schedule| Trigger::Cron(Box::new(schedule)))
                    .map_err(|e| fail(e.to_string()));
            }
            _ if fields.len() == 5 => std::iter::once("0")
                .chain(fields.iter().copied())
                .map(str::to_string)
                .collect(),
            _ if fields.len() == 6 || fields.len() == 7 => {
                fields.iter().map(|f| f.to_string()).collect()
            }
            _ => {
                return Err(fail(format!(
                    "expected 5 or 6 fields, found {}",
                    fields.len()
                )));
            }
        };

        cron_fields[5] = day_of_week(&cron_fields[5]).map_err(fail)?;
        let schedule =
            Schedule::from_str(&cron_fields.join(" ")).map_err(|e| fail(e.to_string()))?;
        Ok(Trigger::Cron(Box::new(schedule)))
    }

    /// First fire time strictly after `after`, in the same timezone.
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        match self {
            Trigger::Cron(schedule) => schedule.after(after).next(),
            Trigger::Every(delay) => {
                let delay = chrono::Duration::from_std(*delay).ok()?;
                after.clone().checked_add_signed(delay)?.with_nanosecond(0)
            }
        }
    }
}

impl FromStr for Trigger {
    type Err = SchedwatchError;

    fn from_str(s: &str) -> Result<Self> {
        Trigger::parse(s)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Cron(schedule) => write!(f, "{schedule}"),
            Trigger::Every(delay) => write!(f, "@every {}s", delay.as_secs()),
        }
    }
}

impl TimeBase {
    /// Next fire time after `now`, evaluated on this wall clock.
    pub fn next_fire(&self, trigger: &Trigger, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.next_fire_with_local(trigger, now, &Local)
    }

    /// Like [`TimeBase::next_fire`], with an explicit zone standing in for
    /// local time.
    pub fn next_fire_with_local<Tz: TimeZone>(
        &self,
        trigger: &Trigger,
        now: DateTime<Utc>,
        local: &Tz,
    ) -> Option<DateTime<Utc>> {
        match self {
            TimeBase::Utc => trigger.next_after(&now),
            TimeBase::Local => trigger
                .next_after(&now.with_timezone(local))
                .map(|t| t.with_timezone(&Utc)),
        }
    }
}

fn every_delay(delay: Duration) -> Duration {
    Duration::from_secs(delay.as_secs().max(1))
}

fn descriptor_spec(descriptor: &str) -> Option<&'static str> {
    match descriptor {
        "@yearly" | "@annually" => Some("0 0 0 1 1 *"),
        "@monthly" => Some("0 0 0 1 * *"),
        "@weekly" => Some("0 0 0 * * Sun"),
        "@daily" | "@midnight" => Some("0 0 0 * * *"),
        "@hourly" => Some("0 0 * * * *"),
        _ => None,
    }
}

const DAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Rewrite a standard day-of-week field (lists, ranges, steps, numbers or
/// three-letter names) as a list of day names.
fn day_of_week(field: &str) -> std::result::Result<String, String> {
    if field == "*" || field == "?" {
        return Ok(field.to_string());
    }

    let mut days = [false; 7];
    for item in field.split(',') {
        let (base, step, stepped) = match item.split_once('/') {
            Some((base, step)) => match step.parse::<usize>() {
                Ok(step) if step > 0 => (base, step, true),
                _ => return Err(format!("invalid day-of-week step in {item:?}")),
            },
            None => (item, 1, false),
        };

        let (start, end) = match base.split_once('-') {
            _ if base == "*" || base == "?" => (0, 6),
            Some((lo, hi)) => (day_number(lo)?, day_number(hi)?),
            // `n/step` runs from n to the end of the week.
            None if stepped => (day_number(base)?, 6),
            None => {
                let day = day_number(base)?;
                (day, day)
            }
        };
        if start > end {
            return Err(format!("day-of-week range {base:?} runs backwards"));
        }

        for day in (start..=end).step_by(step) {
            days[day % 7] = true;
        }
    }

    let names: Vec<&str> = days
        .iter()
        .zip(DAY_NAMES)
        .filter_map(|(on, name)| on.then_some(name))
        .collect();
    Ok(names.join(","))
}

/// `0`-`7` (both ends Sunday) or `SUN`..`SAT`, any case.
fn day_number(s: &str) -> std::result::Result<usize, String> {
    if let Ok(n) = s.parse::<usize>() {
        return if n <= 7 {
            Ok(n)
        } else {
            Err(format!("day of week {n} is out of range 0-7"))
        };
    }
    DAY_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("unknown day of week {s:?}"))
}
