// src/trigger/mod.rs

//! Schedule parsing and timer-driven job dispatch.
//!
//! - [`expr`] parses schedule expressions into [`Trigger`]s and computes fire
//!   times on a UTC or local wall clock.
//! - [`duration`] parses `@every` / `Timeout` durations.
//! - [`engine`] owns a set of armed schedules ([`TriggerSet`]) and runs a
//!   [`Job`] on every fire.

pub mod duration;
pub mod engine;
pub mod expr;

pub use duration::parse_duration;
pub use engine::{Job, TriggerSet};
pub use expr::Trigger;
