// src/exec/mod.rs

//! Action execution layer.
//!
//! - [`executor`] enforces one in-flight execution per task and reports
//!   failures to a [`FailureHandler`].
//! - [`backend`] provides the `ActionBackend` trait and the production
//!   [`RealActionBackend`], which tests can replace with a fake.
//! - [`ping`] performs the HTTP health check action.
//! - [`command`] spawns processes for the `exec` action.

pub mod backend;
pub mod command;
pub mod executor;
pub mod ping;

pub use backend::{ActionBackend, RealActionBackend};
pub use executor::{Executor, FailureHandler, TaskOutcome};
