//! Sagaflow Executor
//!
//! This crate provides the [`StepExecutor`], which executes a single step's
//! primary command with bounded retries and a fixed inter-attempt delay, and
//! a step's compensating command as a single best-effort invocation.
//!
//! The executor has no side effects of its own; all forward and compensating
//! progress goes through the injected [`CommandRunner`] capability.
//!
//! [`CommandRunner`]: sagaflow_runner::CommandRunner

mod error;
mod executor;

pub use error::StepError;
pub use executor::StepExecutor;
