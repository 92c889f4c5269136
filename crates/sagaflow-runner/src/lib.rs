//! Sagaflow Runner
//!
//! This crate defines the command-runner capability: the only thing the
//! orchestration core needs from the outside world to make forward or
//! compensating progress. The core is agnostic to what a command does.
//!
//! Two implementations ship with the crate:
//! - [`SimulatedCommandRunner`]: a stand-in that succeeds for every command
//!   except the literal `"FAIL"`, after a small simulated latency. Used by
//!   the CLI.
//! - [`ScriptedCommandRunner`]: a deterministic fake for tests. Outcomes are
//!   scripted per command, every invocation is recorded in order, and
//!   in-flight concurrency is tracked.

mod error;
mod runner;
mod scripted;
mod simulated;

pub use error::RunnerError;
pub use runner::CommandRunner;
pub use scripted::{Invocation, ScriptedCommandRunner};
pub use simulated::{FAIL_COMMAND, SimulatedCommandRunner};
