//! Sagaflow Model
//!
//! This crate contains the shared data model for sagaflow: task and step
//! definitions, retry policies, and the task lifecycle state machine.
//!
//! These types are consumed by every other crate:
//! - the loader produces `TaskDefinition`s from workflow documents
//! - the executor reads `StepDefinition`s and their retry policies
//! - the orchestrators drive `TaskState` transitions and publish them
//!   to the tracker

mod retry;
mod state;
mod step;
mod task;

pub use retry::RetryPolicy;
pub use state::{ParseTaskStateError, TaskState};
pub use step::StepDefinition;
pub use task::TaskDefinition;
