//! Sagaflow Loader
//!
//! This crate loads workflow documents into the core's task definitions.
//! The orchestration core never depends on it; it consumes the produced
//! `Vec<TaskDefinition>` and is agnostic to where definitions came from.
//!
//! A workflow document has a `tasks` list; each task has a `name` and a
//! `steps` list; each step has `name`, `command`, `input`, an optional
//! `compensateCommand`, and an optional `retryPolicy` with `maxRetries`
//! (default 0) and `retryDelayMs` (default 1000). Missing or blank task
//! names, step names, or commands are load-time errors, as are duplicate
//! task names and duplicate step names within a task.

mod document;
mod error;
mod loader;

pub use document::{StepDoc, TaskDoc, WorkflowDoc};
pub use error::LoadError;
pub use loader::{load_file, parse_json, parse_yaml};
