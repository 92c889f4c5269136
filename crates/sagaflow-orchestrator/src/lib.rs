//! Sagaflow Orchestrator
//!
//! The two orchestration engines over the shared workflow model:
//!
//! - [`SequentialOrchestrator`]: tasks one at a time, steps within a task
//!   one at a time.
//! - [`ConcurrentOrchestrator`]: tasks one at a time, but every step of the
//!   current task is dispatched to a bounded worker pool and fully joined
//!   before the task's outcome is decided.
//!
//! Both engines share one compensation policy. When any step fails, the
//! failing task's already-successful steps are compensated in reverse
//! declared order, the task is marked failed, and every previously completed
//! task is rolled back in reverse completion order - each passing through
//! `Compensating` and ending `Compensated` or `Failed`. Compensation is
//! always best-effort and total: one failed compensation never stops the
//! others.
//!
//! # Usage
//!
//! ```ignore
//! use sagaflow_orchestrator::SequentialOrchestrator;
//! use tokio_util::sync::CancellationToken;
//!
//! let orchestrator = SequentialOrchestrator::new(executor, tracker);
//! let outcome = orchestrator.run(&tasks, CancellationToken::new()).await;
//! assert!(outcome.success);
//! ```

mod concurrent;
mod outcome;
mod rollback;
mod sequential;

pub use concurrent::{ConcurrentOrchestrator, DEFAULT_WORKER_CAPACITY};
pub use outcome::RunOutcome;
pub use sequential::SequentialOrchestrator;
