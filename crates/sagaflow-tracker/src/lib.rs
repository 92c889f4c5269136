//! Sagaflow Tracker
//!
//! In-memory, concurrency-safe tracking of task lifecycle states. The
//! tracker is pure bookkeeping: it stores and reports states but enforces
//! no transition policy - that belongs to whichever orchestrator is driving
//! the run. It is the only piece of state shared across concurrent units
//! of execution, so an external status collaborator can poll it while a
//! run is in progress.

use std::collections::HashMap;

use parking_lot::RwLock;
use sagaflow_model::TaskState;
use tracing::info;

/// Concurrency-safe mapping from task name to lifecycle state.
///
/// Safe for concurrent readers and writers. [`snapshot`](Self::snapshot)
/// returns an independent copy: mutations after the call never affect a
/// previously returned snapshot.
#[derive(Default)]
pub struct TaskStateTracker {
  states: RwLock<HashMap<String, TaskState>>,
}

impl TaskStateTracker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a task's state.
  pub fn set(&self, task_name: &str, state: TaskState) {
    let previous = self
      .states
      .write()
      .insert(task_name.to_string(), state)
      .unwrap_or(TaskState::NotStarted);
    info!(task = task_name, %previous, %state, "task state transition");
  }

  /// The current state of a task. Unknown tasks report `NotStarted`.
  pub fn get(&self, task_name: &str) -> TaskState {
    self
      .states
      .read()
      .get(task_name)
      .copied()
      .unwrap_or(TaskState::NotStarted)
  }

  /// Whether a task has completed successfully.
  pub fn is_completed(&self, task_name: &str) -> bool {
    self.get(task_name) == TaskState::Completed
  }

  /// Whether a task has failed.
  pub fn is_failed(&self, task_name: &str) -> bool {
    self.get(task_name) == TaskState::Failed
  }

  /// Remove all recorded states, typically between runs.
  pub fn clear(&self) {
    self.states.write().clear();
    info!("all task states cleared");
  }

  /// An independent copy of the current name -> state mapping.
  pub fn snapshot(&self) -> HashMap<String, TaskState> {
    self.states.read().clone()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;

  #[test]
  fn unknown_tasks_default_to_not_started() {
    let tracker = TaskStateTracker::new();
    assert_eq!(tracker.get("ghost"), TaskState::NotStarted);
  }

  #[test]
  fn set_get_and_clear() {
    let tracker = TaskStateTracker::new();
    tracker.set("checkout", TaskState::Running);
    assert_eq!(tracker.get("checkout"), TaskState::Running);

    tracker.set("checkout", TaskState::Completed);
    assert!(tracker.is_completed("checkout"));
    assert!(!tracker.is_failed("checkout"));

    tracker.clear();
    assert_eq!(tracker.get("checkout"), TaskState::NotStarted);
    assert!(tracker.snapshot().is_empty());
  }

  #[test]
  fn snapshot_is_isolated_from_later_mutations() {
    let tracker = TaskStateTracker::new();
    tracker.set("a", TaskState::Running);

    let snapshot = tracker.snapshot();
    tracker.set("a", TaskState::Failed);
    tracker.set("b", TaskState::Running);

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get("a"), Some(&TaskState::Running));
  }

  #[test]
  fn concurrent_writers_and_readers() {
    let tracker = Arc::new(TaskStateTracker::new());

    let writers: Vec<_> = (0..8)
      .map(|i| {
        let tracker = Arc::clone(&tracker);
        std::thread::spawn(move || {
          let name = format!("task-{i}");
          tracker.set(&name, TaskState::Running);
          tracker.set(&name, TaskState::Completed);
        })
      })
      .collect();

    let readers: Vec<_> = (0..4)
      .map(|_| {
        let tracker = Arc::clone(&tracker);
        std::thread::spawn(move || {
          for _ in 0..100 {
            let _ = tracker.snapshot();
          }
        })
      })
      .collect();

    for handle in writers.into_iter().chain(readers) {
      handle.join().unwrap();
    }

    let snapshot = tracker.snapshot();
    assert_eq!(snapshot.len(), 8);
    assert!(snapshot.values().all(|s| *s == TaskState::Completed));
  }
}
