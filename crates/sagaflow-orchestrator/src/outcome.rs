use std::collections::HashMap;

use sagaflow_model::TaskState;
use serde::Serialize;

/// The observable result of one orchestration run: a single verdict plus
/// the final tracker snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
  /// Whether every task's every step succeeded.
  pub success: bool,
  /// Final task states at the moment the run returned. Every task the run
  /// touched is in a terminal state.
  pub task_states: HashMap<String, TaskState>,
}

impl RunOutcome {
  pub(crate) fn succeeded(task_states: HashMap<String, TaskState>) -> Self {
    Self {
      success: true,
      task_states,
    }
  }

  pub(crate) fn failed(task_states: HashMap<String, TaskState>) -> Self {
    Self {
      success: false,
      task_states,
    }
  }
}
