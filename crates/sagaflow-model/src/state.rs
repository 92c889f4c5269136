use std::fmt;

use serde::{Deserialize, Serialize};

/// Task lifecycle states.
///
/// ```text
/// NOT_STARTED --(task begins)--> RUNNING
/// RUNNING     --(all steps ok)--> COMPLETED
/// RUNNING     --(a step fails, in-task steps compensated)--> FAILED
/// COMPLETED   --(a later task fails, rollback triggered)--> COMPENSATING
/// COMPENSATING--(all of its steps compensated ok)--> COMPENSATED
/// COMPENSATING--(>=1 compensation failed)--> FAILED
/// ```
///
/// The task that itself failed goes `Running` -> `Failed` directly; only
/// previously completed tasks pass through `Compensating` when rolled back
/// by a later failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
  /// Initial state before the orchestrator reaches the task.
  NotStarted,
  /// The task's steps are being executed.
  Running,
  /// All steps succeeded.
  Completed,
  /// The task failed, or its rollback left at least one compensation failed.
  Failed,
  /// A later task failed; this task's steps are being compensated.
  Compensating,
  /// Every step compensation succeeded during rollback.
  Compensated,
}

impl TaskState {
  /// Whether this state is terminal for the duration of a run.
  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Completed | Self::Failed | Self::Compensated)
  }

  /// Whether a transition from `self` to `next` is allowed by the
  /// lifecycle state machine.
  pub fn can_transition_to(&self, next: TaskState) -> bool {
    matches!(
      (self, next),
      (Self::NotStarted, Self::Running)
        | (Self::Running, Self::Completed)
        | (Self::Running, Self::Failed)
        | (Self::Completed, Self::Compensating)
        | (Self::Compensating, Self::Compensated)
        | (Self::Compensating, Self::Failed)
    )
  }
}

impl fmt::Display for TaskState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NotStarted => write!(f, "not_started"),
      Self::Running => write!(f, "running"),
      Self::Completed => write!(f, "completed"),
      Self::Failed => write!(f, "failed"),
      Self::Compensating => write!(f, "compensating"),
      Self::Compensated => write!(f, "compensated"),
    }
  }
}

/// Error returned when parsing an unknown task state.
#[derive(Debug, thiserror::Error)]
#[error("invalid task state: {0}")]
pub struct ParseTaskStateError(String);

impl std::str::FromStr for TaskState {
  type Err = ParseTaskStateError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "not_started" => Ok(Self::NotStarted),
      "running" => Ok(Self::Running),
      "completed" => Ok(Self::Completed),
      "failed" => Ok(Self::Failed),
      "compensating" => Ok(Self::Compensating),
      "compensated" => Ok(Self::Compensated),
      _ => Err(ParseTaskStateError(s.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALL: [TaskState; 6] = [
    TaskState::NotStarted,
    TaskState::Running,
    TaskState::Completed,
    TaskState::Failed,
    TaskState::Compensating,
    TaskState::Compensated,
  ];

  #[test]
  fn only_lifecycle_transitions_are_allowed() {
    let allowed = [
      (TaskState::NotStarted, TaskState::Running),
      (TaskState::Running, TaskState::Completed),
      (TaskState::Running, TaskState::Failed),
      (TaskState::Completed, TaskState::Compensating),
      (TaskState::Compensating, TaskState::Compensated),
      (TaskState::Compensating, TaskState::Failed),
    ];

    for from in ALL {
      for to in ALL {
        let expected = allowed.contains(&(from, to));
        assert_eq!(
          from.can_transition_to(to),
          expected,
          "transition {from} -> {to}"
        );
      }
    }
  }

  #[test]
  fn terminal_states_have_no_outgoing_transitions() {
    for from in ALL.into_iter().filter(TaskState::is_terminal) {
      // Completed transitions to Compensating only when rollback is
      // triggered by a later failure; it is terminal for a successful run.
      if from == TaskState::Completed {
        continue;
      }
      for to in ALL {
        assert!(!from.can_transition_to(to), "transition {from} -> {to}");
      }
    }
  }

  #[test]
  fn display_and_parse_round_trip() {
    for state in ALL {
      let parsed: TaskState = state.to_string().parse().unwrap();
      assert_eq!(parsed, state);
    }
    assert!("bogus".parse::<TaskState>().is_err());
  }
}
