use serde::{Deserialize, Serialize};

use crate::step::StepDefinition;

/// Definition of a task: a named, ordered sequence of steps.
///
/// Step order is significant. Forward execution follows it under the
/// sequential engine, and compensation always walks it in reverse under
/// both engines, regardless of completion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
  /// Task name, unique within a run.
  pub name: String,
  /// Ordered steps. A task with no steps vacuously succeeds.
  #[serde(default)]
  pub steps: Vec<StepDefinition>,
}

impl TaskDefinition {
  /// Create an empty task.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      steps: Vec::new(),
    }
  }

  /// Create a task from its steps.
  pub fn with_steps(name: impl Into<String>, steps: Vec<StepDefinition>) -> Self {
    Self {
      name: name.into(),
      steps,
    }
  }

  /// Append a step.
  pub fn add_step(&mut self, step: StepDefinition) {
    self.steps.push(step);
  }

  /// Whether this task has any steps.
  pub fn has_steps(&self) -> bool {
    !self.steps.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn steps_keep_their_declared_order() {
    let mut task = TaskDefinition::new("checkout");
    assert!(!task.has_steps());

    task.add_step(StepDefinition::new("reserve", "reserve-stock", "item"));
    task.add_step(StepDefinition::new("charge", "charge-card", "card"));

    assert!(task.has_steps());
    let names: Vec<&str> = task.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["reserve", "charge"]);
  }
}
