use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Definition of a single step in a task.
///
/// A step carries a primary command, its input, and optionally a compensating
/// command used to undo the step's effects during rollback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
  /// Step name, unique within its task.
  pub name: String,
  /// The primary command executed to make forward progress.
  pub command: String,
  /// Input passed to both the primary and the compensating command.
  #[serde(default)]
  pub input: String,
  /// Command that undoes this step's effects. A blank value counts as absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub compensate_command: Option<String>,
  /// Retry policy for the primary command.
  #[serde(default)]
  pub retry_policy: RetryPolicy,
}

impl StepDefinition {
  /// Create a step with the default retry policy and no compensation.
  pub fn new(
    name: impl Into<String>,
    command: impl Into<String>,
    input: impl Into<String>,
  ) -> Self {
    Self {
      name: name.into(),
      command: command.into(),
      input: input.into(),
      compensate_command: None,
      retry_policy: RetryPolicy::default(),
    }
  }

  /// Set the compensating command.
  pub fn with_compensation(mut self, command: impl Into<String>) -> Self {
    self.compensate_command = Some(command.into());
    self
  }

  /// Set the retry policy.
  pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
    self.retry_policy = policy;
    self
  }

  /// The compensating command, if one is defined and non-blank.
  pub fn compensation_command(&self) -> Option<&str> {
    self
      .compensate_command
      .as_deref()
      .map(str::trim)
      .filter(|c| !c.is_empty())
  }

  /// Whether this step has a compensating command.
  pub fn has_compensation(&self) -> bool {
    self.compensation_command().is_some()
  }
}
