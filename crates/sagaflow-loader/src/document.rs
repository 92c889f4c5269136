use sagaflow_model::{RetryPolicy, StepDefinition, TaskDefinition};
use serde::{Deserialize, Serialize};

/// The root of a workflow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDoc {
  pub tasks: Vec<TaskDoc>,
}

/// A task as written in a workflow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDoc {
  pub name: String,
  #[serde(default)]
  pub steps: Vec<StepDoc>,
}

/// A step as written in a workflow document.
///
/// `name` and `command` are required by the format; everything else has a
/// default. Retry defaults (`maxRetries` 0, `retryDelayMs` 1000) are filled
/// in field by field, so a policy that only sets one of them still gets the
/// other's default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDoc {
  pub name: String,
  pub command: String,
  #[serde(default)]
  pub input: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub compensate_command: Option<String>,
  #[serde(default)]
  pub retry_policy: RetryPolicy,
}

impl From<TaskDoc> for TaskDefinition {
  fn from(doc: TaskDoc) -> Self {
    TaskDefinition {
      name: doc.name,
      steps: doc.steps.into_iter().map(StepDefinition::from).collect(),
    }
  }
}

impl From<StepDoc> for StepDefinition {
  fn from(doc: StepDoc) -> Self {
    StepDefinition {
      name: doc.name,
      command: doc.command,
      input: doc.input,
      compensate_command: doc.compensate_command,
      retry_policy: doc.retry_policy,
    }
  }
}
