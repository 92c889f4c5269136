//! Compensation walks shared by both engines.

use sagaflow_executor::StepExecutor;
use sagaflow_model::{StepDefinition, TaskDefinition, TaskState};
use sagaflow_tracker::TaskStateTracker;
use tracing::{error, info};

/// Publish a lifecycle transition to the tracker.
///
/// The tracker itself is policy-free; validity is checked here, at the
/// single place the orchestrators write through.
pub(crate) fn publish(tracker: &TaskStateTracker, task_name: &str, next: TaskState) {
  let previous = tracker.get(task_name);
  debug_assert!(
    previous.can_transition_to(next),
    "invalid lifecycle transition {previous} -> {next} for task '{task_name}'"
  );
  tracker.set(task_name, next);
}

/// Compensate already-successful steps in reverse of their declared order.
///
/// Best-effort: every step is compensated regardless of individual
/// outcomes. Returns whether all compensations succeeded.
pub(crate) async fn compensate_steps(
  executor: &StepExecutor,
  completed: &[&StepDefinition],
) -> bool {
  info!(
    steps = completed.len(),
    "compensating completed steps in reverse order"
  );

  let mut all_ok = true;
  for step in completed.iter().rev() {
    if !executor.execute_compensation(step).await {
      error!(step = %step.name, "compensation failed for step");
      all_ok = false;
    }
  }
  all_ok
}

/// Roll back previously completed tasks in reverse of their completion order.
///
/// Each task is marked `Compensating`, has all of its steps compensated in
/// reverse declared order, and ends `Compensated` if every compensation in
/// it succeeded, `Failed` otherwise.
pub(crate) async fn compensate_completed_tasks(
  executor: &StepExecutor,
  tracker: &TaskStateTracker,
  completed: &[&TaskDefinition],
) {
  info!(
    tasks = completed.len(),
    "rolling back previously completed tasks"
  );

  for task in completed.iter().rev() {
    publish(tracker, &task.name, TaskState::Compensating);

    let steps: Vec<&StepDefinition> = task.steps.iter().collect();
    if compensate_steps(executor, &steps).await {
      publish(tracker, &task.name, TaskState::Compensated);
      info!(task = %task.name, "task compensated");
    } else {
      publish(tracker, &task.name, TaskState::Failed);
      error!(task = %task.name, "task compensation failed");
    }
  }
}
