//! Sequential orchestration engine.

use std::sync::Arc;

use sagaflow_executor::{StepError, StepExecutor};
use sagaflow_model::{StepDefinition, TaskDefinition, TaskState};
use sagaflow_tracker::TaskStateTracker;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::outcome::RunOutcome;
use crate::rollback;

/// Runs tasks one at a time, steps within a task one at a time.
///
/// The first step to fail stops its task's forward progress immediately;
/// steps after it never run. The run then compensates and stops - no
/// further tasks in the list are attempted.
pub struct SequentialOrchestrator {
  executor: Arc<StepExecutor>,
  tracker: Arc<TaskStateTracker>,
}

impl SequentialOrchestrator {
  /// Create a new sequential orchestrator.
  pub fn new(executor: Arc<StepExecutor>, tracker: Arc<TaskStateTracker>) -> Self {
    Self { executor, tracker }
  }

  /// The tracker this orchestrator publishes lifecycle changes to.
  pub fn tracker(&self) -> &TaskStateTracker {
    &self.tracker
  }

  /// Execute a list of tasks sequentially.
  pub async fn run(&self, tasks: &[TaskDefinition], cancel: CancellationToken) -> RunOutcome {
    let run_id = Uuid::new_v4();
    self.run_inner(run_id, tasks, cancel).await
  }

  #[instrument(
    name = "orchestrate",
    skip(self, tasks, cancel),
    fields(%run_id, engine = "sequential", tasks = tasks.len())
  )]
  async fn run_inner(
    &self,
    run_id: Uuid,
    tasks: &[TaskDefinition],
    cancel: CancellationToken,
  ) -> RunOutcome {
    info!("starting orchestration");

    let mut completed: Vec<&TaskDefinition> = Vec::new();

    for task in tasks {
      rollback::publish(&self.tracker, &task.name, TaskState::Running);

      if self.execute_task(task, &cancel).await {
        rollback::publish(&self.tracker, &task.name, TaskState::Completed);
        completed.push(task);
        info!(task = %task.name, "task completed");
      } else {
        rollback::publish(&self.tracker, &task.name, TaskState::Failed);
        error!(task = %task.name, "task failed, starting compensation");

        rollback::compensate_completed_tasks(&self.executor, &self.tracker, &completed).await;

        return RunOutcome::failed(self.tracker.snapshot());
      }
    }

    info!("all tasks completed successfully");
    RunOutcome::succeeded(self.tracker.snapshot())
  }

  /// Execute a single task's steps strictly in declared order.
  #[instrument(name = "task_execute", skip(self, task, cancel), fields(task = %task.name))]
  async fn execute_task(&self, task: &TaskDefinition, cancel: &CancellationToken) -> bool {
    let mut completed_steps: Vec<&StepDefinition> = Vec::new();

    for step in &task.steps {
      match self.executor.execute_step(step, cancel).await {
        Ok(true) => completed_steps.push(step),
        Ok(false) => {
          error!(step = %step.name, "step failed");
          rollback::compensate_steps(&self.executor, &completed_steps).await;
          return false;
        }
        Err(StepError::Cancelled) => {
          warn!(step = %step.name, "step cancelled");
          rollback::compensate_steps(&self.executor, &completed_steps).await;
          return false;
        }
      }
    }

    true
  }
}
