//! Concurrent orchestration engine.

use std::sync::Arc;

use sagaflow_executor::{StepError, StepExecutor};
use sagaflow_model::{StepDefinition, TaskDefinition, TaskState};
use sagaflow_tracker::TaskStateTracker;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::outcome::RunOutcome;
use crate::rollback;

/// Default worker pool capacity.
pub const DEFAULT_WORKER_CAPACITY: usize = 10;

/// Runs tasks one at a time, with all steps of the current task dispatched
/// concurrently to a bounded worker pool.
///
/// Every dispatched step is joined before the task's outcome is decided; a
/// failing step does not cancel siblings already in flight. Successes are
/// collected by position in the step list, and compensation walks that
/// declared order in reverse - never wall-clock completion order - so
/// rollback is deterministic across runs even though execution timing is
/// not. Task-level and cross-task compensation are identical to the
/// sequential engine.
pub struct ConcurrentOrchestrator {
  executor: Arc<StepExecutor>,
  tracker: Arc<TaskStateTracker>,
  permits: Arc<Semaphore>,
  capacity: usize,
}

impl ConcurrentOrchestrator {
  /// Create an orchestrator with the default worker capacity.
  pub fn new(executor: Arc<StepExecutor>, tracker: Arc<TaskStateTracker>) -> Self {
    Self::with_capacity(executor, tracker, DEFAULT_WORKER_CAPACITY)
  }

  /// Create an orchestrator with an explicit worker capacity.
  ///
  /// The capacity bounds the number of steps running in parallel. The pool
  /// is reused across tasks for the lifetime of the orchestrator.
  ///
  /// # Panics
  /// Panics if `capacity` is zero.
  pub fn with_capacity(
    executor: Arc<StepExecutor>,
    tracker: Arc<TaskStateTracker>,
    capacity: usize,
  ) -> Self {
    assert!(capacity > 0, "worker capacity must be at least 1");
    Self {
      executor,
      tracker,
      permits: Arc::new(Semaphore::new(capacity)),
      capacity,
    }
  }

  /// The worker pool capacity.
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// The tracker this orchestrator publishes lifecycle changes to.
  pub fn tracker(&self) -> &TaskStateTracker {
    &self.tracker
  }

  /// Close the worker pool.
  ///
  /// Steps dispatched after shutdown report as cancelled; steps already
  /// holding a permit run to completion.
  pub fn shutdown(&self) {
    self.permits.close();
  }

  /// Execute a list of tasks, fanning each task's steps out to the pool.
  pub async fn run(&self, tasks: &[TaskDefinition], cancel: CancellationToken) -> RunOutcome {
    let run_id = Uuid::new_v4();
    self.run_inner(run_id, tasks, cancel).await
  }

  #[instrument(
    name = "orchestrate",
    skip(self, tasks, cancel),
    fields(%run_id, engine = "concurrent", tasks = tasks.len())
  )]
  async fn run_inner(
    &self,
    run_id: Uuid,
    tasks: &[TaskDefinition],
    cancel: CancellationToken,
  ) -> RunOutcome {
    info!(capacity = self.capacity, "starting orchestration");

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

  /// Execute a single task with its steps fanned out to the worker pool.
  #[instrument(name = "task_execute", skip(self, task, cancel), fields(task = %task.name))]
  async fn execute_task(&self, task: &TaskDefinition, cancel: &CancellationToken) -> bool {
    // Dispatch every step before waiting on any of them. A failing step
    // never cancels siblings already in flight.
    let handles: Vec<_> = task
      .steps
      .iter()
      .map(|step| {
        let executor = Arc::clone(&self.executor);
        let permits = Arc::clone(&self.permits);
        let step = step.clone();
        let cancel = cancel.clone();

        tokio::spawn(async move {
          let _permit = match permits.acquire_owned().await {
            Ok(permit) => permit,
            // Pool shut down: the step never runs.
            Err(_) => return Err(StepError::Cancelled),
          };
          executor.execute_step(&step, &cancel).await
        })
      })
      .collect();

    // Full join: every dispatched step finishes before the verdict.
    let results = futures::future::join_all(handles).await;

    let mut succeeded: Vec<usize> = Vec::new();
    let mut all_ok = true;

    // Walk the step list in declared order, not completion order.
    for (index, result) in results.into_iter().enumerate() {
      let step = &task.steps[index];
      match result {
        Ok(Ok(true)) => succeeded.push(index),
        Ok(Ok(false)) => {
          all_ok = false;
          error!(step = %step.name, "step failed");
        }
        Ok(Err(StepError::Cancelled)) => {
          all_ok = false;
          warn!(step = %step.name, "step cancelled");
        }
        Err(e) => {
          all_ok = false;
          error!(step = %step.name, error = %e, "step task panicked");
        }
      }
    }

    if !all_ok {
      let completed: Vec<&StepDefinition> =
        succeeded.iter().map(|&index| &task.steps[index]).collect();
      rollback::compensate_steps(&self.executor, &completed).await;
      return false;
    }

    true
  }
}
