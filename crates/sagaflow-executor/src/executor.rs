//! Step executor implementation.

use std::sync::Arc;
use std::time::Duration;

use sagaflow_model::StepDefinition;
use sagaflow_runner::CommandRunner;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::error::StepError;

/// Executes individual steps against the injected command runner.
pub struct StepExecutor {
  runner: Arc<dyn CommandRunner>,
}

impl StepExecutor {
  /// Create a new step executor.
  pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
    Self { runner }
  }

  /// Execute a step's primary command with retry.
  ///
  /// The command is attempted up to `max_retries + 1` times, sleeping for
  /// the policy's fixed delay before every attempt after the first. A runner
  /// error counts as a failed attempt like an explicit failure. Cancellation
  /// aborts the step immediately, whether it arrives during the delay or
  /// while an attempt is running.
  ///
  /// Returns `Ok(false)` once all attempts are exhausted without success.
  #[instrument(
    name = "step_execute",
    skip(self, step, cancel),
    fields(step = %step.name)
  )]
  pub async fn execute_step(
    &self,
    step: &StepDefinition,
    cancel: &CancellationToken,
  ) -> Result<bool, StepError> {
    let max_retries = step.retry_policy.max_retries;
    info!(command = %step.command, max_retries, "step started");

    for attempt in 1..=step.retry_policy.max_attempts() {
      if cancel.is_cancelled() {
        warn!("step cancelled");
        return Err(StepError::Cancelled);
      }

      if attempt > 1 {
        info!(attempt, max_retries, "retrying step");
        let delay = Duration::from_millis(step.retry_policy.retry_delay_ms);
        tokio::select! {
          _ = tokio::time::sleep(delay) => {}
          _ = cancel.cancelled() => {
            warn!("step cancelled during retry delay");
            return Err(StepError::Cancelled);
          }
        }
      }

      let outcome = tokio::select! {
        outcome = self.runner.run(&step.command, &step.input) => outcome,
        _ = cancel.cancelled() => {
          warn!(attempt, "step cancelled mid-attempt");
          return Err(StepError::Cancelled);
        }
      };

      match outcome {
        Ok(true) => {
          info!(attempt, "step succeeded");
          return Ok(true);
        }
        Ok(false) => {
          warn!(attempt, "step attempt failed");
        }
        Err(e) => {
          error!(attempt, error = %e, "step attempt raised an error");
        }
      }
    }

    error!(
      attempts = step.retry_policy.max_attempts(),
      "step failed after exhausting all attempts"
    );
    Ok(false)
  }

  /// Execute a step's compensating command.
  ///
  /// A no-op success when the step has no compensating command. Otherwise
  /// the runner is invoked exactly once with the compensating command and
  /// the step's original input; a raised error is caught and reported as a
  /// failed compensation. Compensation is never retried.
  #[instrument(
    name = "step_compensate",
    skip(self, step),
    fields(step = %step.name)
  )]
  pub async fn execute_compensation(&self, step: &StepDefinition) -> bool {
    let Some(command) = step.compensation_command() else {
      info!("no compensation command defined");
      return true;
    };

    info!(command, "compensation started");

    match self.runner.run(command, &step.input).await {
      Ok(true) => {
        info!("compensation succeeded");
        true
      }
      Ok(false) => {
        error!("compensation failed");
        false
      }
      Err(e) => {
        error!(error = %e, "compensation raised an error");
        false
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use sagaflow_model::RetryPolicy;
  use sagaflow_runner::{RunnerError, ScriptedCommandRunner};

  use super::*;

  fn executor() -> (Arc<ScriptedCommandRunner>, StepExecutor) {
    let runner = Arc::new(ScriptedCommandRunner::new());
    let executor = StepExecutor::new(Arc::clone(&runner) as Arc<dyn CommandRunner>);
    (runner, executor)
  }

  #[tokio::test(start_paused = true)]
  async fn successful_step_runs_once() {
    let (runner, executor) = executor();
    let step = StepDefinition::new("create", "create-order", "order-1")
      .with_retry_policy(RetryPolicy::with_max_retries(5));

    let result = executor
      .execute_step(&step, &CancellationToken::new())
      .await
      .unwrap();

    assert!(result);
    assert_eq!(runner.commands(), vec!["create-order"]);
  }

  #[tokio::test(start_paused = true)]
  async fn always_failing_step_is_attempted_max_retries_plus_one_times() {
    let (runner, executor) = executor();
    let step = StepDefinition::new("doomed", "FAIL", "x").with_retry_policy(RetryPolicy {
      max_retries: 2,
      retry_delay_ms: 50,
    });

    let started = tokio::time::Instant::now();
    let result = executor
      .execute_step(&step, &CancellationToken::new())
      .await
      .unwrap();

    assert!(!result);
    assert_eq!(runner.commands().len(), 3);
    // Two retries, each preceded by the fixed 50ms delay.
    assert_eq!(started.elapsed(), Duration::from_millis(100));
  }

  #[tokio::test(start_paused = true)]
  async fn step_succeeds_after_transient_failures() {
    let (runner, executor) = executor();
    runner.script("flaky", [Ok(false), Err(RunnerError::transient("timeout"))]);

    let step = StepDefinition::new("flaky", "flaky", "x")
      .with_retry_policy(RetryPolicy::with_max_retries(2));

    let result = executor
      .execute_step(&step, &CancellationToken::new())
      .await
      .unwrap();

    // Third attempt falls back to scripted success.
    assert!(result);
    assert_eq!(runner.commands().len(), 3);
  }

  #[tokio::test(start_paused = true)]
  async fn runner_error_on_last_attempt_exhausts_the_step() {
    let (runner, executor) = executor();
    runner.script("broken", [Err(RunnerError::transient("down"))]);

    let step = StepDefinition::new("broken", "broken", "x");

    let result = executor
      .execute_step(&step, &CancellationToken::new())
      .await
      .unwrap();

    assert!(!result);
    assert_eq!(runner.commands().len(), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn cancelled_before_start_makes_no_attempts() {
    let (runner, executor) = executor();
    let step = StepDefinition::new("never", "create-order", "x");

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = executor.execute_step(&step, &cancel).await;
    assert!(matches!(result, Err(StepError::Cancelled)));
    assert!(runner.commands().is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn cancellation_during_retry_delay_aborts_the_step() {
    let runner = Arc::new(ScriptedCommandRunner::new());
    let step = StepDefinition::new("doomed", "FAIL", "x").with_retry_policy(RetryPolicy {
      max_retries: 5,
      retry_delay_ms: 60_000,
    });

    let runner_clone = Arc::clone(&runner);
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();

    let handle = tokio::spawn(async move {
      let executor = StepExecutor::new(runner_clone as Arc<dyn CommandRunner>);
      executor.execute_step(&step, &cancel_clone).await
    });

    // Let the first attempt fail and the retry delay begin.
    tokio::time::sleep(Duration::from_millis(10)).await;
    cancel.cancel();

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(StepError::Cancelled)));
    assert_eq!(runner.commands().len(), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn cancellation_mid_attempt_aborts_the_step() {
    let (runner, executor) = executor();
    runner.set_latency("slow", Duration::from_secs(60));

    let step = StepDefinition::new("slow", "slow", "x");
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();

    tokio::spawn(async move {
      tokio::time::sleep(Duration::from_millis(10)).await;
      cancel_clone.cancel();
    });

    let result = executor.execute_step(&step, &cancel).await;
    assert!(matches!(result, Err(StepError::Cancelled)));
  }

  #[tokio::test(start_paused = true)]
  async fn compensation_without_command_is_a_successful_no_op() {
    let (runner, executor) = executor();
    let step = StepDefinition::new("plain", "create-order", "x");

    assert!(executor.execute_compensation(&step).await);
    assert!(runner.commands().is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn compensation_runs_once_with_the_original_input() {
    let (runner, executor) = executor();
    let step = StepDefinition::new("create", "create-order", "order-9")
      .with_compensation("cancel-order");

    assert!(executor.execute_compensation(&step).await);

    let invocations = runner.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].command, "cancel-order");
    assert_eq!(invocations[0].input, "order-9");
  }

  #[tokio::test(start_paused = true)]
  async fn failed_compensation_is_reported_and_never_retried() {
    let (runner, executor) = executor();
    let step = StepDefinition::new("create", "create-order", "x")
      .with_compensation("FAIL")
      .with_retry_policy(RetryPolicy::with_max_retries(5));

    assert!(!executor.execute_compensation(&step).await);
    assert_eq!(runner.commands(), vec!["FAIL"]);
  }

  #[tokio::test(start_paused = true)]
  async fn compensation_runner_error_is_caught() {
    let (runner, executor) = executor();
    runner.script("undo", [Err(RunnerError::transient("gone"))]);

    let step = StepDefinition::new("create", "create-order", "x").with_compensation("undo");

    assert!(!executor.execute_compensation(&step).await);
  }
}
