use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::RunnerError;
use crate::runner::CommandRunner;
use crate::simulated::FAIL_COMMAND;

/// A single recorded command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub command: String,
  pub input: String,
}

/// A deterministic command runner for tests.
///
/// Outcomes can be scripted per command and are consumed in FIFO order; once
/// a command's script is exhausted (or if it was never scripted) the runner
/// falls back to the simulated convention: [`FAIL_COMMAND`] fails, everything
/// else succeeds. Every invocation is recorded, and the peak number of
/// concurrently running commands is tracked so tests can assert worker-pool
/// bounds.
#[derive(Default)]
pub struct ScriptedCommandRunner {
  scripts: Mutex<HashMap<String, VecDeque<Result<bool, RunnerError>>>>,
  latencies: Mutex<HashMap<String, Duration>>,
  invocations: Mutex<Vec<Invocation>>,
  in_flight: AtomicUsize,
  max_in_flight: AtomicUsize,
}

impl ScriptedCommandRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Script outcomes for a command, consumed one per invocation.
  pub fn script(
    &self,
    command: impl Into<String>,
    outcomes: impl IntoIterator<Item = Result<bool, RunnerError>>,
  ) {
    self
      .scripts
      .lock()
      .entry(command.into())
      .or_default()
      .extend(outcomes);
  }

  /// Give a command a fixed latency, so tests can force completion-order
  /// differences under the concurrent engine.
  pub fn set_latency(&self, command: impl Into<String>, latency: Duration) {
    self.latencies.lock().insert(command.into(), latency);
  }

  /// All invocations recorded so far, in invocation-start order.
  pub fn invocations(&self) -> Vec<Invocation> {
    self.invocations.lock().clone()
  }

  /// The command names of all invocations recorded so far.
  pub fn commands(&self) -> Vec<String> {
    self
      .invocations
      .lock()
      .iter()
      .map(|i| i.command.clone())
      .collect()
  }

  /// Peak number of commands running at the same time.
  pub fn max_in_flight(&self) -> usize {
    self.max_in_flight.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl CommandRunner for ScriptedCommandRunner {
  async fn run(&self, command: &str, input: &str) -> Result<bool, RunnerError> {
    self.invocations.lock().push(Invocation {
      command: command.to_string(),
      input: input.to_string(),
    });

    let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    self.max_in_flight.fetch_max(running, Ordering::SeqCst);

    let latency = self.latencies.lock().get(command).copied();
    if let Some(latency) = latency {
      tokio::time::sleep(latency).await;
    }

    let scripted = self
      .scripts
      .lock()
      .get_mut(command)
      .and_then(VecDeque::pop_front);

    self.in_flight.fetch_sub(1, Ordering::SeqCst);

    match scripted {
      Some(outcome) => outcome,
      None => Ok(command != FAIL_COMMAND),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn scripted_outcomes_are_consumed_then_fall_back() {
    let runner = ScriptedCommandRunner::new();
    runner.script("flaky", [Ok(false), Err(RunnerError::transient("boom"))]);

    assert!(!runner.run("flaky", "in").await.unwrap());
    assert!(runner.run("flaky", "in").await.is_err());
    // Script exhausted: falls back to success.
    assert!(runner.run("flaky", "in").await.unwrap());
    // Unscripted FAIL keeps the simulated convention.
    assert!(!runner.run(FAIL_COMMAND, "in").await.unwrap());

    assert_eq!(runner.commands(), vec!["flaky", "flaky", "flaky", "FAIL"]);
  }

  #[tokio::test]
  async fn invocations_record_command_and_input() {
    let runner = ScriptedCommandRunner::new();
    runner.run("charge", "card-7").await.unwrap();

    assert_eq!(
      runner.invocations(),
      vec![Invocation {
        command: "charge".to_string(),
        input: "card-7".to_string(),
      }]
    );
  }
}
