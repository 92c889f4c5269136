use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::RunnerError;
use crate::runner::CommandRunner;

/// Command name that the simulated runner treats as a failure.
pub const FAIL_COMMAND: &str = "FAIL";

/// A simulated command runner.
///
/// Every command succeeds after a fixed simulated latency, except the
/// literal [`FAIL_COMMAND`], which reports failure. This is the default
/// runner wired into the CLI so workflows can be exercised end to end
/// without any real side effects.
pub struct SimulatedCommandRunner {
  latency: Duration,
}

impl SimulatedCommandRunner {
  /// Create a runner with the given simulated processing latency.
  pub fn new(latency: Duration) -> Self {
    Self { latency }
  }
}

impl Default for SimulatedCommandRunner {
  fn default() -> Self {
    Self::new(Duration::from_millis(100))
  }
}

#[async_trait]
impl CommandRunner for SimulatedCommandRunner {
  async fn run(&self, command: &str, input: &str) -> Result<bool, RunnerError> {
    info!(command, input, "executing command");

    tokio::time::sleep(self.latency).await;

    if command == FAIL_COMMAND {
      warn!(command, "command failed (simulated failure)");
      return Ok(false);
    }

    info!(command, "command executed successfully");
    Ok(true)
  }
}
