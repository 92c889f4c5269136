use async_trait::async_trait;

use crate::error::RunnerError;

/// The command execution capability injected into the step executor.
///
/// `Ok(true)` means the command succeeded, `Ok(false)` that it ran and
/// reported failure, and `Err` that the runner itself failed to invoke it.
#[async_trait]
pub trait CommandRunner: Send + Sync {
  /// Run a command with the given input.
  async fn run(&self, command: &str, input: &str) -> Result<bool, RunnerError>;
}
