//! Command runner errors.

/// Errors raised by a command runner.
///
/// A raised error is treated by the step executor as a failed attempt:
/// retried for primary commands, reported as a failed compensation for
/// compensating commands.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
  /// The runner could not invoke the command; the attempt may be retried.
  #[error("transient runner failure: {message}")]
  Transient { message: String },
}

impl RunnerError {
  /// Convenience constructor for transient failures.
  pub fn transient(message: impl Into<String>) -> Self {
    Self::Transient {
      message: message.into(),
    }
  }
}
