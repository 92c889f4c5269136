//! Step execution errors.

/// Errors that abort a step outright instead of counting as a failed attempt.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
  /// Step execution was cancelled. No further attempts are made.
  #[error("step cancelled")]
  Cancelled,
}
