use serde::{Deserialize, Serialize};

/// Default delay between retry attempts, in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Retry policy for a step's primary command.
///
/// A step is attempted `max_retries + 1` times in total, with a fixed
/// `retry_delay_ms` sleep before every attempt after the first. The policy
/// never applies to compensation, which runs exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
  /// Number of retries after the initial attempt.
  #[serde(default)]
  pub max_retries: u32,
  /// Fixed delay between attempts, in milliseconds (no backoff growth).
  #[serde(default = "default_retry_delay_ms")]
  pub retry_delay_ms: u64,
}

impl RetryPolicy {
  /// Create a policy with the given retry count and the default delay.
  pub fn with_max_retries(max_retries: u32) -> Self {
    Self {
      max_retries,
      retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
    }
  }

  /// Total number of attempts this policy allows.
  pub fn max_attempts(&self) -> u32 {
    self.max_retries + 1
  }
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_retries: 0,
      retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
    }
  }
}

fn default_retry_delay_ms() -> u64 {
  DEFAULT_RETRY_DELAY_MS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_policy_is_single_attempt_with_one_second_delay() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_retries, 0);
    assert_eq!(policy.retry_delay_ms, 1000);
    assert_eq!(policy.max_attempts(), 1);
  }

  #[test]
  fn partial_document_fills_in_defaults() {
    let policy: RetryPolicy = serde_json::from_str(r#"{"maxRetries": 3}"#).unwrap();
    assert_eq!(policy.max_retries, 3);
    assert_eq!(policy.retry_delay_ms, 1000);

    let policy: RetryPolicy = serde_json::from_str(r#"{"retryDelayMs": 50}"#).unwrap();
    assert_eq!(policy.max_retries, 0);
    assert_eq!(policy.retry_delay_ms, 50);
  }
}
