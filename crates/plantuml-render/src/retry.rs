//! Retry policy for PlantUML requests
//!
//! The public PlantUML server intermittently answers `403 Forbidden` to
//! requests that succeed moments later. A rejected request is reissued once
//! after a fixed delay; every other status and every network error is final.

use std::time::Duration;

/// Status that triggers the single retry
pub const RETRY_STATUS: u16 = 403;

/// Delay before the retry
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Configuration for retry behavior
///
/// # Example
///
/// ```rust
/// use plantuml_render::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default().with_delay(Duration::from_millis(500));
/// assert!(policy.should_retry(403, 0));
/// assert!(!policy.should_retry(403, 1));
/// assert!(!policy.should_retry(503, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fixed delay between the first attempt and the retry
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default two-second delay
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delay before the retry
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Maximum number of retries after the first attempt
    pub fn max_retries(&self) -> u32 {
        1
    }

    /// Whether a response with `status` on attempt `retries_done` is reissued
    pub fn should_retry(&self, status: u16, retries_done: u32) -> bool {
        status == RETRY_STATUS && retries_done < self.max_retries()
    }
}
