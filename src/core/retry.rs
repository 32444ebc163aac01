//! Retry policy for failed sink writes
//!
//! A failed write is retried after a backoff delay with [`DELAYED_MARKER`]
//! appended to the line. Once the retries are exhausted the line is dropped
//! and counted in the logger metrics.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Suffix appended to a line on every retry
pub const DELAYED_MARKER: &str = " <--DELAYED";

/// Bounded exponential backoff
///
/// # Example
///
/// ```
/// use callsite_logger::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.delay_for(0), Duration::from_millis(5));
/// assert_eq!(policy.delay_for(1), Duration::from_millis(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: u32,
}

impl RetryPolicy {
    /// Never retry; the first failure drops the line
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (zero based), capped at `max_delay_ms`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.multiplier.max(1)).saturating_pow(attempt);
        let millis = self
            .initial_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms);
        Duration::from_millis(millis)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 5,
            max_delay_ms: 500,
            multiplier: 2,
        }
    }
}
