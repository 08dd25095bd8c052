//! Exponential backoff with jitter for rate-limited requests.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use voisinage_core::defaults::{RETRY_BASE_DELAY_MS, RETRY_MAX_JITTER_MS, RETRY_MAX_RETRIES};
use voisinage_core::{Cancellation, Error, Result};

/// How many times, and how patiently, to retry after HTTP 429.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    #[serde(default = "RetryPolicy::default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "RetryPolicy::default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "RetryPolicy::default_max_jitter_ms")]
    pub max_jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: Self::default_max_retries(),
            base_delay_ms: Self::default_base_delay_ms(),
            max_jitter_ms: Self::default_max_jitter_ms(),
        }
    }
}

impl RetryPolicy {
    fn default_max_retries() -> u32 {
        RETRY_MAX_RETRIES
    }

    fn default_base_delay_ms() -> u64 {
        RETRY_BASE_DELAY_MS
    }

    fn default_max_jitter_ms() -> u64 {
        RETRY_MAX_JITTER_MS
    }

    /// Deterministic part of the delay: `base * 2^attempt`.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }

    /// Delay before retry number `attempt` (0-based), jitter included.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let jitter = if self.max_jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..self.max_jitter_ms)
        };
        self.base_delay(attempt).saturating_add(Duration::from_millis(jitter))
    }

    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

/// Sleep for `delay`, returning early with [`Error::Cancelled`] if the
/// signal fires first.
pub async fn sleep_or_cancel(delay: Duration, cancel: &Cancellation) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    tokio::select! {
        _ = tokio::time::sleep(delay) => Ok(()),
        _ = cancel.cancelled() => Err(Error::Cancelled),
    }
}
