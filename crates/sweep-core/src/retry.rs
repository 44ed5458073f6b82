//! Retry configuration and backoff calculation for partial batch writes.
//!
//! The storage collaborator can report unprocessed items from a batch
//! write. The trash ledger resubmits those items a bounded number of times
//! with a linearly increasing delay; this module holds the portable,
//! sync-only building blocks. The async retry execution lives in
//! `sweep-engine`, which has access to tokio.

use serde::{Deserialize, Serialize};

/// Default maximum retry attempts per chunk.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base delay in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 200;

/// Configuration for batch-write retry logic.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    /// Maximum retry attempts per chunk (default: 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay for linear backoff in ms (default: 200).
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}
fn default_base_delay_ms() -> u64 {
    DEFAULT_BASE_DELAY_MS
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
        }
    }
}

impl RetryConfig {
    /// Linear backoff delay for a 1-based attempt number.
    ///
    /// Formula: `base_delay_ms × attempt`, saturating.
    #[must_use]
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        self.base_delay_ms.saturating_mul(u64::from(attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_config_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_delay_ms, 200);
    }

    #[test]
    fn delay_grows_linearly() {
        let config = RetryConfig {
            max_retries: 3,
            base_delay_ms: 100,
        };
        assert_eq!(config.delay_ms(1), 100);
        assert_eq!(config.delay_ms(2), 200);
        assert_eq!(config.delay_ms(3), 300);
    }

    #[test]
    fn delay_saturates() {
        let config = RetryConfig {
            max_retries: 3,
            base_delay_ms: u64::MAX,
        };
        assert_eq!(config.delay_ms(2), u64::MAX);
    }

    #[test]
    fn serde_defaults_fill_in() {
        let config: RetryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.base_delay_ms, DEFAULT_BASE_DELAY_MS);
    }
}
