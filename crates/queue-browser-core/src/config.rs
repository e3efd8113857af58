//! Browser configuration.

use crate::error::ConfigurationError;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Default bound on a single get-next call, in milliseconds
pub const DEFAULT_WAIT_INTERVAL_MS: u64 = 5000;

/// Largest accepted wait interval, in milliseconds
pub const MAX_WAIT_INTERVAL_MS: u64 = 600_000;

/// Configuration for [`BoundedMessageBrowser`](crate::browser::BoundedMessageBrowser)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Bound on each get-next call, in milliseconds
    pub wait_interval_ms: u64,

    /// Apply identifier filters to every read of a limited retrieval instead of
    /// letting the limit take precedence over them
    pub combine_limit_and_filter: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            wait_interval_ms: DEFAULT_WAIT_INTERVAL_MS,
            combine_limit_and_filter: false,
        }
    }
}

impl BrowserConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.wait_interval_ms == 0 || self.wait_interval_ms > MAX_WAIT_INTERVAL_MS {
            return Err(ConfigurationError::Invalid {
                message: format!(
                    "wait_interval_ms must be between 1 and {}, got {}",
                    MAX_WAIT_INTERVAL_MS, self.wait_interval_ms
                ),
            });
        }

        Ok(())
    }

    pub fn wait_interval(&self) -> Duration {
        Duration::milliseconds(self.wait_interval_ms as i64)
    }

    pub fn with_wait_interval_ms(mut self, wait_interval_ms: u64) -> Self {
        self.wait_interval_ms = wait_interval_ms;
        self
    }

    pub fn with_combine_limit_and_filter(mut self, combine: bool) -> Self {
        self.combine_limit_and_filter = combine;
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
