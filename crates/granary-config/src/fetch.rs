//! Retry behavior for the network-facing fetcher.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_max_attempts() -> u32 {
    7
}

const fn default_backoff_secs() -> f64 {
    7.0
}

const fn default_timeout_secs() -> f64 {
    10.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Attempts per fetch before surfacing exhaustion.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Flat wait between attempts, in seconds.
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: f64,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
}

impl FetchConfig {
    #[must_use]
    pub fn backoff(&self) -> Duration {
        Duration::from_secs_f64(self.backoff_secs.max(0.0))
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs.max(0.0))
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
