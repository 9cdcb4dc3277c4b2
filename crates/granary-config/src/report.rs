//! Leaderboard report settings.

use serde::{Deserialize, Serialize};

const fn default_size() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Rows per leaderboard column.
    #[serde(default = "default_size")]
    pub size: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
        }
    }
}
