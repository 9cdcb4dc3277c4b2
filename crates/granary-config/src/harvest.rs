//! Harvest loop configuration: page size, sort order, rate-limiting delays.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_per_page() -> u32 {
    100
}

fn default_sort() -> String {
    "alpha".to_owned()
}

const fn default_page_delay_secs() -> f64 {
    1.0
}

const fn default_detail_delay_secs() -> f64 {
    0.7
}

const fn default_enrich() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HarvestConfig {
    /// Items requested per list page (crates.io caps this at 100).
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Registry sort order for list pages.
    #[serde(default = "default_sort")]
    pub sort: String,

    /// Sleep after each list page, in seconds.
    #[serde(default = "default_page_delay_secs")]
    pub page_delay_secs: f64,

    /// Sleep after each enrichment fetch, in seconds.
    #[serde(default = "default_detail_delay_secs")]
    pub detail_delay_secs: f64,

    /// Whether to enrich records with per-item detail fetches.
    #[serde(default = "default_enrich")]
    pub enrich: bool,
}

impl HarvestConfig {
    #[must_use]
    pub fn page_delay(&self) -> Duration {
        Duration::from_secs_f64(self.page_delay_secs.max(0.0))
    }

    #[must_use]
    pub fn detail_delay(&self) -> Duration {
        Duration::from_secs_f64(self.detail_delay_secs.max(0.0))
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            sort: default_sort(),
            page_delay_secs: default_page_delay_secs(),
            detail_delay_secs: default_detail_delay_secs(),
            enrich: default_enrich(),
        }
    }
}
