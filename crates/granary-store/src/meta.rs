//! Run metadata: wall-clock bounds of one harvest.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Contents of `time.json`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    /// Harvest start, fractional epoch seconds.
    pub start: f64,
    /// Harvest end, fractional epoch seconds.
    pub end: f64,
}

/// Current wall-clock time as fractional epoch seconds.
#[must_use]
pub fn epoch_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
