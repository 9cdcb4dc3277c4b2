//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A taxonomy line did not match `"<id>\t<json>"`.
    #[error("malformed line {line} in {path}")]
    MalformedLine {
        /// File containing the bad line.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
    },
}
