//! Registry error types.

use thiserror::Error;

/// Errors that can occur when talking to the crates.io API.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// HTTP transport error (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The registry returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the registry.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The registry returned a 429 Too Many Requests response.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The response decoded but did not have the expected shape.
    #[error("malformed response: {0}")]
    Parse(String),

    /// All retry attempts for one fetch were used up.
    ///
    /// Carries the last underlying error. Each fetch gets its own fresh
    /// attempt counter; there is no retry budget shared across calls.
    #[error("fetch exhausted after {attempts} attempts")]
    Exhausted {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// The error from the final attempt.
        #[source]
        source: Box<RegistryError>,
    },
}
