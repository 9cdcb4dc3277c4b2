//! Shared HTTP helpers: status-code checks and the bounded retry loop.
//!
//! Centralizes 429 handling (with `Retry-After` parsing) and non-success
//! status mapping so the client stays focused on request construction. The
//! retry loop is generic over the attempt future so it can be exercised
//! without a network.

use std::future::Future;
use std::time::Duration;

use crate::error::RegistryError;

/// Bounds for one fetch: attempt count, the flat inter-attempt wait, and the
/// per-request timeout.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts per fetch (at least 1).
    pub max_attempts: u32,
    /// Flat wait between attempts. Not exponential; the upstream registry
    /// rate-limits per caller, so a fixed cadence is the contract.
    pub backoff: Duration,
    /// Timeout applied to each individual request.
    pub timeout: Duration,
}

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** -> [`RegistryError::RateLimited`] with
///   `Retry-After` header parsing (falls back to 60 s if absent or
///   unparseable).
/// - **Non-success status** -> [`RegistryError::Api`] with status code and
///   response body.
pub async fn check_response(
    resp: reqwest::Response,
) -> Result<reqwest::Response, RegistryError> {
    if resp.status() == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(RegistryError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if !resp.status().is_success() {
        return Err(RegistryError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

/// Run `attempt` up to `policy.max_attempts` times with a flat wait between
/// attempts, surfacing [`RegistryError::Exhausted`] with the last error once
/// the bound is hit.
///
/// A 429 extends the wait to the server's `Retry-After` when that is larger
/// than the configured backoff; the attempt count is unaffected.
pub(crate) async fn with_retries<T, F, Fut>(
    policy: RetryPolicy,
    route: &str,
    mut attempt: F,
) -> Result<T, RegistryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RegistryError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts = 1;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(source) if attempts >= max_attempts => {
                return Err(RegistryError::Exhausted {
                    attempts,
                    source: Box::new(source),
                });
            }
            Err(error) => {
                let wait = retry_wait(policy, &error);
                tracing::debug!(route, attempts, %error, "fetch attempt failed; retrying");
                tokio::time::sleep(wait).await;
                attempts += 1;
            }
        }
    }
}

fn retry_wait(policy: RetryPolicy, error: &RegistryError) -> Duration {
    match error {
        RegistryError::RateLimited { retry_after_secs } => {
            policy.backoff.max(Duration::from_secs(*retry_after_secs))
        }
        _ => policy.backoff,
    }
}
