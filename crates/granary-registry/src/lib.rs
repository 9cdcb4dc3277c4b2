//! # granary-registry
//!
//! crates.io catalog harvesting client.
//!
//! The pieces, leaves first:
//! - [`RegistryClient`]: the sole network-facing primitive; one HTTP GET with
//!   bounded retry and a flat inter-attempt wait.
//! - [`CrateRecord`]: raw list items normalized into the persisted schema.
//! - [`TaxonomyRegistry`]: first-write-wins category/keyword dedup, scoped to
//!   one harvest run.
//! - [`Harvester`]/[`HarvestRun`]: the sequential page loop with enrichment,
//!   rate-limiting delays, and page-level failure tolerance.
//!
//! Everything network-shaped goes through the [`Fetch`] trait so the loop can
//! be exercised with scripted fakes.

pub mod error;
pub mod harvest;
mod http;
pub mod record;
pub mod taxonomy;

pub use error::RegistryError;
pub use harvest::{HarvestError, HarvestOptions, HarvestReport, HarvestRun, Harvester, PageOutcome};
pub use http::RetryPolicy;
pub use record::CrateRecord;
pub use taxonomy::{TaxonomyEntry, TaxonomyKind, TaxonomyRegistry};

use serde_json::Value;

/// Production base URL.
pub const CRATES_IO_BASE_URL: &str = "https://crates.io";

/// A JSON GET against the registry. The harvester is generic over this seam.
pub trait Fetch {
    /// Fetch `route` (plus `query`) and decode the body as JSON.
    ///
    /// Implementations own their retry behavior; by the time an `Err` comes
    /// back here, the caller treats the fetch as spent.
    fn fetch_json(
        &self,
        route: &str,
        query: &[(&str, String)],
    ) -> impl std::future::Future<Output = Result<Value, RegistryError>>;
}

/// HTTP client for the crates.io v1 API with bounded-retry fetches.
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
}

impl RegistryClient {
    /// Create a client against the production registry.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_base_url(CRATES_IO_BASE_URL, policy)
    }

    /// Create a client against an arbitrary base URL.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(concat!("granary/", env!("CARGO_PKG_VERSION")))
                .timeout(policy.timeout)
                .build()
                .expect("reqwest client should build"),
            base_url: base_url.into(),
            policy,
        }
    }

    async fn attempt(&self, route: &str, query: &[(&str, String)]) -> Result<Value, RegistryError> {
        let url = request_url(&self.base_url, route, query);
        let resp = http::check_response(self.http.get(url).send().await?).await?;
        Ok(resp.json().await?)
    }
}

fn request_url(base_url: &str, route: &str, query: &[(&str, String)]) -> String {
    let mut url = format!("{base_url}{route}");
    for (index, (key, value)) in query.iter().enumerate() {
        let separator = if index == 0 { '?' } else { '&' };
        url.push(separator);
        url.push_str(key);
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}

impl Fetch for RegistryClient {
    async fn fetch_json(
        &self,
        route: &str,
        query: &[(&str, String)],
    ) -> Result<Value, RegistryError> {
        http::with_retries(self.policy, route, || self.attempt(route, query)).await
    }
}
