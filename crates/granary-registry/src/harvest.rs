//! The paginated harvest loop.
//!
//! One [`HarvestRun`] walks the catalog from page 1 through the page count
//! computed at start, strictly sequentially: list fetch, per-item
//! normalization, optional enrichment (detail fetch + taxonomy observation),
//! then the rate-limiting sleep. Records stream to the caller's sink one at a
//! time; a multi-thousand-entity catalog is never buffered in memory.
//!
//! Failure policy: a list page that exhausts its retries yields zero items,
//! is logged and recorded, and the run continues. A detail fetch that
//! exhausts its retries leaves that record's taxonomy ids `None`; the record
//! itself is still yielded. Only sink (persistence) errors abort the run.

use std::io;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::error::RegistryError;
use crate::record::CrateRecord;
use crate::taxonomy::{TaxonomyKind, TaxonomyRegistry};
use crate::Fetch;

const LIST_ROUTE: &str = "/api/v1/crates";

/// Caller-supplied knobs for one run. No defaults are hard-wired here; the
/// configuration layer owns those.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Items requested per list page.
    pub per_page: u32,
    /// Registry sort order for list pages (e.g. `alpha`).
    pub sort: String,
    /// Sleep after every page, failed or empty pages included.
    pub page_delay: Duration,
    /// Sleep after every enrichment fetch.
    pub detail_delay: Duration,
    /// Whether to fetch per-item detail payloads and populate taxonomy ids.
    pub enrich: bool,
}

/// Errors that abort a run. Page-level fetch failures never appear here.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The bootstrap fetch for `meta.total` failed; without it there is no
    /// page count and no run.
    #[error("registry fetch failed: {0}")]
    Fetch(#[from] RegistryError),

    /// The caller's sink rejected a record (persistence failure).
    #[error("record sink failed: {0}")]
    Sink(#[from] io::Error),
}

/// What happened to one page.
#[derive(Debug, Clone, Copy)]
pub struct PageOutcome {
    pub page: u32,
    /// Records yielded from this page.
    pub items: usize,
    /// True when the list fetch exhausted its retries and the page was
    /// skipped.
    pub failed: bool,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct HarvestReport {
    /// `meta.total` as reported at run start.
    pub total: u64,
    /// Pages walked: `ceil(total / per_page)`.
    pub page_count: u32,
    /// Records yielded to the sink.
    pub yielded: u64,
    /// Pages whose list fetch exhausted retries.
    pub failed_pages: Vec<u32>,
}

/// Drives full-catalog harvests against a [`Fetch`] implementation.
pub struct Harvester<F> {
    fetch: F,
    options: HarvestOptions,
}

impl<F: Fetch> Harvester<F> {
    pub const fn new(fetch: F, options: HarvestOptions) -> Self {
        Self { fetch, options }
    }

    /// Total catalog size as reported by `meta.total` on the first list page.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`RegistryError`] if the fetch exhausts its
    /// retries, or [`RegistryError::Parse`] if the response lacks
    /// `meta.total`.
    pub async fn total(&self) -> Result<u64, RegistryError> {
        let first = self.list_page(1).await?;
        first
            .pointer("/meta/total")
            .and_then(Value::as_u64)
            .ok_or_else(|| RegistryError::Parse("list response missing meta.total".to_owned()))
    }

    /// Start a run: fix the page count from the current total and borrow the
    /// taxonomy registry for the duration of the run.
    ///
    /// The page count is computed exactly once; a total that drifts mid-run
    /// on the server side is not re-queried.
    ///
    /// # Errors
    ///
    /// Fails only when the bootstrap total fetch fails; see [`Self::total`].
    pub async fn begin<'run>(
        &'run self,
        taxonomy: &'run mut TaxonomyRegistry,
    ) -> Result<HarvestRun<'run, F>, RegistryError> {
        let total = self.total().await?;
        let per_page = u64::from(self.options.per_page.max(1));
        let page_count = u32::try_from(total.div_ceil(per_page)).unwrap_or(u32::MAX);
        Ok(HarvestRun {
            harvester: self,
            taxonomy,
            total,
            page_count,
            next_page: 1,
            yielded: 0,
            failed_pages: Vec::new(),
        })
    }

    async fn list_page(&self, page: u32) -> Result<Value, RegistryError> {
        let query = [
            ("page", page.to_string()),
            ("per_page", self.options.per_page.to_string()),
            ("sort", self.options.sort.clone()),
        ];
        self.fetch.fetch_json(LIST_ROUTE, &query).await
    }
}

/// One in-flight run. Non-restartable: pages advance monotonically and the
/// sequence ends strictly after the page count fixed at [`Harvester::begin`].
pub struct HarvestRun<'run, F> {
    harvester: &'run Harvester<F>,
    taxonomy: &'run mut TaxonomyRegistry,
    total: u64,
    page_count: u32,
    next_page: u32,
    yielded: u64,
    failed_pages: Vec<u32>,
}

impl<F: Fetch> HarvestRun<'_, F> {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub const fn page_count(&self) -> u32 {
        self.page_count
    }

    #[must_use]
    pub fn failed_pages(&self) -> &[u32] {
        &self.failed_pages
    }

    /// Process the next page, streaming its records into `sink`, then sleep
    /// the page delay. Returns `None` once all pages are done.
    ///
    /// # Errors
    ///
    /// Only sink failures abort; fetch failures degrade to a skipped page.
    pub async fn next_page<S>(&mut self, sink: &mut S) -> Result<Option<PageOutcome>, HarvestError>
    where
        S: FnMut(CrateRecord) -> io::Result<()>,
    {
        if self.next_page > self.page_count {
            return Ok(None);
        }
        let page = self.next_page;
        self.next_page += 1;

        let mut outcome = PageOutcome {
            page,
            items: 0,
            failed: false,
        };

        match self.harvester.list_page(page).await {
            Err(error) => {
                tracing::warn!(page, %error, "list page failed after retries; skipping");
                self.failed_pages.push(page);
                outcome.failed = true;
            }
            Ok(body) => {
                let items = body
                    .get("crates")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                for raw in items {
                    let mut record = CrateRecord::from_raw(raw);
                    if self.harvester.options.enrich {
                        self.enrich(&mut record).await;
                    }
                    sink(record)?;
                    outcome.items += 1;
                    self.yielded += 1;
                }
            }
        }

        // The rate-limiting contract: the delay happens even for failed or
        // empty pages.
        tokio::time::sleep(self.harvester.options.page_delay).await;
        Ok(Some(outcome))
    }

    /// Drain all remaining pages.
    ///
    /// # Errors
    ///
    /// See [`Self::next_page`].
    pub async fn run<S>(mut self, sink: &mut S) -> Result<HarvestReport, HarvestError>
    where
        S: FnMut(CrateRecord) -> io::Result<()>,
    {
        while self.next_page(sink).await?.is_some() {}
        Ok(self.finish())
    }

    /// End the run, releasing the taxonomy registry borrow.
    #[must_use]
    pub fn finish(self) -> HarvestReport {
        HarvestReport {
            total: self.total,
            page_count: self.page_count,
            yielded: self.yielded,
            failed_pages: self.failed_pages,
        }
    }

    async fn enrich(&mut self, record: &mut CrateRecord) {
        // A record with no name has no detail route; leave its ids unset.
        let Some(name) = record.name.clone() else {
            return;
        };
        let route = format!("{LIST_ROUTE}/{}", urlencoding::encode(&name));
        match self.harvester.fetch.fetch_json(&route, &[]).await {
            Ok(detail) => {
                record.category_ids =
                    self.observe_all(TaxonomyKind::Category, detail.get("categories"));
                record.keyword_ids =
                    self.observe_all(TaxonomyKind::Keyword, detail.get("keywords"));
            }
            Err(error) => {
                tracing::warn!(name = %name, %error, "detail fetch failed; taxonomy ids left unset");
            }
        }
        tokio::time::sleep(self.harvester.options.detail_delay).await;
    }

    fn observe_all(&mut self, kind: TaxonomyKind, list: Option<&Value>) -> Option<Vec<String>> {
        let list = list?.as_array()?;
        Some(
            list.iter()
                .filter_map(|item| self.taxonomy.observe(kind, item))
                .collect(),
        )
    }
}
