//! Category/keyword deduplication registry.
//!
//! One registry lives for exactly one harvest run: the caller constructs it,
//! passes it into the harvester, and persists the snapshots when the run
//! ends. There is no ambient global state and no cross-run reuse.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::parse_timestamp;

/// The two independent taxonomy namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyKind {
    Category,
    Keyword,
}

impl TaxonomyKind {
    /// JSON field carrying the display name in detail payloads.
    const fn name_field(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Keyword => "keyword",
        }
    }
}

/// Metadata for one taxonomy id. The id itself is the map key, matching the
/// persisted `"<id>\t{name,count,timestamp}"` line format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    /// Display label.
    pub name: Option<String>,
    /// Crates referencing this entry, as reported by the registry.
    pub count: Option<u64>,
    /// Creation time, fractional epoch seconds.
    pub timestamp: Option<f64>,
}

/// Process-lifetime mapping from taxonomy id to metadata, first-write-wins.
#[derive(Debug, Default)]
pub struct TaxonomyRegistry {
    categories: BTreeMap<String, TaxonomyEntry>,
    keywords: BTreeMap<String, TaxonomyEntry>,
}

impl TaxonomyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one raw taxonomy item, returning its extracted id.
    ///
    /// The first observation of an id wins; later observations of the same id
    /// are no-ops for that id, however often an entity re-references it. That
    /// means `count` reflects what the registry reported when the id was
    /// first sighted during the run, not the end-of-run value.
    ///
    /// Returns `None` when the item has no string `id`, in which case nothing
    /// is recorded.
    pub fn observe(&mut self, kind: TaxonomyKind, raw: &Value) -> Option<String> {
        let id = raw.get("id").and_then(Value::as_str)?.to_owned();
        self.entries_mut(kind).entry(id.clone()).or_insert_with(|| TaxonomyEntry {
            name: raw
                .get(kind.name_field())
                .and_then(Value::as_str)
                .map(str::to_owned),
            count: raw.get("crates_cnt").and_then(Value::as_u64),
            timestamp: raw
                .get("created_at")
                .and_then(Value::as_str)
                .and_then(parse_timestamp),
        });
        Some(id)
    }

    /// Entries of one namespace, ordered by id ascending for deterministic
    /// serialization.
    pub fn snapshot(&self, kind: TaxonomyKind) -> impl Iterator<Item = (&str, &TaxonomyEntry)> {
        self.entries(kind).iter().map(|(id, entry)| (id.as_str(), entry))
    }

    #[must_use]
    pub fn len(&self, kind: TaxonomyKind) -> usize {
        self.entries(kind).len()
    }

    #[must_use]
    pub fn is_empty(&self, kind: TaxonomyKind) -> bool {
        self.entries(kind).is_empty()
    }

    const fn entries(&self, kind: TaxonomyKind) -> &BTreeMap<String, TaxonomyEntry> {
        match kind {
            TaxonomyKind::Category => &self.categories,
            TaxonomyKind::Keyword => &self.keywords,
        }
    }

    const fn entries_mut(&mut self, kind: TaxonomyKind) -> &mut BTreeMap<String, TaxonomyEntry> {
        match kind {
            TaxonomyKind::Category => &mut self.categories,
            TaxonomyKind::Keyword => &mut self.keywords,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn keyword(id: &str, count: u64) -> Value {
        json!({
            "id": id,
            "keyword": id,
            "crates_cnt": count,
            "created_at": "2015-02-27T11:52:20.000000+00:00"
        })
    }

    #[test]
    fn observe_inserts_and_returns_id() {
        let mut registry = TaxonomyRegistry::new();
        let id = registry.observe(TaxonomyKind::Keyword, &keyword("serde", 900));
        assert_eq!(id.as_deref(), Some("serde"));
        assert_eq!(registry.len(TaxonomyKind::Keyword), 1);

        let (id, entry) = registry.snapshot(TaxonomyKind::Keyword).next().unwrap();
        assert_eq!(id, "serde");
        assert_eq!(entry.name.as_deref(), Some("serde"));
        assert_eq!(entry.count, Some(900));
        assert_eq!(entry.timestamp, Some(1_425_037_940.0));
    }

    #[test]
    fn observe_is_idempotent_beyond_first_insert() {
        let mut registry = TaxonomyRegistry::new();
        registry.observe(TaxonomyKind::Keyword, &keyword("json", 100));
        // Same id, different metadata: the first insert stays.
        registry.observe(TaxonomyKind::Keyword, &keyword("json", 9999));

        assert_eq!(registry.len(TaxonomyKind::Keyword), 1);
        let (_, entry) = registry.snapshot(TaxonomyKind::Keyword).next().unwrap();
        assert_eq!(entry.count, Some(100));
    }

    #[test]
    fn namespaces_are_independent() {
        let mut registry = TaxonomyRegistry::new();
        registry.observe(
            TaxonomyKind::Category,
            &json!({"id": "parsing", "category": "Parsing", "crates_cnt": 5}),
        );
        registry.observe(
            TaxonomyKind::Keyword,
            &json!({"id": "parsing", "keyword": "parsing", "crates_cnt": 70}),
        );

        assert_eq!(registry.len(TaxonomyKind::Category), 1);
        assert_eq!(registry.len(TaxonomyKind::Keyword), 1);
        let (_, category) = registry.snapshot(TaxonomyKind::Category).next().unwrap();
        let (_, kw) = registry.snapshot(TaxonomyKind::Keyword).next().unwrap();
        assert_eq!(category.name.as_deref(), Some("Parsing"));
        assert_eq!(kw.count, Some(70));
    }

    #[test]
    fn snapshot_is_ordered_by_id() {
        let mut registry = TaxonomyRegistry::new();
        for id in ["web", "async", "cli", "macro"] {
            registry.observe(TaxonomyKind::Keyword, &keyword(id, 1));
        }
        let ids: Vec<&str> = registry
            .snapshot(TaxonomyKind::Keyword)
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["async", "cli", "macro", "web"]);
    }

    #[test]
    fn item_without_id_is_ignored() {
        let mut registry = TaxonomyRegistry::new();
        let id = registry.observe(TaxonomyKind::Category, &json!({"category": "Nameless"}));
        assert_eq!(id, None);
        assert!(registry.is_empty(TaxonomyKind::Category));
    }

    #[test]
    fn missing_metadata_fields_stay_null() {
        let mut registry = TaxonomyRegistry::new();
        registry.observe(TaxonomyKind::Keyword, &json!({"id": "bare"}));
        let (_, entry) = registry.snapshot(TaxonomyKind::Keyword).next().unwrap();
        assert_eq!(entry.name, None);
        assert_eq!(entry.count, None);
        assert_eq!(entry.timestamp, None);
    }
}
