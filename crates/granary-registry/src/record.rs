//! Normalization of raw catalog items into the persisted record shape.
//!
//! [`CrateRecord::from_raw`] is total over any JSON value, and each field is
//! extracted independently: a missing or type-mismatched field maps to `None`
//! without touching its neighbors. The harvester relies on this to never lose
//! an entity, or a valid field, to a weird list item.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One normalized catalog package, immutable after enrichment.
///
/// Serialized field names (camelCase) are the persisted line format, so this
/// struct is the external schema. `categoryIds`/`keywordIds` distinguish
/// "enrichment not attempted or failed" (`None`) from "enrichment succeeded
/// with zero matches" (`Some(vec![])`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrateRecord {
    /// Unique id within one harvest run.
    pub name: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub documentation: Option<String>,
    /// Opaque pass-through blob; never interpreted.
    pub badges: Option<Value>,
    /// Epoch seconds, fractional.
    pub created_at: Option<f64>,
    /// Epoch seconds, fractional.
    pub updated_at: Option<f64>,
    pub downloads_all: Option<u64>,
    pub downloads_recent: Option<u64>,
    pub version_max_stable: Option<String>,
    pub version_max: Option<String>,
    pub version_newest: Option<String>,
    /// Ordered category ids discovered during enrichment.
    pub category_ids: Option<Vec<String>>,
    /// Ordered keyword ids discovered during enrichment.
    pub keyword_ids: Option<Vec<String>>,
}

impl CrateRecord {
    /// Normalize one raw list item. Total: never fails, and fields degrade
    /// one at a time.
    #[must_use]
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            name: string_field(raw, "name"),
            description: string_field(raw, "description"),
            homepage: string_field(raw, "homepage"),
            repository: string_field(raw, "repository"),
            documentation: string_field(raw, "documentation"),
            badges: raw
                .get("badges")
                .filter(|value| !value.is_null())
                .cloned(),
            created_at: timestamp_field(raw, "created_at"),
            updated_at: timestamp_field(raw, "updated_at"),
            downloads_all: count_field(raw, "downloads"),
            downloads_recent: count_field(raw, "recent_downloads"),
            version_max_stable: string_field(raw, "max_stable_version"),
            version_max: string_field(raw, "max_version"),
            version_newest: string_field(raw, "newest_version"),
            category_ids: None,
            keyword_ids: None,
        }
    }
}

fn string_field(raw: &Value, field: &str) -> Option<String> {
    raw.get(field).and_then(Value::as_str).map(str::to_owned)
}

fn count_field(raw: &Value, field: &str) -> Option<u64> {
    raw.get(field).and_then(Value::as_u64)
}

fn timestamp_field(raw: &Value, field: &str) -> Option<f64> {
    raw.get(field).and_then(Value::as_str).and_then(parse_timestamp)
}

/// Parse an ISO-8601 / RFC 3339 timestamp into fractional epoch seconds.
///
/// Empty or malformed strings normalize to `None`, never an error.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<f64> {
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.timestamp_micros() as f64 / 1_000_000.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const FIXTURE: &str = r#"{
        "name": "serde",
        "description": "A generic serialization/deserialization framework",
        "homepage": "https://serde.rs",
        "repository": "https://github.com/serde-rs/serde",
        "documentation": "https://docs.rs/serde",
        "badges": [{"badge_type": "maintenance", "attributes": {"status": "actively-developed"}}],
        "created_at": "2014-12-05T20:20:32.000000+00:00",
        "updated_at": "2025-03-09T17:02:00.500000+00:00",
        "downloads": 400000000,
        "recent_downloads": 90000000,
        "max_stable_version": "1.0.219",
        "max_version": "1.0.219",
        "newest_version": "1.0.219",
        "exact_match": false,
        "links": {"owners": "/api/v1/crates/serde/owners"}
    }"#;

    #[test]
    fn normalizes_known_good_fixture() {
        let raw: Value = serde_json::from_str(FIXTURE).unwrap();
        let record = CrateRecord::from_raw(&raw);

        assert_eq!(record.name.as_deref(), Some("serde"));
        assert_eq!(record.homepage.as_deref(), Some("https://serde.rs"));
        assert_eq!(record.downloads_all, Some(400_000_000));
        assert_eq!(record.downloads_recent, Some(90_000_000));
        assert_eq!(record.version_max_stable.as_deref(), Some("1.0.219"));
        assert_eq!(record.created_at, Some(1_417_810_832.0));
        assert_eq!(record.updated_at, Some(1_741_539_720.5));
        // Enrichment has not run yet.
        assert_eq!(record.category_ids, None);
        assert_eq!(record.keyword_ids, None);
        // Badges pass through untouched.
        assert_eq!(
            record.badges.as_ref().and_then(|b| b[0]["badge_type"].as_str()),
            Some("maintenance")
        );
    }

    #[test]
    fn total_over_empty_object() {
        let record = CrateRecord::from_raw(&json!({}));
        assert_eq!(record.name, None);
        assert_eq!(record.downloads_all, None);
        assert_eq!(record.created_at, None);
    }

    #[test]
    fn total_over_non_object_payloads() {
        for raw in [json!(null), json!("nope"), json!(7), json!([1, 2])] {
            let record = CrateRecord::from_raw(&raw);
            assert_eq!(record.name, None);
        }
    }

    #[test]
    fn mismatched_field_degrades_alone() {
        // One bad field must not blank its neighbors.
        let record = CrateRecord::from_raw(&json!({
            "name": "serde",
            "downloads": "lots",
            "recent_downloads": -3,
            "homepage": "https://serde.rs"
        }));
        assert_eq!(record.name.as_deref(), Some("serde"));
        assert_eq!(record.homepage.as_deref(), Some("https://serde.rs"));
        assert_eq!(record.downloads_all, None);
        assert_eq!(record.downloads_recent, None);
    }

    #[test]
    fn malformed_timestamps_normalize_to_null() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not-a-date"), None);
        assert_eq!(parse_timestamp("2024-13-45T99:99:99Z"), None);

        let record = CrateRecord::from_raw(&json!({"name": "x", "created_at": ""}));
        assert_eq!(record.name.as_deref(), Some("x"));
        assert_eq!(record.created_at, None);
    }

    #[test]
    fn parses_zulu_offset() {
        assert_eq!(
            parse_timestamp("1970-01-01T00:01:00Z"),
            Some(60.0)
        );
    }

    #[test]
    fn serialized_field_names_are_the_persisted_schema() {
        let raw: Value = serde_json::from_str(FIXTURE).unwrap();
        let value = serde_json::to_value(CrateRecord::from_raw(&raw)).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "name",
            "description",
            "homepage",
            "repository",
            "documentation",
            "badges",
            "createdAt",
            "updatedAt",
            "downloadsAll",
            "downloadsRecent",
            "versionMaxStable",
            "versionMax",
            "versionNewest",
            "categoryIds",
            "keywordIds",
        ] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        // Unattempted enrichment persists as null, not a missing key.
        assert!(object["categoryIds"].is_null());
    }
}
