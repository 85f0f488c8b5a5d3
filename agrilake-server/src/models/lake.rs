//! Data lake documents and their upstream sources

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field used by the `?sourceDB=` filter
pub const SOURCE_FIELD: &str = "sourceDB";

/// Upstream system a lake document was forwarded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceSystem {
    IndexedDb,
    Neo4j,
}

impl SourceSystem {
    /// Label written to `sourceDB`
    pub fn label(self) -> &'static str {
        match self {
            Self::IndexedDb => "IndexedDB",
            Self::Neo4j => "Neo4j",
        }
    }

    /// Tags applied when the caller supplies none
    pub fn default_tags(self) -> &'static [&'static str] {
        match self {
            Self::IndexedDb => &["indexeddb", "browser-storage", "farm-data"],
            Self::Neo4j => &["neo4j", "graph-database", "agriculture", "iot"],
        }
    }

    /// Value written to `dataType`
    pub fn record_kind(self) -> &'static str {
        match self {
            Self::IndexedDb => "farm-record",
            Self::Neo4j => "graph-data",
        }
    }
}

impl fmt::Display for SourceSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An upstream value wrapped with provenance metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LakeDocument {
    #[serde(rename = "data")]
    pub payload: Value,

    #[serde(rename = "sourceDB")]
    pub source_system: String,

    #[serde(rename = "ingestedAt")]
    pub ingested_at: String,

    pub tags: Vec<String>,

    #[serde(rename = "dataType")]
    pub record_kind: String,
}

/// Body of `POST /lake/{source}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestRequest {
    #[serde(default)]
    pub data: Vec<Value>,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Shared metadata stamped onto every document of one ingestion call
#[derive(Debug, Clone)]
pub struct Provenance {
    pub source: SourceSystem,
    pub ingested_at: String,
    pub tags: Vec<String>,
}

impl Provenance {
    /// Resolve tags (caller's, or the source defaults) and format the timestamp.
    pub fn new(source: SourceSystem, caller_tags: Vec<String>, now: DateTime<Utc>) -> Self {
        let tags = if caller_tags.is_empty() {
            source.default_tags().iter().map(|t| t.to_string()).collect()
        } else {
            dedup_tags(caller_tags)
        };

        Self {
            source,
            ingested_at: format_ingested_at(now),
            tags,
        }
    }

    pub fn wrap(&self, payload: Value) -> LakeDocument {
        LakeDocument {
            payload,
            source_system: self.source.label().to_string(),
            ingested_at: self.ingested_at.clone(),
            tags: self.tags.clone(),
            record_kind: self.source.record_kind().to_string(),
        }
    }
}

/// ISO-8601, UTC, whole seconds, `Z` suffix
pub fn format_ingested_at(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// first occurrence wins
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 1, 12, 30, 45).unwrap()
    }

    #[test]
    fn default_tags_are_deterministic() {
        let a = Provenance::new(SourceSystem::Neo4j, vec![], fixed_now());
        let b = Provenance::new(SourceSystem::Neo4j, vec![], fixed_now());
        assert_eq!(a.tags, b.tags);
        assert_eq!(a.tags, vec!["neo4j", "graph-database", "agriculture", "iot"]);

        let idx = Provenance::new(SourceSystem::IndexedDb, vec![], fixed_now());
        assert_eq!(idx.tags, vec!["indexeddb", "browser-storage", "farm-data"]);
    }

    #[test]
    fn caller_tags_replace_defaults_and_dedupe() {
        let p = Provenance::new(
            SourceSystem::IndexedDb,
            vec!["lab3".into(), "sensor".into(), "lab3".into()],
            fixed_now(),
        );
        assert_eq!(p.tags, vec!["lab3", "sensor"]);
    }

    #[test]
    fn wrap_preserves_payload_and_serializes_wire_names() {
        let p = Provenance::new(SourceSystem::Neo4j, vec![], fixed_now());
        let payload = json!({"farm": {"name": "North"}, "readings": [1, 2.5, null]});
        let doc = p.wrap(payload.clone());

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["data"], payload);
        assert_eq!(value["sourceDB"], "Neo4j");
        assert_eq!(value["ingestedAt"], "2024-10-01T12:30:45Z");
        assert_eq!(value["dataType"], "graph-data");
    }

    #[test]
    fn sources_differ_only_in_source_metadata() {
        let payload = json!({"id": "idx_001", "reading": 23.5});
        let idx = Provenance::new(SourceSystem::IndexedDb, vec![], fixed_now()).wrap(payload.clone());
        let neo = Provenance::new(SourceSystem::Neo4j, vec![], fixed_now()).wrap(payload);

        assert_eq!(idx.payload, neo.payload);
        assert_eq!(idx.ingested_at, neo.ingested_at);
        assert_ne!(idx.source_system, neo.source_system);
        assert_ne!(idx.tags, neo.tags);
    }

    #[test]
    fn ingest_request_defaults_missing_fields() {
        let req: IngestRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.data.is_empty());
        assert!(req.tags.is_empty());

        let bad = serde_json::from_value::<IngestRequest>(json!({"data": "nope"}));
        assert!(bad.is_err());
    }
}
