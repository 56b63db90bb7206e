//! Tracked source file and config aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::doc::Doc;

/// A single tracked source file
///
/// `fingerprint` is the digest recorded at the last acknowledged check, not
/// the live content. Staleness is the delta between the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Surrogate id, `None` until persisted
    pub id: Option<i64>,

    /// Owning doc id, `None` until persisted
    pub doc_id: Option<i64>,

    /// Absolute path of the source file
    pub path: String,

    /// Hex digest of the last recorded content
    pub fingerprint: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Source {
    /// Creates an unpersisted source with a known fingerprint
    pub fn new(path: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            doc_id: None,
            path: path.into(),
            fingerprint: fingerprint.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// One doc plus the sources it documents
///
/// A config is the unit of creation and removal. Sources never exist
/// outside of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub doc: Doc,
    pub sources: Vec<Source>,
}

impl Config {
    pub fn new(doc: Doc, sources: Vec<Source>) -> Self {
        Self { doc, sources }
    }

    /// Iterates over the source paths in stored order
    pub fn source_paths(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocCategory;

    #[test]
    fn new_source_timestamps_match() {
        let source = Source::new("/src/a.rs", "abc");
        assert_eq!(source.created_at, source.updated_at);
        assert_eq!(source.id, None);
        assert_eq!(source.doc_id, None);
    }

    #[test]
    fn config_lists_paths_in_order() {
        let config = Config::new(
            Doc::new("/docs/guide.md", DocCategory::File),
            vec![Source::new("/src/b.rs", "1"), Source::new("/src/a.rs", "2")],
        );
        let paths: Vec<_> = config.source_paths().collect();
        assert_eq!(paths, vec!["/src/b.rs", "/src/a.rs"]);
    }
}
