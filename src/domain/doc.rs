//! Documentation artifact model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of documentation artifact being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocCategory {
    /// A file on the local filesystem
    File,
    /// A remote page addressed by URL
    Url,
}

impl DocCategory {
    /// Integer code stored in the `docs.category` column
    pub fn code(self) -> i64 {
        match self {
            DocCategory::File => 0,
            DocCategory::Url => 1,
        }
    }

    /// Parses a stored category code
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(DocCategory::File),
            1 => Some(DocCategory::Url),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocCategory::File => "file",
            DocCategory::Url => "url",
        }
    }
}

impl fmt::Display for DocCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A documentation artifact kept in sync with source code
///
/// The identifier is an absolute file path or a URL. Only the surrogate
/// `id` changes after creation, when the doc is first persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doc {
    /// Surrogate id, `None` until persisted
    pub id: Option<i64>,

    /// Absolute file path or URL
    pub identifier: String,

    pub category: DocCategory,
}

impl Doc {
    /// Creates a doc that has not been persisted yet
    pub fn new(identifier: impl Into<String>, category: DocCategory) -> Self {
        Self {
            id: None,
            identifier: identifier.into(),
            category,
        }
    }
}
