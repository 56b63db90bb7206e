//! Source status classification
//!
//! Classification never writes: it compares the live digest of a path with
//! the fingerprint recorded for a source.

use std::collections::HashMap;
use std::path::Path;

use tracing::{trace, warn};

use super::fingerprint::compute_fingerprint;
use crate::domain::SourceStatus;

/// What the filesystem says about a path at probe time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// The path does not exist
    Missing,
    /// The path exists but its content could not be read
    Unreadable,
    /// Live digest of the content
    Digest(String),
}

impl Probe {
    /// Reads the path once
    pub fn of(path: &str) -> Self {
        match Path::new(path).try_exists() {
            Ok(false) => return Probe::Missing,
            Ok(true) => {}
            Err(e) => {
                warn!(path, error = %e, "cannot stat source");
                return Probe::Unreadable;
            }
        }

        match compute_fingerprint(path) {
            Ok(digest) => Probe::Digest(digest),
            Err(e) => {
                warn!(path, error = %e, "cannot fingerprint source");
                Probe::Unreadable
            }
        }
    }

    /// Status of a source whose stored fingerprint is `stored`
    pub fn status_against(&self, stored: &str) -> SourceStatus {
        match self {
            Probe::Missing => SourceStatus::Deleted,
            Probe::Unreadable => SourceStatus::Failed,
            Probe::Digest(digest) if digest == stored => SourceStatus::Untouched,
            Probe::Digest(_) => SourceStatus::Updated,
        }
    }

    pub fn digest(&self) -> Option<&str> {
        match self {
            Probe::Digest(digest) => Some(digest),
            _ => None,
        }
    }
}

/// Classifies a single source without memoization
pub fn classify(path: &str, stored_fingerprint: &str) -> SourceStatus {
    Probe::of(path).status_against(stored_fingerprint)
}

/// Path-keyed probe table for one status pass
///
/// Each path is read from disk at most once per pass, however many configs
/// reference it. The comparison itself runs per source, so two configs
/// holding different fingerprints for the same file each get their own
/// status.
#[derive(Debug, Default)]
pub struct ProbeMemo {
    probes: HashMap<String, Probe>,
}

impl ProbeMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probes `path`, reusing an earlier result from this pass
    pub fn probe(&mut self, path: &str) -> &Probe {
        if !self.probes.contains_key(path) {
            trace!(path, "probing source");
            self.probes.insert(path.to_string(), Probe::of(path));
        }
        &self.probes[path]
    }

    /// Classifies a source, probing its path at most once per pass
    pub fn classify(&mut self, path: &str, stored_fingerprint: &str) -> SourceStatus {
        self.probe(path).status_against(stored_fingerprint)
    }

    /// Number of distinct paths probed so far
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}
