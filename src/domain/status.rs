//! Source status and per-config status reports
//!
//! Statuses are never persisted; they are computed fresh on every pass.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::doc::Doc;
use super::source::{Config, Source};

/// Result of comparing a source's live content with its stored fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    /// The file exists but could not be read
    Failed,
    /// Content matches the stored fingerprint
    Untouched,
    /// Content differs from the stored fingerprint
    Updated,
    /// The file no longer exists
    Deleted,
}

impl SourceStatus {
    pub const ALL: [SourceStatus; 4] = [
        SourceStatus::Failed,
        SourceStatus::Untouched,
        SourceStatus::Updated,
        SourceStatus::Deleted,
    ];

    /// Returns true if this status means the doc needs attention
    pub fn needs_review(self) -> bool {
        !matches!(self, SourceStatus::Untouched)
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceStatus::Failed => "failed",
            SourceStatus::Untouched => "untouched",
            SourceStatus::Updated => "updated",
            SourceStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Snapshot of one config's sources after a status pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub doc: Doc,

    /// Every source of the config, unmodified
    pub sources: Vec<Source>,

    /// Source paths grouped by status, in source iteration order
    pub status: BTreeMap<SourceStatus, Vec<String>>,
}

impl StatusReport {
    /// Starts an empty report for a config
    pub fn for_config(config: &Config) -> Self {
        Self {
            doc: config.doc.clone(),
            sources: Vec::with_capacity(config.sources.len()),
            status: BTreeMap::new(),
        }
    }

    /// Records a source and the status it was classified with
    pub fn record(&mut self, source: Source, status: SourceStatus) {
        self.status
            .entry(status)
            .or_default()
            .push(source.path.clone());
        self.sources.push(source);
    }

    /// Paths currently in `status`
    pub fn paths(&self, status: SourceStatus) -> &[String] {
        self.status.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if every source is untouched
    pub fn is_clean(&self) -> bool {
        self.status
            .iter()
            .all(|(status, paths)| !status.needs_review() || paths.is_empty())
    }
}

/// Per-status path counts across a set of reports
pub fn summarize(reports: &[StatusReport]) -> BTreeMap<SourceStatus, usize> {
    let mut counts: BTreeMap<SourceStatus, usize> =
        SourceStatus::ALL.iter().map(|s| (*s, 0)).collect();

    for report in reports {
        for (status, paths) in &report.status {
            *counts.entry(*status).or_default() += paths.len();
        }
    }

    counts
}
