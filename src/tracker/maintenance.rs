//! Write-side operations on tracked sources
//!
//! Acknowledging changes (fingerprint refresh), propagating renames and
//! deleting sources that are gone. Each one ends in a single store
//! transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::classify::ProbeMemo;
use super::status::fetch_status;
use crate::domain::SourceStatus;
use crate::storage::{Deletion, Store, StoreError};

/// Which sources a bulk refresh records new fingerprints for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshScope {
    /// Only sources whose content changed
    #[default]
    Updated,
    /// Every readable source
    All,
}

/// Paths touched by a refresh, one entry per source row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshOutcome {
    pub refreshed: Vec<String>,
    /// Sources left alone because they could not be read
    pub skipped: Vec<String>,
}

/// Paths removed by [`prune_deleted`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    pub paths: Vec<String>,
    pub deletion: Deletion,
}

/// Records the live fingerprint of the given sources
///
/// Unreadable or missing files are skipped so they are reported again on the
/// next pass. An unknown id fails the whole refresh.
pub fn refresh_sources(
    store: &mut Store,
    ids: &[i64],
    now: DateTime<Utc>,
) -> Result<RefreshOutcome, StoreError> {
    let mut memo = ProbeMemo::new();
    let mut updates = Vec::new();
    let mut outcome = RefreshOutcome::default();

    for &id in ids {
        let source = store.source(id)?.ok_or(StoreError::SourceNotFound(id))?;
        let digest = memo.probe(&source.path).digest().map(str::to_owned);

        match digest {
            Some(digest) => {
                updates.push((id, digest));
                outcome.refreshed.push(source.path);
            }
            None => outcome.skipped.push(source.path),
        }
    }

    store.update_source_fingerprints(&updates, now)?;

    info!(
        refreshed = outcome.refreshed.len(),
        skipped = outcome.skipped.len(),
        "refreshed selected sources"
    );
    Ok(outcome)
}

/// Records the live fingerprint of every source in `scope`
///
/// Failed sources keep their stale fingerprint; deleted ones are left for
/// [`prune_deleted`].
pub fn refresh_all(
    store: &mut Store,
    scope: RefreshScope,
    now: DateTime<Utc>,
) -> Result<RefreshOutcome, StoreError> {
    let mut memo = ProbeMemo::new();
    let mut updates = Vec::new();
    let mut outcome = RefreshOutcome::default();

    for config in store.list_configs()? {
        for source in config.sources {
            let Some(id) = source.id else { continue };
            let probe = memo.probe(&source.path);
            let status = probe.status_against(&source.fingerprint);

            let wanted = match scope {
                RefreshScope::Updated => status == SourceStatus::Updated,
                RefreshScope::All => {
                    matches!(status, SourceStatus::Updated | SourceStatus::Untouched)
                }
            };

            match probe.digest() {
                Some(digest) if wanted => {
                    updates.push((id, digest.to_string()));
                    outcome.refreshed.push(source.path);
                }
                _ if status == SourceStatus::Failed => outcome.skipped.push(source.path),
                _ => {}
            }
        }
    }

    store.update_source_fingerprints(&updates, now)?;

    info!(
        ?scope,
        refreshed = outcome.refreshed.len(),
        skipped = outcome.skipped.len(),
        "refreshed sources"
    );
    Ok(outcome)
}

/// Applies old-path to new-path renames across all configs
pub fn propagate_renames(
    store: &mut Store,
    mapping: &[(String, String)],
) -> Result<usize, StoreError> {
    let renamed = store.rename_sources(mapping)?;
    info!(pairs = mapping.len(), renamed, "propagated renames");
    Ok(renamed)
}

/// Deletes sources at `paths`, then any doc left without sources
pub fn delete_paths(store: &mut Store, paths: &[String]) -> Result<Deletion, StoreError> {
    let deletion = store.delete_sources(paths)?;
    info!(
        sources = deletion.sources,
        orphan_docs = deletion.orphan_docs,
        "deleted sources"
    );
    Ok(deletion)
}

/// Deletes every source currently classified as deleted
pub fn prune_deleted(store: &mut Store) -> Result<PruneOutcome, StoreError> {
    let mut paths: Vec<String> = fetch_status(store)?
        .iter()
        .flat_map(|report| report.paths(SourceStatus::Deleted).iter().cloned())
        .collect();
    paths.sort();
    paths.dedup();

    let deletion = delete_paths(store, &paths)?;
    Ok(PruneOutcome { paths, deletion })
}
