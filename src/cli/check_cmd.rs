//! Status and maintenance commands (check, update, rename, forget)

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use super::args::{resolve_path, resolve_paths};
use super::output::Output;
use crate::domain::{summarize, SourceStatus, StatusReport};
use crate::storage::Workspace;
use crate::tracker::{
    delete_paths, fetch_status, propagate_renames, prune_deleted, refresh_all, RefreshOutcome,
};

/// Statuses listed per doc, most urgent first
const REPORTED: [SourceStatus; 3] = [
    SourceStatus::Updated,
    SourceStatus::Deleted,
    SourceStatus::Failed,
];

/// Runs a status pass; fails the process if any doc needs review
pub fn check(workspace: &Workspace, output: &Output) -> Result<ExitCode> {
    let store = workspace.store()?;
    let reports = fetch_status(&store).context("Failed to load configs")?;
    output.verbose_ctx("check", &format!("Checked {} configs", reports.len()));

    if output.is_json() {
        output.data(&reports);
    } else if reports.is_empty() {
        println!("No configs tracked.");
    } else {
        print_reports(&reports);
    }

    if reports.iter().all(StatusReport::is_clean) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn print_reports(reports: &[StatusReport]) {
    for report in reports {
        if report.is_clean() {
            println!("{} ({}): up to date", report.doc.identifier, report.doc.category);
            continue;
        }

        println!("{} ({}):", report.doc.identifier, report.doc.category);
        for status in REPORTED {
            for path in report.paths(status) {
                println!("  {:<10} {}", status, path);
            }
        }

        let untouched = report.paths(SourceStatus::Untouched).len();
        if untouched > 0 {
            println!("  ({} untouched)", untouched);
        }
    }

    let counts = summarize(reports);
    println!();
    println!(
        "{} updated, {} deleted, {} failed, {} untouched",
        counts[&SourceStatus::Updated],
        counts[&SourceStatus::Deleted],
        counts[&SourceStatus::Failed],
        counts[&SourceStatus::Untouched],
    );
}

/// JSON body of `update`
#[derive(Serialize)]
struct UpdateSummary<'a> {
    #[serde(flatten)]
    refresh: &'a RefreshOutcome,
    removed: &'a [String],
    removed_docs: usize,
}

/// Acknowledges changes per the workspace settings
pub fn update(workspace: &Workspace, output: &Output) -> Result<()> {
    let settings = workspace.settings();
    let mut store = workspace.store()?;

    let refresh = refresh_all(&mut store, settings.refresh_scope, Utc::now())
        .context("Failed to refresh fingerprints")?;

    let pruned = if settings.prune_deleted {
        prune_deleted(&mut store).context("Failed to remove deleted sources")?
    } else {
        Default::default()
    };

    if output.is_json() {
        output.data(&UpdateSummary {
            refresh: &refresh,
            removed: &pruned.paths,
            removed_docs: pruned.deletion.orphan_docs,
        });
        return Ok(());
    }

    for path in &refresh.skipped {
        println!("skipped    {} (unreadable)", path);
    }
    output.success(&format!(
        "Refreshed {} source(s), removed {} deleted source(s)",
        refresh.refreshed.len(),
        pruned.deletion.sources
    ));
    if pruned.deletion.orphan_docs > 0 {
        println!("Removed {} doc(s) left without sources", pruned.deletion.orphan_docs);
    }

    Ok(())
}

/// Points sources tracked at `old` to `new`
pub fn rename(workspace: &Workspace, output: &Output, old: &str, new: &str) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let mapping = [(resolve_path(old, &cwd), resolve_path(new, &cwd))];
    output.verbose_ctx("rename", &format!("{} -> {}", mapping[0].0, mapping[0].1));

    let mut store = workspace.store()?;
    let renamed = propagate_renames(&mut store, &mapping).context("Failed to rename sources")?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "from": mapping[0].0,
            "to": mapping[0].1,
            "renamed": renamed,
        }));
    } else if renamed == 0 {
        println!("No tracked source at {}", mapping[0].0);
    } else {
        output.success(&format!("Renamed {} tracked source(s)", renamed));
    }

    Ok(())
}

/// Stops tracking sources at the given paths
pub fn forget(workspace: &Workspace, output: &Output, paths: &str) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let paths = resolve_paths(paths, &cwd);

    let mut store = workspace.store()?;
    let deletion = delete_paths(&mut store, &paths).context("Failed to delete sources")?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "sources": deletion.sources,
            "orphan_docs": deletion.orphan_docs,
        }));
    } else {
        output.success(&format!(
            "Removed {} source(s) and {} doc(s) left without sources",
            deletion.sources, deletion.orphan_docs
        ));
    }

    Ok(())
}
