//! Status passes over every stored config
//!
//! A pass is a pure read: it lists configs, probes each source path at most
//! once and returns one [`StatusReport`] per config, in config order.

use tracing::debug;

use super::classify::ProbeMemo;
use crate::domain::{Config, StatusReport};
use crate::storage::{Store, StoreError};

/// Runs a status pass over every config in the store
pub fn fetch_status(store: &Store) -> Result<Vec<StatusReport>, StoreError> {
    let configs = store.list_configs()?;
    Ok(build_reports(configs))
}

/// Classifies already-loaded configs
///
/// The probe table lives only for this call.
pub fn build_reports(configs: Vec<Config>) -> Vec<StatusReport> {
    let mut memo = ProbeMemo::new();
    let mut reports = Vec::with_capacity(configs.len());

    for config in configs {
        let mut report = StatusReport::for_config(&config);

        for source in config.sources {
            let status = memo.classify(&source.path, &source.fingerprint);
            report.record(source, status);
        }

        reports.push(report);
    }

    debug!(configs = reports.len(), paths = memo.len(), "status pass complete");
    reports
}
