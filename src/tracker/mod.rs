//! # Change Tracking
//!
//! Fingerprinting, classification and the passes built on them.
//!
//! | Piece | Role |
//! |-------|------|
//! | [`compute_fingerprint`] | BLAKE3 digest of a file's content |
//! | [`classify`] / [`ProbeMemo`] | Status of one source against its stored fingerprint |
//! | [`fetch_status`] | Read-only status pass over every config |
//! | [`refresh_all`] / [`refresh_sources`] | Acknowledge changes by recording new fingerprints |
//! | [`propagate_renames`] / [`delete_paths`] / [`prune_deleted`] | Keep stored paths in line with the filesystem |

mod classify;
mod fingerprint;
mod maintenance;
mod status;

pub use classify::{classify, Probe, ProbeMemo};
pub use fingerprint::{compute_fingerprint, fingerprint_sources, FingerprintError};
pub use maintenance::{
    delete_paths, prune_deleted, propagate_renames, refresh_all, refresh_sources, PruneOutcome,
    RefreshOutcome, RefreshScope,
};
pub use status::{build_reports, fetch_status};
