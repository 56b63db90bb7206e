//! Content fingerprints
//!
//! A fingerprint is the BLAKE3 digest of a file's full content, rendered as
//! lowercase hex. It depends only on the bytes, never on path or mtime.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::Source;

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Computes the fingerprint of the file at `path`
pub fn compute_fingerprint(path: impl AsRef<Path>) -> Result<String, FingerprintError> {
    let path = path.as_ref();
    let io_err = |source| FingerprintError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_err)?;
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut file, &mut hasher).map_err(io_err)?;

    Ok(hasher.finalize().to_hex().to_string())
}

/// Builds unpersisted sources for `paths`, fingerprinting each file now
pub fn fingerprint_sources(paths: &[String]) -> Result<Vec<Source>, FingerprintError> {
    paths
        .iter()
        .map(|path| Ok(Source::new(path.as_str(), compute_fingerprint(path)?)))
        .collect()
}

/// Fingerprint of an in-memory buffer, matching [`compute_fingerprint`]
#[cfg(test)]
pub(crate) fn fingerprint_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
