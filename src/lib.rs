//! doc-hunt - Keep documentation in sync with the source files it describes
//!
//! A config ties one doc (a file or a URL) to the source files it documents.
//! Each source is fingerprinted when added; later checks report whether the
//! file is untouched, updated, deleted or unreadable, so the doc can be
//! revisited when its sources move on.

pub mod cli;
pub mod domain;
pub mod storage;
pub mod tracker;

pub use domain::{Config, Doc, DocCategory, Source, SourceStatus, StatusReport};
pub use storage::{Store, StoreError, Workspace};
