//! Domain models for doc-hunt
//!
//! Contains the tracked entities without any I/O concerns.

mod doc;
mod source;
mod status;

pub use doc::{Doc, DocCategory};
pub use source::{Config, Source};
pub use status::{summarize, SourceStatus, StatusReport};
