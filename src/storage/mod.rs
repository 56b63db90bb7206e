//! # Storage Layer
//!
//! Persistence for doc-hunt.
//!
//! ## Layout
//!
//! ```text
//! <workspace>/
//! └── .doc-hunt/
//!     ├── doc-hunt.db      # SQLite: docs + sources tables
//!     └── config.toml      # Settings
//! ```
//!
//! ## Key Types
//!
//! - [`Workspace`] - Entry point for locating and opening a workspace
//! - [`Store`] - Transactional CRUD over docs and sources
//! - [`Settings`] - Workspace settings

mod settings;
mod store;
mod workspace;

pub use settings::{DefaultFormat, Settings, SettingsError};
pub use store::{Deletion, Store, StoreError};
pub use workspace::{Workspace, WorkspaceError};
