//! Workspace management
//!
//! A workspace is any directory holding a `.doc-hunt/` folder with the
//! database and settings.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Settings, Store};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("No doc-hunt workspace at {0}. Run 'doc-hunt init' first.")]
    NotInitialized(PathBuf),
}

/// A doc-hunt workspace
pub struct Workspace {
    root: PathBuf,
    settings: Settings,
}

impl Workspace {
    /// Name of the data directory inside the workspace root
    pub const DIR: &'static str = ".doc-hunt";
    const SETTINGS_FILE: &'static str = "config.toml";

    /// Opens an existing workspace at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let data_dir = root.join(Self::DIR);

        if !data_dir.is_dir() {
            return Err(WorkspaceError::NotInitialized(root).into());
        }

        let settings = Settings::load(&data_dir.join(Self::SETTINGS_FILE))?;

        Ok(Self { root, settings })
    }

    /// Opens the workspace named by `--workspace`/`DOC_HUNT_HOME`, or the
    /// nearest one above the current directory
    pub fn open_at(explicit: Option<&Path>) -> Result<Self> {
        let root = Self::resolve_root(explicit)?;
        if explicit.is_some() {
            return Self::open(root);
        }
        Self::open(Self::find_root(&root).unwrap_or(root))
    }

    /// Walks up from `start` until a directory holding `.doc-hunt/` is found
    pub fn find_root(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            if current.join(Self::DIR).is_dir() {
                return Some(current);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolves the workspace root without requiring it to exist
    pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => std::env::current_dir().context("Failed to read current directory"),
        }
    }

    /// Initializes a workspace at `root`; safe to run twice
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let data_dir = root.join(Self::DIR);

        fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create {} directory: {}", Self::DIR, data_dir.display())
        })?;

        let settings_path = data_dir.join(Self::SETTINGS_FILE);
        if !settings_path.exists() {
            fs::write(&settings_path, Settings::TEMPLATE).with_context(|| {
                format!("Failed to write settings: {}", settings_path.display())
            })?;
        }

        let workspace = Self::open(root)?;
        workspace.store()?;

        Ok(workspace)
    }

    /// Returns the workspace root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.doc-hunt` directory
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(Self::DIR)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir().join("doc-hunt.db")
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Opens the config store
    pub fn store(&self) -> Result<Store> {
        let db_path = self.db_path();
        Store::open(&db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))
    }
}
