//! SQLite config store
//!
//! The database lives in `.doc-hunt/doc-hunt.db` and holds two tables:
//! `docs` (one row per doc) and `sources` (one row per tracked file, keyed to
//! its doc). Every mutation runs in a single transaction, so a failure never
//! leaves a doc without sources or a source pointing at a missing doc.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;
use tracing::debug;

use crate::domain::{Config, Doc, DocCategory, Source};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source {0} not found")]
    SourceNotFound(i64),

    #[error("Doc {0} must have at least one source")]
    EmptyConfig(String),

    #[error("Unsupported database schema version {0}")]
    SchemaVersion(i32),
}

/// Rows removed by [`Store::delete_sources`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deletion {
    pub sources: usize,
    /// Docs removed because no source was left
    pub orphan_docs: usize,
}

/// Persistent store of configs
pub struct Store {
    /// Path to the SQLite database, `None` when in memory
    db_path: Option<PathBuf>,

    conn: Connection,
}

impl Store {
    /// Schema version stored in `PRAGMA user_version`
    const SCHEMA_VERSION: i32 = 1;

    /// Opens or creates the database at `db_path`
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        Self::with_connection(conn, Some(db_path.to_path_buf()))
    }

    /// Opens a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, None)
    }

    fn with_connection(conn: Connection, db_path: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let store = Self { db_path, conn };
        store.ensure_schema()?;

        Ok(store)
    }

    fn ensure_schema(&self) -> Result<(), StoreError> {
        match self.schema_version()? {
            0 => self.create_schema(),
            v if v == Self::SCHEMA_VERSION => Ok(()),
            v => Err(StoreError::SchemaVersion(v)),
        }
    }

    fn schema_version(&self) -> Result<i32, StoreError> {
        let version: Option<i32> = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .optional()?;

        Ok(version.unwrap_or(0))
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS docs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                identifier TEXT NOT NULL,
                category INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sources (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                doc_id INTEGER NOT NULL REFERENCES docs(id),
                path TEXT NOT NULL,
                fingerprint TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sources_doc ON sources(doc_id);
            CREATE INDEX IF NOT EXISTS idx_sources_path ON sources(path);
            ",
        )?;

        self.conn.execute_batch(&format!(
            "PRAGMA user_version = {}",
            Self::SCHEMA_VERSION
        ))?;

        Ok(())
    }

    /// Inserts a doc and its sources, returning them with ids and timestamps
    pub fn insert_config(&mut self, mut doc: Doc, sources: Vec<Source>) -> Result<Config, StoreError> {
        if sources.is_empty() {
            return Err(StoreError::EmptyConfig(doc.identifier));
        }

        let now = Utc::now();
        let stamp = now.to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO docs (identifier, category) VALUES (?1, ?2)",
            params![doc.identifier, doc.category.code()],
        )?;
        let doc_id = tx.last_insert_rowid();

        let mut persisted = Vec::with_capacity(sources.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO sources (doc_id, path, fingerprint, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
            )?;

            for mut source in sources {
                let id = stmt.insert(params![doc_id, source.path, source.fingerprint, stamp])?;
                source.id = Some(id);
                source.doc_id = Some(doc_id);
                source.created_at = now;
                source.updated_at = now;
                persisted.push(source);
            }
        }

        tx.commit()?;
        doc.id = Some(doc_id);

        debug!(doc_id, doc = %doc.identifier, sources = persisted.len(), "inserted config");
        Ok(Config::new(doc, persisted))
    }

    /// Lists every config, docs by creation and sources by path
    pub fn list_configs(&self) -> Result<Vec<Config>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT d.id, d.identifier, d.category,
                    s.id, s.path, s.fingerprint, s.created_at, s.updated_at
             FROM docs d
             JOIN sources s ON s.doc_id = d.id
             ORDER BY d.id, s.path, s.id",
        )?;

        let rows = stmt.query_map([], |row| {
            let doc_id: i64 = row.get(0)?;
            let doc = Doc {
                id: Some(doc_id),
                identifier: row.get(1)?,
                category: category(row, 2)?,
            };
            let source = Source {
                id: Some(row.get(3)?),
                doc_id: Some(doc_id),
                path: row.get(4)?,
                fingerprint: row.get(5)?,
                created_at: timestamp(row, 6)?,
                updated_at: timestamp(row, 7)?,
            };
            Ok((doc, source))
        })?;

        let mut configs: Vec<Config> = Vec::new();
        for row in rows {
            let (doc, source) = row?;
            match configs.last_mut() {
                Some(config) if config.doc.id == doc.id => config.sources.push(source),
                _ => configs.push(Config::new(doc, vec![source])),
            }
        }

        Ok(configs)
    }

    /// Looks up a single source by id
    pub fn source(&self, id: i64) -> Result<Option<Source>, StoreError> {
        let source = self
            .conn
            .query_row(
                "SELECT id, doc_id, path, fingerprint, created_at, updated_at
                 FROM sources WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Source {
                        id: Some(row.get(0)?),
                        doc_id: Some(row.get(1)?),
                        path: row.get(2)?,
                        fingerprint: row.get(3)?,
                        created_at: timestamp(row, 4)?,
                        updated_at: timestamp(row, 5)?,
                    })
                },
            )
            .optional()?;

        Ok(source)
    }

    /// Removes configs and all of their sources
    ///
    /// Configs that were never persisted are ignored, so an empty or
    /// unpersisted selection is a no-op.
    pub fn remove_configs(&mut self, configs: &[Config]) -> Result<usize, StoreError> {
        let ids: Vec<i64> = configs.iter().filter_map(|c| c.doc.id).collect();
        if ids.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        let mut removed = 0;
        {
            let mut delete_sources = tx.prepare("DELETE FROM sources WHERE doc_id = ?1")?;
            let mut delete_doc = tx.prepare("DELETE FROM docs WHERE id = ?1")?;

            for id in &ids {
                delete_sources.execute(params![id])?;
                removed += delete_doc.execute(params![id])?;
            }
        }
        tx.commit()?;

        debug!(removed, "removed configs");
        Ok(removed)
    }

    /// Records a new fingerprint for one source
    ///
    /// Fails with [`StoreError::SourceNotFound`] if the id is gone.
    pub fn update_source_fingerprint(
        &mut self,
        id: i64,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.update_source_fingerprints(&[(id, fingerprint.to_string())], now)
    }

    /// Records new fingerprints for several sources in one transaction
    ///
    /// Only `fingerprint` and `updated_at` change. A missing id rolls the
    /// whole batch back.
    pub fn update_source_fingerprints(
        &mut self,
        updates: &[(i64, String)],
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if updates.is_empty() {
            return Ok(());
        }

        let stamp = now.to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("UPDATE sources SET fingerprint = ?2, updated_at = ?3 WHERE id = ?1")?;

            for (id, fingerprint) in updates {
                if stmt.execute(params![id, fingerprint, stamp])? == 0 {
                    return Err(StoreError::SourceNotFound(*id));
                }
            }
        }
        tx.commit()?;

        debug!(count = updates.len(), "updated source fingerprints");
        Ok(())
    }

    /// Deletes every source matching one of `paths`, across all configs
    ///
    /// Docs left without sources are deleted in the same transaction.
    pub fn delete_sources(&mut self, paths: &[String]) -> Result<Deletion, StoreError> {
        if paths.is_empty() {
            return Ok(Deletion::default());
        }

        let tx = self.conn.transaction()?;
        let mut deletion = Deletion::default();
        {
            let mut stmt = tx.prepare("DELETE FROM sources WHERE path = ?1")?;
            for path in paths {
                deletion.sources += stmt.execute(params![path])?;
            }
        }

        deletion.orphan_docs = tx.execute(
            "DELETE FROM docs
             WHERE NOT EXISTS (SELECT 1 FROM sources s WHERE s.doc_id = docs.id)",
            [],
        )?;
        tx.commit()?;

        debug!(
            sources = deletion.sources,
            orphan_docs = deletion.orphan_docs,
            "deleted sources"
        );
        Ok(deletion)
    }

    /// Moves sources from an old path to a new one, across all configs
    ///
    /// Pairs are applied in order. Ids, fingerprints and timestamps are kept.
    pub fn rename_sources(&mut self, mapping: &[(String, String)]) -> Result<usize, StoreError> {
        if mapping.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        let mut renamed = 0;
        {
            let mut stmt = tx.prepare("UPDATE sources SET path = ?2 WHERE path = ?1")?;
            for (old, new) in mapping {
                renamed += stmt.execute(params![old, new])?;
            }
        }
        tx.commit()?;

        debug!(renamed, "renamed sources");
        Ok(renamed)
    }

    /// Returns the path to the database, if on disk
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }
}

fn category(row: &Row<'_>, idx: usize) -> rusqlite::Result<DocCategory> {
    let code: i64 = row.get(idx)?;
    DocCategory::from_code(code).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("unknown doc category {code}").into(),
        )
    })
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
