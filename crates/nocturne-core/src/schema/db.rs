use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::DownloadEntry;

use super::migrations::MIGRATIONS;

/// A database connection holding the download ledger.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

// Download ledger CRUD
impl Database {
    /// Record a download, replacing any earlier entry for the same content.
    pub fn record_download(&self, entry: &DownloadEntry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO downloads (remote_id, path, downloaded_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(remote_id) DO UPDATE SET
                path = excluded.path,
                downloaded_at = excluded.downloaded_at",
            rusqlite::params![
                entry.remote_id,
                entry.path.to_string_lossy().into_owned(),
                entry.downloaded_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_download(&self, remote_id: &str) -> Result<Option<DownloadEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT remote_id, path, downloaded_at FROM downloads WHERE remote_id = ?1",
                [remote_id],
                row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    /// Delete the entry for `remote_id`. Returns whether one existed.
    pub fn delete_download(&self, remote_id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM downloads WHERE remote_id = ?1", [remote_id])?;
        Ok(deleted > 0)
    }

    pub fn list_downloads(&self) -> Result<Vec<DownloadEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT remote_id, path, downloaded_at FROM downloads ORDER BY downloaded_at",
        )?;
        let entries = stmt
            .query_map([], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}

fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<DownloadEntry> {
    let path: String = row.get(1)?;
    let downloaded_at: String = row.get(2)?;
    let downloaded_at = DateTime::parse_from_rfc3339(&downloaded_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(DownloadEntry {
        remote_id: row.get(0)?,
        path: PathBuf::from(path),
        downloaded_at,
    })
}
