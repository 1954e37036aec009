mod schema;

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use time::OffsetDateTime;

use crate::models::AnswerRecord;

use schema::INITIAL_SCHEMA;

/// Local question → answer cache backed by SQLite.
///
/// Records are replaced wholesale; nothing is merged.
pub struct AnswerCache {
    conn: Connection,
}

impl AnswerCache {
    /// Opens an in-memory cache.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Opens a file-based cache at the given path, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open answer cache at {}", path.display()))?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(INITIAL_SCHEMA)
            .context("Failed to initialize answer cache schema")?;
        Ok(())
    }

    /// Stores `record` under its question, replacing any previous entry.
    pub fn put(&self, record: &AnswerRecord) -> Result<()> {
        let json = serde_json::to_string(record).context("Failed to encode answer record")?;
        let now = OffsetDateTime::now_utc().unix_timestamp();
        self.conn
            .execute(
                "INSERT INTO answers (question, record, cached_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(question) DO UPDATE SET record = excluded.record,
                                                     cached_at = excluded.cached_at",
                params![record.question, json, now],
            )
            .context("Failed to store answer")?;
        Ok(())
    }

    /// Returns the cached record for `question`.
    pub fn get(&self, question: &str) -> Result<Option<AnswerRecord>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT record FROM answers WHERE question = ?1",
                params![question],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read cached answer")?;

        json.map(|json| {
            serde_json::from_str(&json)
                .with_context(|| format!("Corrupt cached answer for {question:?}"))
        })
        .transpose()
    }

    /// When `question` was cached.
    pub fn cached_at(&self, question: &str) -> Result<Option<OffsetDateTime>> {
        let timestamp: Option<i64> = self
            .conn
            .query_row(
                "SELECT cached_at FROM answers WHERE question = ?1",
                params![question],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read cache timestamp")?;

        timestamp
            .map(|ts| {
                OffsetDateTime::from_unix_timestamp(ts).context("Invalid cache timestamp")
            })
            .transpose()
    }

    /// Removes `question`; returns whether it was cached.
    pub fn remove(&self, question: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM answers WHERE question = ?1", params![question])
            .context("Failed to remove cached answer")?;
        Ok(removed > 0)
    }

    /// Removes every cached answer.
    pub fn clear(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM answers", [])
            .context("Failed to clear answer cache")?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM answers", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
