/*!
 * Repository layer for the translation history.
 *
 * This module provides a high-level API for history operations,
 * abstracting away the SQL details and providing type-safe access.
 * Lookups match all four key fields exactly; inserts are append-only
 * (duplicate keys coexist, the newest row wins on lookup).
 */

use anyhow::Result;
use log::debug;
use rusqlite::{OptionalExtension, params};

use super::connection::DatabaseConnection;
use super::models::{NewTranslation, TranslationRecord};

/// Repository for translation history operations
#[derive(Clone)]
pub struct HistoryRepository {
    /// Database connection
    db: DatabaseConnection,
}

impl HistoryRepository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Look up a cached translation by its exact 4-tuple key.
    ///
    /// Matching is byte-exact on all four fields; texts differing only in
    /// trailing whitespace are different keys. Returns the most recently
    /// inserted match. A lookup never writes.
    pub async fn find_translation(
        &self,
        source_text: &str,
        source_lang: &str,
        target_lang: &str,
        provider: &str,
    ) -> Result<Option<String>> {
        let source_text = source_text.to_string();
        let source_lang = source_lang.to_string();
        let target_lang = target_lang.to_string();
        let provider = provider.to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT target_text FROM translations
                        WHERE source_text = ?1
                          AND source_lang = ?2
                          AND target_lang = ?3
                          AND provider = ?4
                        ORDER BY id DESC
                        LIMIT 1
                        "#,
                        params![source_text, source_lang, target_lang, provider],
                        |row| row.get(0),
                    )
                    .optional()?;

                Ok(result)
            })
            .await
    }

    /// Append a completed translation to the history.
    ///
    /// The id is assigned by the store and the timestamp is set here;
    /// existing rows with the same key are left untouched.
    pub async fn insert_translation(&self, new: NewTranslation) -> Result<TranslationRecord> {
        let created_at = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO translations (
                        source_text, target_text, source_lang, target_lang, provider, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                    params![
                        new.source_text,
                        new.target_text,
                        new.source_lang,
                        new.target_lang,
                        new.provider,
                        created_at,
                    ],
                )?;

                let id = conn.last_insert_rowid();
                debug!("Inserted translation record {}", id);

                Ok(TranslationRecord {
                    id,
                    source_text: new.source_text,
                    target_text: new.target_text,
                    source_lang: new.source_lang,
                    target_lang: new.target_lang,
                    provider: new.provider,
                    created_at,
                })
            })
            .await
    }

    /// List the most recent records, newest first
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<TranslationRecord>> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, source_text, target_text, source_lang, target_lang, provider, created_at
                    FROM translations
                    ORDER BY created_at DESC, id DESC
                    LIMIT ?1
                    "#,
                )?;

                let records = stmt
                    .query_map([limit as i64], |row| {
                        Ok(TranslationRecord {
                            id: row.get(0)?,
                            source_text: row.get(1)?,
                            target_text: row.get(2)?,
                            source_lang: row.get(3)?,
                            target_lang: row.get(4)?,
                            provider: row.get(5)?,
                            created_at: row.get(6)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(records)
            })
            .await
    }

    /// Delete the records with the given ids.
    ///
    /// Idempotent: ids that do not exist are skipped without error.
    /// Returns the number of rows actually removed.
    pub async fn delete(&self, ids: &[i64]) -> Result<usize> {
        let ids = ids.to_vec();

        self.db
            .execute_async(move |conn| {
                let mut deleted = 0usize;
                for id in ids {
                    deleted += conn.execute("DELETE FROM translations WHERE id = ?1", [id])?;
                }
                debug!("Deleted {} translation record(s)", deleted);
                Ok(deleted)
            })
            .await
    }

    /// Delete the entire history. Returns the number of rows removed.
    pub async fn delete_all(&self) -> Result<usize> {
        self.db
            .execute_async(|conn| {
                let deleted = conn.execute("DELETE FROM translations", [])?;
                debug!("Cleared translation history ({} record(s))", deleted);
                Ok(deleted)
            })
            .await
    }

    /// Total number of stored records
    pub async fn count(&self) -> Result<i64> {
        self.db
            .execute_async(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM translations", [], |row| row.get(0))?;
                Ok(count)
            })
            .await
    }
}
