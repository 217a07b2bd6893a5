/*!
 * SQL schema for the translation history store.
 *
 * One data table plus a version table; `initialize_schema` brings a fresh
 * or existing database up to the current version.
 */

use anyhow::{Context, Result, bail};
use log::{debug, info};
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Bring the database up to the current schema version
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    match current_version(conn)? {
        0 => {
            info!("Creating history schema v{}", SCHEMA_VERSION);
            create_tables(conn)?;
            record_version(conn, SCHEMA_VERSION)?;
        }
        v if v < SCHEMA_VERSION => {
            info!("Migrating history schema v{} -> v{}", v, SCHEMA_VERSION);
            migrate_schema(conn, v)?;
        }
        v => debug!("History schema is current (v{})", v),
    }

    Ok(())
}

/// Schema version stored in the database; 0 for a fresh file
fn current_version(conn: &Connection) -> Result<i32> {
    let have_version_table: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to inspect sqlite_master")?;

    if !have_version_table {
        return Ok(0);
    }

    Ok(conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0))
}

fn record_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

fn create_tables(conn: &Connection) -> Result<()> {
    // WAL keeps concurrent pipeline runs from blocking each other on reads
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    // The lookup index is intentionally non-unique: duplicate keys coexist
    // and lookups take the newest row
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS translations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_text TEXT NOT NULL,
            target_text TEXT NOT NULL,
            source_lang TEXT NOT NULL,
            target_lang TEXT NOT NULL,
            provider TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_translations_key
            ON translations(source_text, source_lang, target_lang, provider);
        CREATE INDEX IF NOT EXISTS idx_translations_created
            ON translations(created_at);
        "#,
    )?;

    info!("History schema created");
    Ok(())
}

fn migrate_schema(conn: &Connection, from_version: i32) -> Result<()> {
    // No migrations exist yet at v1; every known version is handled above
    if from_version != SCHEMA_VERSION {
        bail!("Cannot migrate from unknown schema version {}", from_version);
    }

    record_version(conn, SCHEMA_VERSION)?;
    Ok(())
}
