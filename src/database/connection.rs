/*!
 * SQLite connection handling for the history store.
 *
 * All access funnels through one mutex-guarded connection, so concurrent
 * pipeline runs serialize at the store boundary. Async callers go through
 * `execute_async`, which moves the work onto a blocking thread.
 */

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::schema;

/// Database filename under the application data directory
const DB_FILENAME: &str = "lingoshot.db";

/// Application directory name under the user's data directory
const APP_DIRNAME: &str = "lingoshot";

/// Shared handle to the history database
#[derive(Clone)]
pub struct DatabaseConnection {
    db_path: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open the database at its default per-user location, creating the
    /// file and directories on first use
    pub fn new_default() -> Result<Self> {
        Self::new(Self::default_database_path()?)
    }

    /// Open (or create) the database at the given path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }

        info!("Opening history database at {:?}", db_path);
        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        // Concurrent pipeline runs share this file; wait out short lock
        // contention instead of surfacing SQLITE_BUSY
        conn.busy_timeout(Duration::from_secs(5))
            .context("Failed to set database busy timeout")?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (used by tests)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Opening in-memory history database");

        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Default database location: `<data dir>/lingoshot/lingoshot.db`
    pub fn default_database_path() -> Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(APP_DIRNAME).join(DB_FILENAME))
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Run an operation against the connection, blocking on the lock.
    /// Async callers should prefer `execute_async`.
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|e| anyhow!("Database lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Run an operation on a blocking thread so the async runtime is not
    /// held up by SQLite I/O or lock contention
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let conn = connection
                .lock()
                .map_err(|e| anyhow!("Database lock poisoned: {}", e))?;
            f(&conn)
        })
        .await
        .context("Database task panicked")?
    }
}
