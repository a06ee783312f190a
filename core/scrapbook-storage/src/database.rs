//! The storage-engine handle and schema.

use crate::error::{StoreError, StoreResult};
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS scrapbooks (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        title TEXT NOT NULL,
        theme_category TEXT NOT NULL,
        is_private INTEGER NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_scrapbooks_user
        ON scrapbooks (user_id, updated_at);

    CREATE TABLE IF NOT EXISTS pages (
        id TEXT PRIMARY KEY,
        scrapbook_id TEXT NOT NULL REFERENCES scrapbooks (id) ON DELETE CASCADE,
        page_order INTEGER NOT NULL,
        background_color TEXT,
        background_image_url TEXT,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_pages_scrapbook
        ON pages (scrapbook_id, page_order);

    CREATE TABLE IF NOT EXISTS page_elements (
        id TEXT PRIMARY KEY,
        page_id TEXT NOT NULL REFERENCES pages (id) ON DELETE CASCADE,
        element_type TEXT NOT NULL CHECK (element_type IN ('photo', 'sticker', 'text')),
        x_pos REAL NOT NULL,
        y_pos REAL NOT NULL,
        rotation REAL NOT NULL DEFAULT 0,
        scale REAL NOT NULL DEFAULT 1 CHECK (scale > 0),
        z_index INTEGER NOT NULL,
        properties TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_page_elements_page
        ON page_elements (page_id);

    CREATE TABLE IF NOT EXISTS songs (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        artist TEXT NOT NULL,
        file_url TEXT NOT NULL,
        duration_seconds INTEGER NOT NULL CHECK (duration_seconds > 0),
        created_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS scrapbook_songs (
        id TEXT PRIMARY KEY,
        scrapbook_id TEXT NOT NULL REFERENCES scrapbooks (id) ON DELETE CASCADE,
        song_id TEXT NOT NULL REFERENCES songs (id) ON DELETE CASCADE,
        created_at INTEGER NOT NULL,
        UNIQUE (scrapbook_id, song_id)
    );
";

/// Shared handle to the SQLite database.
///
/// Cloning is cheap; all clones share one connection, so writes are
/// serialized in-process and each multi-row write runs in one transaction.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (or creates) a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        tracing::debug!("opened database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.create_scalar_function(
            "casefold",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let text: String = ctx.get(0)?;
                Ok(text.to_lowercase())
            },
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs raw SQL outside any store (maintenance, fault injection in tests).
    pub fn execute_batch(&self, sql: &str) -> StoreResult<()> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }

    /// Runs `f` against the connection without a write transaction.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&Connection) -> StoreResult<T>) -> StoreResult<T> {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Runs `f` inside an IMMEDIATE transaction.
    ///
    /// Commits when `f` returns `Ok`; any error (from `f` or the commit)
    /// drops the transaction, which rolls every statement back.
    pub(crate) fn write<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}
