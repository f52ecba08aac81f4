#![forbid(unsafe_code)]
//! Write path and database ownership: schema bootstrap, get-or-create
//! reference resolution, asset creation, and the audit trail. The query
//! crate borrows connections from [`Database`] but never opens its own.

use std::path::Path;

use rusqlite::Connection;
use tokio::sync::{Mutex, MutexGuard};

pub mod audit;
pub mod resolver;
pub mod schema;
pub mod writer;

pub use audit::record_audit;
pub use resolver::{resolve_category, resolve_manufacturer, resolve_model};
pub use schema::bootstrap_schema;
pub use writer::create_asset;

pub const CRATE_NAME: &str = "assetprism-store";

#[derive(Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// A reference row vanished between a failed insert and the re-read.
    ResolutionFailed(&'static str),
    Datastore(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResolutionFailed(what) => write!(f, "failed to resolve {what}"),
            Self::Datastore(msg) => write!(f, "datastore error: {msg}"),
        }
    }
}
impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Datastore(e.to_string())
    }
}

/// Owned SQLite handle. A single connection behind an async mutex; SQLite
/// serializes writers anyway, and the workload is small reads.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::bootstrap_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::bootstrap_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub async fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::Database;

    #[test]
    fn open_creates_schema_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::open(&dir.path().join("assets.db")).expect("open");
        let conn = db.conn.blocking_lock();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'hardware_assets'",
                [],
                |row| row.get(0),
            )
            .expect("query");
        assert_eq!(count, 1);
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let db = Database::open_in_memory().expect("open");
        let conn = db.conn.blocking_lock();
        super::schema::bootstrap_schema(&conn).expect("second bootstrap");
    }
}
