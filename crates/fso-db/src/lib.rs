pub mod error;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod store;

use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

pub use error::{Error, Result};
pub use store::Store;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// File-backed store. WAL lets readers proceed while a write is in flight.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let db = Self::prepare(conn)?;
        info!("Store ready at {}", path.display());
        Ok(db)
    }

    /// Private, throwaway database. Used by tests and `FSO_DB_PATH=:memory:`.
    pub fn open_in_memory() -> Result<Self> {
        let db = Self::prepare(Connection::open_in_memory()?)?;
        info!("In-memory store ready");
        Ok(db)
    }

    /// Owner references are only enforced when `foreign_keys` is on, and
    /// SQLite resets it for every new connection.
    fn prepare(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
        f(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reopening_a_file_keeps_its_rows() {
        let path = std::env::temp_dir().join(format!("fso-{}.db", uuid::Uuid::new_v4()));

        let db = Database::open(&path).unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO persons (id, name, number) VALUES ('p1', 'Arto Hellas', '040-123456')",
                [],
            )?;
            Ok(())
        })
        .unwrap();
        drop(db);

        // Migrations run again on an existing schema without complaint
        let db = Database::open(&path).unwrap();
        assert_eq!(db.count_persons().unwrap(), 1);
        drop(db);

        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }

    #[test]
    fn owner_references_are_enforced() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO notes (id, content, important, user_id, date)
                     VALUES ('n1', 'orphan note', 0, 'no-such-user', '2024-01-01T00:00:00Z')",
                    [],
                )?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, Error::Sqlite(_)));
    }
}
