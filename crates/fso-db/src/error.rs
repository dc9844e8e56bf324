use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A UNIQUE constraint rejected the write. `field` is the column name.
    #[error("expected `{field}` to be unique")]
    Conflict { field: String },

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match unique_violation(&err) {
            Some(field) => Self::Conflict { field },
            None => Self::Sqlite(err),
        }
    }
}

/// SQLite reports these as "UNIQUE constraint failed: users.username".
fn unique_violation(err: &rusqlite::Error) -> Option<String> {
    match err {
        rusqlite::Error::SqliteFailure(code, Some(message))
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            let columns = message.strip_prefix("UNIQUE constraint failed: ")?;
            let first = columns.split(", ").next().unwrap_or(columns);
            Some(first.rsplit('.').next().unwrap_or(first).to_string())
        }
        _ => None,
    }
}
