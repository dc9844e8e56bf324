use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              TEXT PRIMARY KEY,
            username        TEXT NOT NULL UNIQUE,
            name            TEXT,
            password_hash   TEXT NOT NULL,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS blogs (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            author      TEXT NOT NULL DEFAULT '',
            url         TEXT NOT NULL,
            likes       INTEGER NOT NULL DEFAULT 0 CHECK (likes >= 0),
            user_id     TEXT REFERENCES users(id),
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_blogs_user
            ON blogs(user_id);

        CREATE TABLE IF NOT EXISTS notes (
            id          TEXT PRIMARY KEY,
            content     TEXT NOT NULL,
            important   INTEGER NOT NULL DEFAULT 0,
            user_id     TEXT REFERENCES users(id),
            date        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_notes_user
            ON notes(user_id);

        CREATE TABLE IF NOT EXISTS persons (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL UNIQUE,
            number      TEXT NOT NULL
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
