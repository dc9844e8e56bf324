//! Row → wire conversions and path id parsing.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use fso_db::models::{BlogRow, NoteRow, PersonRow, UserRow};
use fso_types::models::{Blog, BlogRef, Note, NoteRef, Person, User};

use crate::error::ApiError;

/// Ids are UUIDs. Anything that doesn't parse as one is a client error,
/// distinct from a well-formed id that matches nothing.
pub fn parse_id(raw: &str) -> Result<String, ApiError> {
    raw.parse::<Uuid>()
        .map(|id| id.to_string())
        .map_err(|_| ApiError::MalformedId)
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn now() -> String {
    Utc::now().to_rfc3339()
}

fn parse_timestamp(raw: &str, id: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Rows written by hand through sqlite3 use "YYYY-MM-DD HH:MM:SS".
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}' on record '{}': {}", raw, id, e);
            DateTime::default()
        })
}

pub fn blog(row: BlogRow) -> Blog {
    let created_at = parse_timestamp(&row.created_at, &row.id);
    Blog {
        id: row.id,
        title: row.title,
        author: row.author,
        url: row.url,
        likes: row.likes,
        user: row.user_id,
        created_at,
    }
}

pub fn note(row: NoteRow) -> Note {
    let date = parse_timestamp(&row.date, &row.id);
    Note {
        id: row.id,
        content: row.content,
        important: row.important,
        user: row.user_id,
        date,
    }
}

pub fn person(row: PersonRow) -> Person {
    Person {
        id: row.id,
        name: row.name,
        number: row.number,
    }
}

/// The password hash is dropped here and goes no further.
pub fn user(row: UserRow, blogs: Vec<BlogRow>, notes: Vec<NoteRow>) -> User {
    User {
        id: row.id,
        username: row.username,
        name: row.name,
        blogs: blogs
            .into_iter()
            .map(|b| BlogRef {
                id: b.id,
                title: b.title,
                author: b.author,
                url: b.url,
                likes: b.likes,
            })
            .collect(),
        notes: notes
            .into_iter()
            .map(|n| NoteRef {
                id: n.id,
                content: n.content,
                important: n.important,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_rejected() {
        assert!(matches!(parse_id("invalid-id-123"), Err(ApiError::MalformedId)));
        assert!(matches!(parse_id(""), Err(ApiError::MalformedId)));
    }

    #[test]
    fn ids_are_normalized() {
        let id = parse_id("67E55044-10B1-426F-9247-BB680E5FE0C8").unwrap();
        assert_eq!(id, "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn user_representation_omits_the_hash() {
        let row = UserRow {
            id: new_id(),
            username: "root".into(),
            name: None,
            password_hash: "$argon2id$v=19$secret".into(),
            created_at: now(),
        };
        let json = serde_json::to_string(&user(row, vec![], vec![])).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn sqlite_style_timestamps_parse() {
        let ts = parse_timestamp("2024-03-01 12:30:00", "x");
        assert_eq!(ts.to_rfc3339(), "2024-03-01T12:30:00+00:00");
    }
}
