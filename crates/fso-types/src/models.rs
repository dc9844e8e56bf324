use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user as clients see it. The password hash never appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub blogs: Vec<BlogRef>,
    pub notes: Vec<NoteRef>,
}

/// Owned blog as listed under its user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogRef {
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
}

/// Owned note as listed under its user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRef {
    pub id: String,
    pub content: String,
    pub important: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    /// Owner's user id. `None` for records created before ownership existed.
    pub user: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub content: String,
    pub important: bool,
    pub user: Option<String>,
    pub date: DateTime<Utc>,
}

/// Phonebook entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub number: String,
}
