/// Database row types. These map directly to SQLite rows.
/// Distinct from fso-types API models to keep the DB layer independent.

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogRow {
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    pub user_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteRow {
    pub id: String,
    pub content: String,
    pub important: bool,
    pub user_id: Option<String>,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonRow {
    pub id: String,
    pub name: String,
    pub number: String,
}
