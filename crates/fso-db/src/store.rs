use crate::Result;
use crate::models::{BlogRow, NoteRow, PersonRow, UserRow};

/// Persistence seam for the HTTP handlers.
///
/// Handlers hold an `Arc<dyn Store>` instead of touching SQLite directly, so
/// every read goes through here and nothing is cached in between. Calls are
/// blocking; async callers run them on `spawn_blocking`.
pub trait Store: Send + Sync {
    // -- Users --

    /// Fails with [`crate::Error::Conflict`] when the username is taken.
    fn create_user(&self, user: &UserRow) -> Result<()>;
    fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>>;
    fn list_users(&self) -> Result<Vec<UserRow>>;

    // -- Blogs --

    fn insert_blog(&self, blog: &BlogRow) -> Result<()>;
    fn get_blog(&self, id: &str) -> Result<Option<BlogRow>>;
    fn list_blogs(&self) -> Result<Vec<BlogRow>>;
    fn blogs_by_owner(&self, user_id: &str) -> Result<Vec<BlogRow>>;
    /// Returns the updated row, or `None` if it no longer exists.
    fn update_blog_likes(&self, id: &str, likes: i64) -> Result<Option<BlogRow>>;
    /// Returns whether a row was removed.
    fn delete_blog(&self, id: &str) -> Result<bool>;

    // -- Notes --

    fn insert_note(&self, note: &NoteRow) -> Result<()>;
    fn get_note(&self, id: &str) -> Result<Option<NoteRow>>;
    fn list_notes(&self) -> Result<Vec<NoteRow>>;
    fn notes_by_owner(&self, user_id: &str) -> Result<Vec<NoteRow>>;
    fn update_note_importance(&self, id: &str, important: bool) -> Result<Option<NoteRow>>;
    fn delete_note(&self, id: &str) -> Result<bool>;

    // -- Persons --

    /// Fails with [`crate::Error::Conflict`] when the name is taken.
    fn insert_person(&self, person: &PersonRow) -> Result<()>;
    fn get_person(&self, id: &str) -> Result<Option<PersonRow>>;
    fn list_persons(&self) -> Result<Vec<PersonRow>>;
    fn count_persons(&self) -> Result<usize>;
    fn update_person_number(&self, id: &str, number: &str) -> Result<Option<PersonRow>>;
    fn delete_person(&self, id: &str) -> Result<bool>;
}
