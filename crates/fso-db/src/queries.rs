use rusqlite::{Connection, OptionalExtension, Row};

use crate::models::{BlogRow, NoteRow, PersonRow, UserRow};
use crate::{Database, Result, Store};

const USER_COLUMNS: &str = "id, username, name, password_hash, created_at";
const BLOG_COLUMNS: &str = "id, title, author, url, likes, user_id, created_at";
const NOTE_COLUMNS: &str = "id, content, important, user_id, date";

impl Store for Database {
    // -- Users --

    fn create_user(&self, user: &UserRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, name, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    user.id,
                    user.username,
                    user.name,
                    user.password_hash,
                    user.created_at
                ],
            )?;
            Ok(())
        })
    }

    fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY rowid"))?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Blogs --

    fn insert_blog(&self, blog: &BlogRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO blogs (id, title, author, url, likes, user_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    blog.id,
                    blog.title,
                    blog.author,
                    blog.url,
                    blog.likes,
                    blog.user_id,
                    blog.created_at
                ],
            )?;
            Ok(())
        })
    }

    fn get_blog(&self, id: &str) -> Result<Option<BlogRow>> {
        self.with_conn(|conn| query_blog(conn, id))
    }

    fn list_blogs(&self) -> Result<Vec<BlogRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {BLOG_COLUMNS} FROM blogs ORDER BY rowid"))?;
            let rows = stmt
                .query_map([], blog_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn blogs_by_owner(&self, user_id: &str) -> Result<Vec<BlogRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BLOG_COLUMNS} FROM blogs WHERE user_id = ?1 ORDER BY rowid"
            ))?;
            let rows = stmt
                .query_map([user_id], blog_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn update_blog_likes(&self, id: &str, likes: i64) -> Result<Option<BlogRow>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE blogs SET likes = ?2 WHERE id = ?1",
                rusqlite::params![id, likes],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_blog(conn, id)
        })
    }

    fn delete_blog(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM blogs WHERE id = ?1", [id])? > 0))
    }

    // -- Notes --

    fn insert_note(&self, note: &NoteRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notes (id, content, important, user_id, date)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![note.id, note.content, note.important, note.user_id, note.date],
            )?;
            Ok(())
        })
    }

    fn get_note(&self, id: &str) -> Result<Option<NoteRow>> {
        self.with_conn(|conn| query_note(conn, id))
    }

    fn list_notes(&self) -> Result<Vec<NoteRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY rowid"))?;
            let rows = stmt
                .query_map([], note_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn notes_by_owner(&self, user_id: &str) -> Result<Vec<NoteRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = ?1 ORDER BY rowid"
            ))?;
            let rows = stmt
                .query_map([user_id], note_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn update_note_importance(&self, id: &str, important: bool) -> Result<Option<NoteRow>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE notes SET important = ?2 WHERE id = ?1",
                rusqlite::params![id, important],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_note(conn, id)
        })
    }

    fn delete_note(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM notes WHERE id = ?1", [id])? > 0))
    }

    // -- Persons --

    fn insert_person(&self, person: &PersonRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO persons (id, name, number) VALUES (?1, ?2, ?3)",
                (&person.id, &person.name, &person.number),
            )?;
            Ok(())
        })
    }

    fn get_person(&self, id: &str) -> Result<Option<PersonRow>> {
        self.with_conn(|conn| query_person(conn, id))
    }

    fn list_persons(&self) -> Result<Vec<PersonRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, number FROM persons ORDER BY rowid")?;
            let rows = stmt
                .query_map([], person_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn count_persons(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM persons", [], |row| row.get(0))?;
            Ok(usize::try_from(count).unwrap_or_default())
        })
    }

    fn update_person_number(&self, id: &str, number: &str) -> Result<Option<PersonRow>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE persons SET number = ?2 WHERE id = ?1",
                (id, number),
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_person(conn, id)
        })
    }

    fn delete_person(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM persons WHERE id = ?1", [id])? > 0))
    }
}

/// `column` is always a literal from this module, never caller input.
fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"
    ))?;
    let row = stmt.query_row([value], user_from_row).optional()?;
    Ok(row)
}

fn query_blog(conn: &Connection, id: &str) -> Result<Option<BlogRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = ?1"))?;
    let row = stmt.query_row([id], blog_from_row).optional()?;
    Ok(row)
}

fn query_note(conn: &Connection, id: &str) -> Result<Option<NoteRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"))?;
    let row = stmt.query_row([id], note_from_row).optional()?;
    Ok(row)
}

fn query_person(conn: &Connection, id: &str) -> Result<Option<PersonRow>> {
    let mut stmt = conn.prepare("SELECT id, name, number FROM persons WHERE id = ?1")?;
    let row = stmt.query_row([id], person_from_row).optional()?;
    Ok(row)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn blog_from_row(row: &Row<'_>) -> rusqlite::Result<BlogRow> {
    Ok(BlogRow {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        url: row.get(3)?,
        likes: row.get(4)?,
        user_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<NoteRow> {
    Ok(NoteRow {
        id: row.get(0)?,
        content: row.get(1)?,
        important: row.get(2)?,
        user_id: row.get(3)?,
        date: row.get(4)?,
    })
}

fn person_from_row(row: &Row<'_>) -> rusqlite::Result<PersonRow> {
    Ok(PersonRow {
        id: row.get(0)?,
        name: row.get(1)?,
        number: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn user(username: &str) -> UserRow {
        UserRow {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            name: Some("Test User".to_string()),
            password_hash: "$argon2id$placeholder".to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn blog(owner: Option<&str>, likes: i64) -> BlogRow {
        BlogRow {
            id: uuid::Uuid::new_v4().to_string(),
            title: "Go To Statement Considered Harmful".to_string(),
            author: "Edsger W. Dijkstra".to_string(),
            url: "https://example.com/goto".to_string(),
            likes,
            user_id: owner.map(str::to_string),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn user_lookup_by_id_and_username() {
        let db = db();
        let alice = user("alice");
        db.create_user(&alice).unwrap();

        assert_eq!(db.get_user_by_id(&alice.id).unwrap(), Some(alice.clone()));
        assert_eq!(db.get_user_by_username("alice").unwrap(), Some(alice));
        assert_eq!(db.get_user_by_username("bob").unwrap(), None);
    }

    #[test]
    fn duplicate_username_is_a_conflict() {
        let db = db();
        db.create_user(&user("root")).unwrap();

        let err = db.create_user(&user("root")).unwrap_err();
        match err {
            Error::Conflict { field } => assert_eq!(field, "username"),
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(db.list_users().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_person_name_is_a_conflict() {
        let db = db();
        let person = |id: &str| PersonRow {
            id: id.to_string(),
            name: "Arto Hellas".to_string(),
            number: "040-123456".to_string(),
        };
        db.insert_person(&person("a")).unwrap();

        assert!(matches!(
            db.insert_person(&person("b")),
            Err(Error::Conflict { field }) if field == "name"
        ));
        assert_eq!(db.count_persons().unwrap(), 1);
    }

    #[test]
    fn updating_likes_keeps_the_owner() {
        let db = db();
        let owner = user("owner");
        db.create_user(&owner).unwrap();
        let row = blog(Some(&owner.id), 3);
        db.insert_blog(&row).unwrap();

        let updated = db.update_blog_likes(&row.id, 4).unwrap().unwrap();
        assert_eq!(updated.likes, 4);
        assert_eq!(updated.user_id, Some(owner.id));
        assert_eq!(updated.title, row.title);
    }

    #[test]
    fn update_of_missing_row_returns_none() {
        let db = db();
        assert_eq!(db.update_blog_likes("missing", 1).unwrap(), None);
        assert_eq!(db.update_note_importance("missing", true).unwrap(), None);
        assert_eq!(db.update_person_number("missing", "040-1234567").unwrap(), None);
    }

    #[test]
    fn delete_reports_whether_a_row_went_away() {
        let db = db();
        let row = blog(None, 0);
        db.insert_blog(&row).unwrap();

        assert!(db.delete_blog(&row.id).unwrap());
        assert!(!db.delete_blog(&row.id).unwrap());
        assert!(db.list_blogs().unwrap().is_empty());
    }

    #[test]
    fn owner_index_only_lists_owned_rows() {
        let db = db();
        let alice = user("alice");
        let bob = user("bob");
        db.create_user(&alice).unwrap();
        db.create_user(&bob).unwrap();

        db.insert_blog(&blog(Some(&alice.id), 1)).unwrap();
        db.insert_blog(&blog(Some(&alice.id), 2)).unwrap();
        db.insert_blog(&blog(Some(&bob.id), 3)).unwrap();
        db.insert_note(&NoteRow {
            id: "n1".to_string(),
            content: "HTML is easy".to_string(),
            important: true,
            user_id: Some(bob.id.clone()),
            date: chrono::Utc::now().to_rfc3339(),
        })
        .unwrap();

        assert_eq!(db.blogs_by_owner(&alice.id).unwrap().len(), 2);
        assert_eq!(db.blogs_by_owner(&bob.id).unwrap().len(), 1);
        assert!(db.notes_by_owner(&alice.id).unwrap().is_empty());
        assert_eq!(db.notes_by_owner(&bob.id).unwrap()[0].content, "HTML is easy");
    }

    #[test]
    fn blog_owner_must_reference_an_existing_user() {
        let db = db();
        assert!(matches!(
            db.insert_blog(&blog(Some("ghost"), 0)),
            Err(Error::Sqlite(_))
        ));
    }
}
