use rusqlite::{OptionalExtension, Row, params};

use crate::models::{DiaryRow, UserRow};
use crate::{Database, DbError, Result};

impl Database {
    // -- Users --

    /// Inserts a user and returns the generated id. A taken username yields
    /// `DbError::UsernameTaken` and leaves the table untouched.
    pub fn register_user(&self, username: &str, password_hash: &str) -> Result<i64> {
        self.with_conn(|conn| {
            match conn.execute(
                "INSERT INTO user (username, password) VALUES (?1, ?2)",
                params![username, password_hash],
            ) {
                Ok(_) => Ok(conn.last_insert_rowid()),
                Err(e) if DbError::is_unique_violation(&e) => Err(DbError::UsernameTaken),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, username, password, registration_time FROM user WHERE username = ?1",
                    [username],
                    user_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, username, password, registration_time FROM user WHERE id = ?1",
                    [id],
                    user_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Diaries --

    pub fn add_diary(&self, title: &str, content: Option<&str>, user_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO diary (title, content, user_id) VALUES (?1, ?2, ?3)",
                params![title, content, user_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Updates title and content only. Unknown ids are a no-op.
    pub fn edit_diary(&self, diary_id: i64, title: &str, content: Option<&str>) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE diary SET title = ?1, content = ?2 WHERE id = ?3",
                params![title, content, diary_id],
            )?;
            Ok(())
        })
    }

    /// Unknown ids are a no-op.
    pub fn delete_diary(&self, diary_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM diary WHERE id = ?1", [diary_id])?;
            Ok(())
        })
    }

    pub fn get_diary(&self, diary_id: i64) -> Result<Option<DiaryRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, user_id, title, content, created_at FROM diary WHERE id = ?1",
                    [diary_id],
                    diary_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// All diaries owned by `user_id`, in storage order.
    pub fn get_user_diaries(&self, user_id: i64) -> Result<Vec<DiaryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, title, content, created_at FROM diary WHERE user_id = ?1",
            )?;

            let rows = stmt
                .query_map([user_id], diary_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        registration_time: row.get(3)?,
    })
}

fn diary_from_row(row: &Row<'_>) -> rusqlite::Result<DiaryRow> {
    Ok(DiaryRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_users(names: &[&str]) -> (Database, Vec<i64>) {
        let db = Database::open_in_memory().unwrap();
        let ids = names
            .iter()
            .map(|name| db.register_user(name, "hash").unwrap())
            .collect();
        (db, ids)
    }

    fn diary_count(db: &Database) -> i64 {
        db.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM diary", [], |r| r.get(0))?)
        })
        .unwrap()
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let db = Database::open_in_memory().unwrap();

        assert!(db.register_user("alice", "hash1").is_ok());
        let second = db.register_user("alice", "hash2");
        assert!(matches!(second, Err(DbError::UsernameTaken)));

        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM user WHERE username = ?1",
                    ["alice"],
                    |r| r.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(count, 1);

        let stored = db.find_user_by_username("alice").unwrap().unwrap();
        assert_eq!(stored.password, "hash1");
    }

    #[test]
    fn user_lookup() {
        let (db, ids) = db_with_users(&["alice"]);

        let user = db.find_user_by_username("alice").unwrap().unwrap();
        assert_eq!(user.id, ids[0]);
        assert!(!user.registration_time.is_empty());
        assert_eq!(db.get_user_by_id(ids[0]).unwrap(), Some(user));

        assert!(db.find_user_by_username("nobody").unwrap().is_none());
        assert!(db.get_user_by_id(999).unwrap().is_none());
    }

    #[test]
    fn diaries_are_scoped_to_owner() {
        let (db, ids) = db_with_users(&["one", "two"]);

        let id = db.add_diary("title", Some("content"), ids[0]).unwrap();

        let mine = db.get_user_diaries(ids[0]).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, id);
        assert_eq!(mine[0].user_id, ids[0]);
        assert_eq!(mine[0].title, "title");
        assert_eq!(mine[0].content.as_deref(), Some("content"));

        assert!(db.get_user_diaries(ids[1]).unwrap().is_empty());
    }

    #[test]
    fn diary_requires_existing_user() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.add_diary("orphan", None, 42).is_err());
        assert_eq!(diary_count(&db), 0);
    }

    #[test]
    fn edit_changes_only_title_and_content() {
        let (db, ids) = db_with_users(&["alice"]);
        let id = db.add_diary("before", Some("old"), ids[0]).unwrap();
        let original = db.get_diary(id).unwrap().unwrap();

        db.edit_diary(id, "after", None).unwrap();

        let edited = db.get_diary(id).unwrap().unwrap();
        assert_eq!(edited.id, original.id);
        assert_eq!(edited.user_id, original.user_id);
        assert_eq!(edited.created_at, original.created_at);
        assert_eq!(edited.title, "after");
        assert_eq!(edited.content, None);
    }

    #[test]
    fn edit_unknown_id_is_noop() {
        let (db, ids) = db_with_users(&["alice"]);
        let id = db.add_diary("keep", Some("me"), ids[0]).unwrap();
        let before = db.get_diary(id).unwrap();

        db.edit_diary(999, "x", Some("y")).unwrap();

        assert_eq!(db.get_diary(id).unwrap(), before);
        assert!(db.get_diary(999).unwrap().is_none());
        assert_eq!(diary_count(&db), 1);
    }

    #[test]
    fn delete_removes_row() {
        let (db, ids) = db_with_users(&["alice"]);
        let keep = db.add_diary("keep", None, ids[0]).unwrap();
        let gone = db.add_diary("gone", None, ids[0]).unwrap();

        db.delete_diary(gone).unwrap();

        let left: Vec<i64> = db
            .get_user_diaries(ids[0])
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(left, vec![keep]);

        // second delete and unknown id are both no-ops
        db.delete_diary(gone).unwrap();
        db.delete_diary(999).unwrap();
        assert_eq!(diary_count(&db), 1);
    }

    #[test]
    fn migrations_are_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| crate::migrations::run(conn)).unwrap();
    }
}
