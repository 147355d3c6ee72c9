use crate::errors::ApiError;
use crate::models::now;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub job_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Favorite {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Favorite> {
        Ok(Favorite {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            job_id: row.get("job_id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Saves a job for `user_id` (always the acting user). The (user, job)
    /// UNIQUE constraint makes the duplicate case a Conflict even under
    /// concurrent identical requests.
    pub fn create(conn: &Connection, user_id: i64, job_id: i64) -> Result<Favorite, ApiError> {
        let ts = now();
        conn.execute(
            "INSERT INTO favorites (user_id, job_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, job_id, ts, ts],
        )
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                ApiError::Conflict("You have already saved this job".to_string())
            }
            other => other,
        })?;
        Ok(Favorite {
            id: conn.last_insert_rowid(),
            user_id,
            job_id,
            created_at: ts.clone(),
            updated_at: ts,
        })
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<Favorite>, ApiError> {
        conn.query_row(
            "SELECT * FROM favorites WHERE id = ?1",
            params![id],
            |row| Favorite::from_row(row),
        )
        .optional()
        .map_err(ApiError::from)
    }

    /// A user only ever lists their own favorites; there is no wider scope,
    /// admins included.
    pub fn list_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Favorite>, ApiError> {
        let mut stmt = conn.prepare(
            "SELECT * FROM favorites WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let favorites = stmt
            .query_map(params![user_id], |row| Favorite::from_row(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(favorites)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<(), ApiError> {
        conn.execute("DELETE FROM favorites WHERE id = ?1", params![id])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_test_db;
    use crate::test_support::{seed_company, seed_job, seed_user};

    #[test]
    fn duplicate_favorite_is_a_conflict_and_persists_once() {
        let conn = open_test_db();
        let alice = seed_user(&conn, "alice@x.com");
        let bob = seed_user(&conn, "bob@x.com");
        let company = seed_company(&conn, alice);
        let job = seed_job(&conn, company, alice, "Engineer");

        Favorite::create(&conn, bob, job).unwrap();
        let dup = Favorite::create(&conn, bob, job);
        assert!(matches!(dup, Err(ApiError::Conflict(_))));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM favorites", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn listing_is_always_scoped_to_the_owner() {
        let conn = open_test_db();
        let alice = seed_user(&conn, "alice@x.com");
        let bob = seed_user(&conn, "bob@x.com");
        let company = seed_company(&conn, alice);
        let job = seed_job(&conn, company, alice, "Engineer");
        let other_job = seed_job(&conn, company, alice, "Designer");

        let bobs = Favorite::create(&conn, bob, job).unwrap();
        Favorite::create(&conn, alice, other_job).unwrap();

        let listed = Favorite::list_for_user(&conn, bob).unwrap();
        assert_eq!(listed.iter().map(|f| f.id).collect::<Vec<_>>(), vec![bobs.id]);
    }

    #[test]
    fn favoriting_a_missing_job_violates_the_foreign_key() {
        let conn = open_test_db();
        let bob = seed_user(&conn, "bob@x.com");
        let result = Favorite::create(&conn, bob, 999);
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }
}
