use crate::errors::ApiError;
use rusqlite::Connection;

/// Opens a connection with foreign keys enabled. SQLite leaves them off per
/// connection, and the cascade chain (users -> companies -> jobs ->
/// applications/favorites) depends on them.
pub fn connect(path: &str) -> Result<Connection, ApiError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Creates the schema if missing. Uniqueness invariants (email, username,
/// job+applicant, user+job) live here as UNIQUE constraints so that two
/// concurrent identical requests race at the storage layer and one of them
/// loses with a constraint violation instead of both inserting.
pub fn init_schema(conn: &Connection) -> Result<(), ApiError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            email         TEXT NOT NULL UNIQUE,
            username      TEXT NOT NULL UNIQUE,
            password      TEXT NOT NULL,
            role          TEXT NOT NULL DEFAULT 'user',
            is_superuser  INTEGER NOT NULL DEFAULT 0,
            bio           TEXT,
            location      TEXT,
            phone         TEXT,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS companies (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            description TEXT NOT NULL,
            website     TEXT,
            owner_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS jobs (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            title                TEXT NOT NULL,
            description          TEXT NOT NULL,
            company_id           INTEGER NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
            location             TEXT NOT NULL,
            posted_by            INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            is_active            INTEGER NOT NULL DEFAULT 1,
            experience           TEXT,
            min_experience_years INTEGER,
            max_experience_years INTEGER,
            mode                 TEXT,
            salary               INTEGER,
            salary_currency      TEXT,
            category             TEXT,
            created_at           TEXT NOT NULL,
            updated_at           TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS applications (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id       INTEGER NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
            applicant_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            status       TEXT NOT NULL DEFAULT 'applied',
            resume       TEXT,
            cover_letter TEXT,
            created_at   TEXT NOT NULL,
            updated_at   TEXT NOT NULL,
            UNIQUE (job_id, applicant_id)
        );

        CREATE TABLE IF NOT EXISTS favorites (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            job_id     INTEGER NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (user_id, job_id)
        );",
    )?;
    Ok(())
}

#[cfg(test)]
pub fn open_test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory db");
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    init_schema(&conn).unwrap();
    conn
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn seed_user(conn: &Connection, email: &str) -> i64 {
        conn.execute(
            "INSERT INTO users (email, username, password, created_at, updated_at)
             VALUES (?1, ?2, 'x', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
            params![email, email],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    #[test]
    fn schema_init_is_idempotent() {
        let conn = open_test_db();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn deleting_a_user_cascades_down_the_ownership_chain() {
        let conn = open_test_db();
        let owner = seed_user(&conn, "owner@x.com");
        let applicant = seed_user(&conn, "applicant@x.com");
        conn.execute(
            "INSERT INTO companies (name, description, owner_id, created_at, updated_at)
             VALUES ('Acme', 'd', ?1, 't', 't')",
            params![owner],
        )
        .unwrap();
        let company = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO jobs (title, description, company_id, location, posted_by, created_at, updated_at)
             VALUES ('Engineer', 'd', ?1, 'Remote', ?2, 't', 't')",
            params![company, owner],
        )
        .unwrap();
        let job = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO applications (job_id, applicant_id, created_at, updated_at)
             VALUES (?1, ?2, 't', 't')",
            params![job, applicant],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO favorites (user_id, job_id, created_at, updated_at)
             VALUES (?1, ?2, 't', 't')",
            params![applicant, job],
        )
        .unwrap();

        conn.execute("DELETE FROM users WHERE id = ?1", params![owner])
            .unwrap();

        let count = |table: &str| -> i64 {
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
                .unwrap()
        };
        assert_eq!(count("companies"), 0);
        assert_eq!(count("jobs"), 0);
        assert_eq!(count("applications"), 0);
        assert_eq!(count("favorites"), 0);
        // the applicant account itself survives
        assert_eq!(count("users"), 1);
    }

    #[test]
    fn duplicate_email_is_a_constraint_violation() {
        let conn = open_test_db();
        seed_user(&conn, "dup@x.com");
        let err = conn
            .execute(
                "INSERT INTO users (email, username, password, created_at, updated_at)
                 VALUES ('dup@x.com', 'other', 'x', 't', 't')",
                [],
            )
            .unwrap_err();
        match err {
            rusqlite::Error::SqliteFailure(f, _) => {
                assert_eq!(f.code, rusqlite::ErrorCode::ConstraintViolation);
            }
            other => panic!("expected constraint violation, got {:?}", other),
        }
    }
}
