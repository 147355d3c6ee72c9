//! Shared fixtures for unit tests: seeded rows and canned actors.

use crate::auth::AuthUser;
use crate::enums::Role;
use rusqlite::{params, Connection};

pub fn actor(id: i64) -> AuthUser {
    AuthUser {
        id,
        email: format!("user{}@x.com", id),
        role: Role::User,
        is_superuser: false,
    }
}

pub fn admin_actor(id: i64) -> AuthUser {
    AuthUser {
        role: Role::Admin,
        ..actor(id)
    }
}

pub fn superuser_actor(id: i64) -> AuthUser {
    AuthUser {
        is_superuser: true,
        ..actor(id)
    }
}

pub fn seed_user(conn: &Connection, email: &str) -> i64 {
    conn.execute(
        "INSERT INTO users (email, username, password, created_at, updated_at)
         VALUES (?1, ?2, 'x', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
        params![email, email],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn seed_company(conn: &Connection, owner_id: i64) -> i64 {
    conn.execute(
        "INSERT INTO companies (name, description, owner_id, created_at, updated_at)
         VALUES ('Acme', 'd', ?1, '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
        params![owner_id],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn seed_job(conn: &Connection, company_id: i64, posted_by: i64, title: &str) -> i64 {
    conn.execute(
        "INSERT INTO jobs (title, description, company_id, location, posted_by, created_at, updated_at)
         VALUES (?1, 'd', ?2, 'Remote', ?3, '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
        params![title, company_id, posted_by],
    )
    .unwrap();
    conn.last_insert_rowid()
}
