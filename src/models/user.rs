use crate::enums::Role;
use crate::errors::ApiError;
use crate::models::now;
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub is_superuser: bool,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields accepted when creating an account. Registration always passes
/// `role = user` and `is_superuser = false`; only administrative seeding
/// sets anything else.
#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub is_superuser: bool,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?1?\d{9,15}$").expect("phone regex"))
}

/// Phone numbers look like '+999999999', 9 to 15 digits.
pub fn validate_phone(phone: &str) -> Result<(), ApiError> {
    if phone_regex().is_match(phone) {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "Phone number must be entered in the format: '+999999999'. Up to 15 digits allowed."
                .to_string(),
        ))
    }
}

impl User {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get("id")?,
            email: row.get("email")?,
            username: row.get("username")?,
            password: row.get("password")?,
            role: row.get("role")?,
            is_superuser: row.get("is_superuser")?,
            bio: row.get("bio")?,
            location: row.get("location")?,
            phone: row.get("phone")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn create(conn: &Connection, new: &NewUser) -> Result<User, ApiError> {
        if let Some(phone) = &new.phone {
            validate_phone(phone)?;
        }
        let ts = now();
        conn.execute(
            "INSERT INTO users (email, username, password, role, is_superuser, bio, location, phone, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                new.email,
                new.username,
                new.password_hash,
                new.role,
                new.is_superuser,
                new.bio,
                new.location,
                new.phone,
                ts,
                ts
            ],
        )
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                ApiError::Conflict("A user with this email or username already exists".to_string())
            }
            other => other,
        })?;
        let id = conn.last_insert_rowid();
        Ok(User {
            id,
            email: new.email.clone(),
            username: new.username.clone(),
            password: new.password_hash.clone(),
            role: new.role,
            is_superuser: new.is_superuser,
            bio: new.bio.clone(),
            location: new.location.clone(),
            phone: new.phone.clone(),
            created_at: ts.clone(),
            updated_at: ts,
        })
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<User>, ApiError> {
        conn.query_row("SELECT * FROM users WHERE id = ?1", params![id], |row| {
            User::from_row(row)
        })
        .optional()
        .map_err(ApiError::from)
    }

    pub fn get_by_email(conn: &Connection, email: &str) -> Result<Option<User>, ApiError> {
        conn.query_row(
            "SELECT * FROM users WHERE email = ?1",
            params![email],
            |row| User::from_row(row),
        )
        .optional()
        .map_err(ApiError::from)
    }

    pub fn list(conn: &Connection) -> Result<Vec<User>, ApiError> {
        let mut stmt = conn.prepare("SELECT * FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], |row| User::from_row(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_test_db;

    pub fn sample(email: &str, username: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: username.to_string(),
            password_hash: "hashed".to_string(),
            role: Role::User,
            is_superuser: false,
            bio: None,
            location: None,
            phone: None,
        }
    }

    #[test]
    fn create_and_fetch_by_email() {
        let conn = open_test_db();
        let created = User::create(&conn, &sample("alice@x.com", "alice")).unwrap();
        let fetched = User::get_by_email(&conn, "alice@x.com").unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.username, "alice");
        assert_eq!(fetched.role, Role::User);
        assert!(!fetched.is_superuser);
    }

    #[test]
    fn duplicate_email_or_username_is_a_conflict() {
        let conn = open_test_db();
        User::create(&conn, &sample("alice@x.com", "alice")).unwrap();
        let same_email = User::create(&conn, &sample("alice@x.com", "alice2"));
        assert!(matches!(same_email, Err(ApiError::Conflict(_))));
        let same_username = User::create(&conn, &sample("alice2@x.com", "alice"));
        assert!(matches!(same_username, Err(ApiError::Conflict(_))));
    }

    #[test]
    fn malformed_phone_is_a_validation_error() {
        let conn = open_test_db();
        let mut new = sample("bob@x.com", "bob");
        new.phone = Some("not-a-phone".to_string());
        assert!(matches!(
            User::create(&conn, &new),
            Err(ApiError::Validation(_))
        ));

        new.phone = Some("+254712345678".to_string());
        assert!(User::create(&conn, &new).is_ok());
    }

    #[test]
    fn phone_pattern_bounds() {
        assert!(validate_phone("+123456789").is_ok());
        assert!(validate_phone("123456789").is_ok());
        assert!(validate_phone("+12345678").is_err()); // too short
        assert!(validate_phone("+1234567890123456").is_err()); // too long
        assert!(validate_phone("+1234abc89").is_err());
    }

    #[test]
    fn password_hash_never_serializes() {
        let conn = open_test_db();
        let user = User::create(&conn, &sample("alice@x.com", "alice")).unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "alice@x.com");
    }
}
