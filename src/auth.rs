use crate::enums::Role;
use crate::errors::ApiError;
use crate::models::User;
use actix_web_httpauth::extractors::bearer::BearerAuth;
use hmac::{Hmac, Mac};
use jwt::{SignWithKey, VerifyWithKey};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

const TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// The resolved identity behind a request. Handlers receive
/// `Option<AuthUser>`: `None` is an anonymous actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub is_superuser: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub superuser: bool,
    pub exp: i64,
}

fn signing_key(secret: &str) -> Result<Hmac<Sha256>, ApiError> {
    Hmac::new_from_slice(secret.as_bytes())
        .map_err(|e| ApiError::Database(format!("Invalid JWT secret: {}", e)))
}

/// Issues a signed token carrying {user id, email, role, superuser flag}.
pub fn issue_token(user: &User, secret: &str) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        superuser: user.is_superuser,
        exp: chrono::Utc::now().timestamp() + TOKEN_LIFETIME_SECS,
    };
    claims
        .sign_with_key(&signing_key(secret)?)
        .map_err(|e| ApiError::Database(format!("Failed to sign token: {}", e)))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let claims: Claims = token
        .verify_with_key(&signing_key(secret)?)
        .map_err(|_| ApiError::NotAuthenticated("Invalid token".to_string()))?;
    if claims.exp < chrono::Utc::now().timestamp() {
        return Err(ApiError::NotAuthenticated("Token expired".to_string()));
    }
    Ok(claims)
}

/// Turns an optional bearer credential into an optional actor. A missing,
/// invalid, or expired token resolves to anonymous rather than failing the
/// request; whether anonymous is acceptable is the policy's call, not the
/// transport's. The user record is re-read from the database so a deleted
/// account or a changed role takes effect immediately.
pub fn resolve_actor(
    conn: &Connection,
    auth: Option<&BearerAuth>,
    secret: &str,
) -> Result<Option<AuthUser>, ApiError> {
    let Some(auth) = auth else {
        return Ok(None);
    };
    let claims = match verify_token(auth.token(), secret) {
        Ok(claims) => claims,
        Err(_) => {
            tracing::debug!("bearer token rejected, treating request as anonymous");
            return Ok(None);
        }
    };
    let Some(user) = User::get(conn, claims.sub)? else {
        return Ok(None);
    };
    Ok(Some(AuthUser {
        id: user.id,
        email: user.email,
        role: user.role,
        is_superuser: user.is_superuser,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_test_db;
    use crate::models::NewUser;

    fn sample_user(id: i64) -> User {
        User {
            id,
            email: "alice@x.com".to_string(),
            username: "alice".to_string(),
            password: "hash".to_string(),
            role: Role::User,
            is_superuser: false,
            bio: None,
            location: None,
            phone: None,
            created_at: "t".to_string(),
            updated_at: "t".to_string(),
        }
    }

    #[test]
    fn token_round_trips_its_claims() {
        let user = sample_user(42);
        let token = issue_token(&user, "secret").unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.role, Role::User);
        assert!(!claims.superuser);
    }

    #[test]
    fn token_signed_with_a_different_secret_is_rejected() {
        let user = sample_user(42);
        let token = issue_token(&user, "secret").unwrap();
        let result = verify_token(&token, "other-secret");
        assert!(matches!(result, Err(ApiError::NotAuthenticated(_))));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let user = sample_user(42);
        let mut token = issue_token(&user, "secret").unwrap();
        token.push('x');
        assert!(verify_token(&token, "secret").is_err());
    }

    #[test]
    fn deleted_user_resolves_to_anonymous() {
        let conn = open_test_db();
        let user = User::create(
            &conn,
            &NewUser {
                email: "gone@x.com".to_string(),
                username: "gone".to_string(),
                password_hash: "h".to_string(),
                role: Role::User,
                is_superuser: false,
                bio: None,
                location: None,
                phone: None,
            },
        )
        .unwrap();
        let token = issue_token(&user, "secret").unwrap();
        conn.execute("DELETE FROM users WHERE id = ?1", rusqlite::params![user.id])
            .unwrap();

        // resolve via claims path directly: the token is valid but the record is gone
        let claims = verify_token(&token, "secret").unwrap();
        assert!(User::get(&conn, claims.sub).unwrap().is_none());
    }
}
