use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

/// Failure taxonomy for every API operation. A missing or invalid actor on an
/// action that requires one is `NotAuthenticated`; an authenticated actor that
/// lacks the required role or ownership relation gets `Forbidden`. Uniqueness
/// violations surface as `Conflict` so clients can tell "already applied"
/// apart from a malformed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    NotAuthenticated(String),
    Forbidden(String),
    NotFound(String),
    Validation(String),
    Conflict(String),
    Database(String),
}

impl ApiError {
    pub fn not_authenticated() -> ApiError {
        ApiError::NotAuthenticated("Authentication required".to_string())
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::NotAuthenticated(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Validation(m)
            | ApiError::Conflict(m)
            | ApiError::Database(m) => m,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotAuthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Database(m) = self {
            tracing::error!(error = %m, "database failure");
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.message()
        }))
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(e: rusqlite::Error) -> ApiError {
        match e {
            rusqlite::Error::SqliteFailure(f, msg)
                if f.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                ApiError::Conflict(msg.unwrap_or_else(|| "Constraint violation".to_string()))
            }
            other => ApiError::Database(format!("Database error: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            ApiError::not_authenticated().status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("no".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Database("io".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn constraint_violations_become_conflicts() {
        let e = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE),
            Some("UNIQUE constraint failed: favorites.user_id, favorites.job_id".to_string()),
        );
        match ApiError::from(e) {
            ApiError::Conflict(msg) => assert!(msg.contains("UNIQUE")),
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn other_sqlite_errors_become_database_errors() {
        let e = rusqlite::Error::QueryReturnedNoRows;
        assert!(matches!(ApiError::from(e), ApiError::Database(_)));
    }
}
