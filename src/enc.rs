use crate::errors::ApiError;
use argonautica::{Hasher, Verifier};

pub fn hash_password(password: &str, secret: &str) -> Result<String, ApiError> {
    let mut hasher = Hasher::default();
    hasher
        .with_password(password)
        .with_secret_key(secret)
        .configure_variant(argonautica::config::Variant::Argon2id)
        .hash()
        .map_err(|e| ApiError::Database(format!("Password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, hash: &str, secret: &str) -> Result<bool, ApiError> {
    let mut verifier = Verifier::default();
    verifier
        .with_hash(hash)
        .with_password(password)
        .with_secret_key(secret)
        .verify()
        .map_err(|e| ApiError::Database(format!("Password verification failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_accepts_the_right_password() {
        let hash = hash_password("hunter2", "test-secret").unwrap();
        assert!(verify_password("hunter2", &hash, "test-secret").unwrap());
        assert!(!verify_password("hunter3", &hash, "test-secret").unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("hunter2", "test-secret").unwrap();
        let b = hash_password("hunter2", "test-secret").unwrap();
        assert_ne!(a, b);
    }
}
