//! Password hashing and verification with bcrypt.
//!
//! The stored hash carries its own salt and cost factor, so verification
//! needs nothing but the plaintext and the hash. bcrypt is CPU-bound;
//! async callers should use the `_blocking` variants, which move the work
//! onto Tokio's blocking pool.

use std::sync::OnceLock;

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

/// Returns `Ok(false)` on a wrong password and `Err` only when `hash` is not
/// a parseable bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(AppError::internal)?
}

pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(AppError::internal)?
}

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

fn dummy_hash() -> &'static str {
    DUMMY_HASH.get_or_init(|| hash_password("carepoint-dummy-password").unwrap_or_default())
}

/// Builds the hash that [`verify_dummy_password`] checks against. Startup
/// calls this so the first unknown-email login does not also pay for hashing.
pub async fn prepare_dummy_hash() -> Result<(), AppError> {
    tokio::task::spawn_blocking(|| {
        dummy_hash();
    })
    .await
    .map_err(AppError::internal)
}

/// Spends the same bcrypt work as a real verification against a hash nobody
/// owns. Login runs this when the email is unknown so response timing does
/// not reveal which emails are registered.
pub async fn verify_dummy_password(password: String) {
    let outcome = tokio::task::spawn_blocking(move || verify_password(&password, dummy_hash())).await;

    if let Err(e) = outcome {
        tracing::warn!(error = %e, "Dummy password verification did not complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("pw123456").unwrap();

        assert_ne!(hash, "pw123456");
        assert!(verify_password("pw123456", &hash).unwrap());
        assert!(!verify_password("pw1234567", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("samepassword").unwrap();
        let second = hash_password("samepassword").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("samepassword", &first).unwrap());
        assert!(verify_password("samepassword", &second).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not_a_valid_bcrypt_hash").is_err());
    }

    #[tokio::test]
    async fn test_prepare_dummy_hash_builds_it_up_front() {
        prepare_dummy_hash().await.unwrap();

        let prepared = DUMMY_HASH.get().expect("dummy hash built");
        assert!(prepared.starts_with("$2"));
        assert_eq!(dummy_hash(), prepared.as_str());
    }

    #[test]
    fn test_dummy_hash_is_a_real_hash() {
        assert!(dummy_hash().starts_with("$2"));
        assert!(!verify_password("pw123456", dummy_hash()).unwrap());
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let hash = hash_password_blocking("p@ssw0rd!#".to_string()).await.unwrap();

        assert!(
            verify_password_blocking("p@ssw0rd!#".to_string(), hash.clone())
                .await
                .unwrap()
        );
        assert!(
            !verify_password_blocking("wrong".to_string(), hash)
                .await
                .unwrap()
        );
    }
}
