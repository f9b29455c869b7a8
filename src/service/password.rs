//! Argon2id password hashing.
//!
//! Hashes are PHC strings carrying the algorithm, parameters and a random
//! per-password salt. Both operations run on tokio's blocking pool.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use tokio::task::JoinError;

use crate::error::ApiError;

/// Hashes `password` with a fresh salt.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if hashing fails.
pub async fn hash_password(password: &str) -> Result<String, ApiError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(task_failed)?
}

/// Checks `password` against a stored PHC string.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the stored hash is malformed.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || verify_blocking(&password, &hash))
        .await
        .map_err(task_failed)?
}

fn task_failed(err: JoinError) -> ApiError {
    tracing::error!(error = %err, "password task failed");
    ApiError::Internal("password task failed".to_string())
}

fn hash_blocking(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            ApiError::Internal("password hashing failed".to_string())
        })
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        tracing::error!(error = %e, "stored password hash is malformed");
        ApiError::Internal("password verification failed".to_string())
    })?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => {
            tracing::error!(error = %e, "password verification failed");
            Err(ApiError::Internal("password verification failed".to_string()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_is_argon2id_and_salted() {
        let (Ok(first), Ok(second)) = (
            hash_password("hunter22").await,
            hash_password("hunter22").await,
        ) else {
            panic!("hashing should succeed");
        };
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn verify_accepts_only_the_original() {
        let Ok(hash) = hash_password("correct horse").await else {
            panic!("hashing should succeed");
        };
        assert!(matches!(verify_password("correct horse", &hash).await, Ok(true)));
        assert!(matches!(verify_password("battery staple", &hash).await, Ok(false)));
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").await.is_err());
    }
}
