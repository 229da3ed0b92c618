//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings, so the salt and parameters travel with
//! the hash and verification needs nothing else.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{AppError, AppResult};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Malformed password hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "Password verification failed: {}",
            e
        ))),
    }
}

/// Hash of a throwaway password, built once on first use.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| hash_password("devlog-no-such-user").ok())
        .as_deref()
}

/// Runs a full verification against a throwaway hash and discards the
/// result. Login calls this for unknown usernames so both failure paths
/// cost one Argon2 verification.
pub fn verify_against_dummy(password: &str) {
    match dummy_hash() {
        Some(hash) => {
            let _ = verify_password(password, hash);
        }
        None => tracing::warn!("Dummy password hash unavailable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("pw1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("pw1", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("real-password").unwrap();
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_dummy_hash_is_verifiable() {
        let hash = dummy_hash().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!verify_password("pw1", hash).unwrap());
        assert_eq!(dummy_hash(), Some(hash));
        verify_against_dummy("pw1");
    }

    #[test]
    fn test_same_password_different_salt() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }
}
