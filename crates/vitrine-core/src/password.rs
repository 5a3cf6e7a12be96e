//! Argon2 password hashing for user accounts.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;
use std::sync::LazyLock;

use crate::AppError;

/// Hash a password into a PHC string (argon2id, random salt).
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored PHC string. A malformed stored hash counts as a
/// mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is not a valid PHC string");
            false
        }
    }
}

/// Hash of a throwaway password, checked when the account does not exist.
static DECOY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("vitrine-decoy-password").ok());

/// Check a login attempt. With no stored hash the password is still run through argon2
/// against a decoy, so unknown accounts and wrong passwords cost the same.
pub fn verify_login(password: &str, stored_hash: Option<&str>) -> bool {
    match stored_hash {
        Some(hash) => verify_password(password, hash),
        None => {
            if let Some(decoy) = DECOY_HASH.as_deref() {
                verify_password(password, decoy);
            }
            false
        }
    }
}
