//! Stored credentials: argon2id PHC strings in `users.password_hash`.
//!
//! Users are only ever created by the seeder and by test fixtures, so there
//! is no password policy here; login forms just require a non-empty value.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

use crate::errors::{AppError, AppResult};

/// Hash checked when no account matches, so unknown emails cost the same
/// as wrong passwords.
static UNKNOWN_ACCOUNT_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("rent-n-go-unknown-account").ok());

/// Hash a plain password into a PHC string for `users.password_hash`.
pub fn hash_password(plain: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))
}

/// Check `plain` against the stored hash of the account, if there is one.
///
/// A missing account still runs a full verification and then fails.
/// Malformed stored hashes never verify.
pub fn verify_password(plain: &str, stored: Option<&str>) -> bool {
    let (hash, known) = match (stored, UNKNOWN_ACCOUNT_HASH.as_deref()) {
        (Some(hash), _) => (hash, true),
        (None, Some(dummy)) => (dummy, false),
        (None, None) => return false,
    };

    let matches = match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {}", e);
            false
        }
    };

    known && matches
}
