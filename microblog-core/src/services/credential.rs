//! Credential service - password hashing and verification
//!
//! Passwords are stored as argon2id PHC strings with per-credential salts.
//! Verification goes through the password_hash crate's constant-time
//! comparison; nothing here distinguishes a wrong password from a wrong
//! username (that policy belongs to the auth layer).

use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};

/// Derive a salted one-way hash from a plaintext password
pub fn hash_password(plaintext: &str) -> Result<String> {
    if plaintext.is_empty() {
        return Err(Error::validation("password cannot be empty"));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Other(format!("Failed to hash password: {}", e)))
}

/// Check a plaintext password against a stored PHC hash string
///
/// An unparsable stored hash verifies as false rather than erroring.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Credential service for user-bound password operations
pub struct CredentialService {
    repository: Arc<DuckDbRepository>,
}

impl CredentialService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Replace the user's credential with a hash of `plaintext`
    ///
    /// The previous credential is overwritten irreversibly.
    pub fn set_password(&self, user_id: i64, plaintext: &str) -> Result<()> {
        let hash = hash_password(plaintext)?;
        self.repository.update_password_hash(user_id, &hash)
    }

    /// True iff `plaintext` matches the user's stored credential
    pub fn check_password(&self, user_id: i64, plaintext: &str) -> Result<bool> {
        let user = self
            .repository
            .get_user_by_id(user_id)?
            .ok_or_else(|| Error::not_found(format!("user {}", user_id)))?;

        Ok(verify_password(plaintext, &user.password_hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("", &hash));
        assert!(!verify_password("Correct Horse", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(matches!(hash_password(""), Err(Error::Validation(_))));
    }

    #[test]
    fn test_garbage_stored_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
