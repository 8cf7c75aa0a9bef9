//! User domain model

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// Maximum username length in characters
pub const USERNAME_MAX_LEN: usize = 64;

/// Maximum email length in characters
pub const EMAIL_MAX_LEN: usize = 120;

/// Maximum "about me" length in characters
pub const ABOUT_ME_MAX_LEN: usize = 140;

/// Gravatar endpoint for identicon avatars
const GRAVATAR_URL: &str = "https://www.gravatar.com/avatar";

/// A registered user
///
/// The password is never held in plain form; only the argon2 PHC string
/// derived from it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub about_me: Option<String>,
    pub last_seen: DateTime<Utc>,
}

impl User {
    /// Avatar image URL for this user, scaled to `size_px` pixels
    ///
    /// Deterministic for a given email, case-insensitively: two users whose
    /// emails differ only in case get the same identicon.
    pub fn avatar_url(&self, size_px: u32) -> String {
        avatar_url_for_email(&self.email, size_px)
    }

    /// Normalize an email for hashing and comparison
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Validate a candidate username
    pub fn validate_username(username: &str) -> Result<(), &'static str> {
        if username.trim().is_empty() {
            return Err("username cannot be empty");
        }
        if username.chars().count() > USERNAME_MAX_LEN {
            return Err("username is too long");
        }
        if username.chars().any(char::is_whitespace) {
            return Err("username cannot contain whitespace");
        }
        Ok(())
    }

    /// Validate a candidate email address
    pub fn validate_email(email: &str) -> Result<(), &'static str> {
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err("email cannot be empty");
        }
        if !trimmed.contains('@') {
            return Err("email must contain '@'");
        }
        if trimmed.chars().count() > EMAIL_MAX_LEN {
            return Err("email is too long");
        }
        Ok(())
    }

    /// Validate an "about me" text
    pub fn validate_about_me(about_me: &str) -> Result<(), &'static str> {
        if about_me.chars().count() > ABOUT_ME_MAX_LEN {
            return Err("about me is too long");
        }
        Ok(())
    }
}

/// Identicon URL for an email, without needing a full user row
///
/// The digest is the md5 of the normalized (trimmed, lowercased) email,
/// which is what the Gravatar protocol keys on. A non-positive size is
/// clamped to 1 pixel.
pub fn avatar_url_for_email(email: &str, size_px: u32) -> String {
    let digest = Md5::digest(User::normalize_email(email).as_bytes());
    format!("{}/{:x}?d=identicon&s={}", GRAVATAR_URL, digest, size_px.max(1))
}
