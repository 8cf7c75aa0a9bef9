//! Account service - registration, lookup, and profile management

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::User;
use crate::services::credential::hash_password;

/// Account service for user records
pub struct AccountService {
    repository: Arc<DuckDbRepository>,
}

impl AccountService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Register a new user
    ///
    /// Validates the username, email, and password, rejects duplicates of
    /// either unique field, and stores the hashed credential. The unique
    /// indexes remain the backstop if two registrations race past the
    /// pre-checks.
    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        User::validate_username(username).map_err(Error::validation)?;
        User::validate_email(email).map_err(Error::validation)?;

        let email = User::normalize_email(email);

        if self.repository.get_user_by_username(username)?.is_some() {
            return Err(Error::conflict(format!("username '{}' is taken", username)));
        }
        if self.repository.get_user_by_email(&email)?.is_some() {
            return Err(Error::conflict(format!("email '{}' is already registered", email)));
        }

        let password_hash = hash_password(password)?;
        self.repository
            .insert_user(username, &email, &password_hash, Utc::now())
    }

    /// Look up a user by id; a miss is Ok(None), never an error
    pub fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        self.repository.get_user_by_id(id)
    }

    /// Look up a user by username (case-sensitive)
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        self.repository.get_user_by_username(username)
    }

    /// Look up a user by email (normalized before comparison)
    pub fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        self.repository.get_user_by_email(&User::normalize_email(email))
    }

    /// Update the user's free-text bio; None clears it
    pub fn update_about_me(&self, user_id: i64, about_me: Option<&str>) -> Result<()> {
        if let Some(text) = about_me {
            User::validate_about_me(text).map_err(Error::validation)?;
        }
        self.repository.update_about_me(user_id, about_me)
    }

    /// Record that the user was just seen (called by the session layer)
    pub fn touch_last_seen(&self, user_id: i64) -> Result<()> {
        self.repository.touch_last_seen(user_id, Utc::now())
    }

    /// Presentation summary of a user: profile fields plus graph counts
    pub fn profile(&self, username: &str) -> Result<Option<UserProfile>> {
        let user = match self.repository.get_user_by_username(username)? {
            Some(u) => u,
            None => return Ok(None),
        };

        Ok(Some(UserProfile {
            id: user.id,
            avatar_url: user.avatar_url(128),
            post_count: self.repository.count_posts_by_user(user.id)?,
            follower_count: self.repository.count_followers(user.id)?,
            following_count: self.repository.count_following(user.id)?,
            username: user.username,
            about_me: user.about_me,
            last_seen: user.last_seen.to_rfc3339(),
        }))
    }
}

/// A user profile as shown by the surrounding layer
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub about_me: Option<String>,
    pub last_seen: String,
    pub avatar_url: String,
    pub post_count: i64,
    pub follower_count: i64,
    pub following_count: i64,
}
