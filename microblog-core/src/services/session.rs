//! Session service - resolves stored session identifiers to users
//!
//! Implements the UserLoader port for the surrounding authentication
//! layer: it takes back the opaque identifier that layer persisted
//! (session file, cookie) and turns it into a durable user record.

use std::sync::Arc;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::Result;
use crate::domain::User;
use crate::ports::UserLoader;

/// Session service
pub struct SessionService {
    repository: Arc<DuckDbRepository>,
}

impl SessionService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }
}

impl UserLoader for SessionService {
    /// Resolve a stored identifier to a user
    ///
    /// Malformed identifiers resolve to Ok(None) exactly like identifiers
    /// of users that no longer exist; stale sessions must not crash the
    /// caller.
    fn load_user(&self, stored_id: &str) -> Result<Option<User>> {
        let id: i64 = match stored_id.trim().parse() {
            Ok(id) => id,
            Err(_) => return Ok(None),
        };

        self.repository.get_user_by_id(id)
    }
}
