//! Post domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum post body length in characters
pub const BODY_MAX_LEN: usize = 140;

/// A short text message authored by a user
///
/// Posts are immutable once created; there is no edit or delete operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: i64,
}

impl Post {
    /// Validate a candidate post body
    pub fn validate_body(body: &str) -> Result<(), &'static str> {
        if body.trim().is_empty() {
            return Err("post body cannot be empty");
        }
        if body.chars().count() > BODY_MAX_LEN {
            return Err("post body is too long");
        }
        Ok(())
    }
}
