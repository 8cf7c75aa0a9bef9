//! User loader port - the identity and session bridge
//!
//! The surrounding authentication layer persists an opaque user identifier
//! (session file, cookie) and hands it back here to be resolved into a
//! durable user record. This trait is the sole contract the core exposes
//! to that layer.

use crate::domain::result::Result;
use crate::domain::User;

/// Resolves a stored session identifier back to a user
pub trait UserLoader: Send + Sync {
    /// Look up the user behind an opaque stored identifier
    ///
    /// A malformed identifier is not an error; it resolves to `Ok(None)`
    /// exactly like an identifier for a user that no longer exists.
    fn load_user(&self, stored_id: &str) -> Result<Option<User>>;
}
