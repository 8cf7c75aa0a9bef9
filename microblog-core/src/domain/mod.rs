//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod post;
mod user;
pub mod result;

pub use post::{Post, BODY_MAX_LEN};
pub use user::{avatar_url_for_email, User, ABOUT_ME_MAX_LEN, EMAIL_MAX_LEN, USERNAME_MAX_LEN};
