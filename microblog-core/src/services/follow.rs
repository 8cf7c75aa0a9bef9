//! Follow service - the directed social graph
//!
//! Maintains the asymmetric follow relationship between users. All
//! mutations are idempotent: racing writers for the same edge are benign
//! because the edge table's composite primary key is the final backstop.

use std::sync::Arc;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::User;

/// Follow service for the social graph
pub struct FollowService {
    repository: Arc<DuckDbRepository>,
}

impl FollowService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Create a follow edge from `follower_id` to `target_id`
    ///
    /// Idempotent: an existing edge is left as-is. Self-follow is not
    /// permitted and is silently ignored; the timeline already includes
    /// the user's own posts. Either user missing is a NotFound error.
    pub fn follow(&self, follower_id: i64, target_id: i64) -> Result<()> {
        if follower_id == target_id {
            return Ok(());
        }

        self.ensure_user_exists(follower_id)?;
        self.ensure_user_exists(target_id)?;

        self.repository.insert_follow_edge(follower_id, target_id)
    }

    /// Remove the follow edge if present; a no-op when absent
    pub fn unfollow(&self, follower_id: i64, target_id: i64) -> Result<()> {
        self.repository.delete_follow_edge(follower_id, target_id)
    }

    /// True iff `follower_id` currently follows `target_id`
    pub fn is_following(&self, follower_id: i64, target_id: i64) -> Result<bool> {
        self.repository.is_following(follower_id, target_id)
    }

    /// One page of the users that `user_id` follows, ordered by username
    ///
    /// Pages are 1-indexed, matching the timeline.
    pub fn following(&self, user_id: i64, page: usize, per_page: usize) -> Result<Vec<User>> {
        let (limit, offset) = page_bounds(page, per_page)?;
        self.repository.get_following(user_id, limit, offset)
    }

    /// One page of the users that follow `user_id` (reverse lookup)
    pub fn followers(&self, user_id: i64, page: usize, per_page: usize) -> Result<Vec<User>> {
        let (limit, offset) = page_bounds(page, per_page)?;
        self.repository.get_followers(user_id, limit, offset)
    }

    pub fn following_count(&self, user_id: i64) -> Result<i64> {
        self.repository.count_following(user_id)
    }

    pub fn followers_count(&self, user_id: i64) -> Result<i64> {
        self.repository.count_followers(user_id)
    }

    fn ensure_user_exists(&self, user_id: i64) -> Result<()> {
        if self.repository.get_user_by_id(user_id)?.is_none() {
            return Err(Error::not_found(format!("user {}", user_id)));
        }
        Ok(())
    }
}

/// Translate a 1-indexed page into LIMIT/OFFSET bounds
pub(crate) fn page_bounds(page: usize, per_page: usize) -> Result<(i64, i64)> {
    if page == 0 {
        return Err(Error::validation("page numbers are 1-indexed"));
    }
    if per_page == 0 {
        return Err(Error::validation("per_page must be positive"));
    }
    Ok((per_page as i64, ((page - 1) * per_page) as i64))
}
