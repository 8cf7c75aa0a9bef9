//! Post service - post creation and per-author listing

use std::sync::Arc;

use chrono::Utc;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::Post;
use crate::services::follow::page_bounds;

/// Post service
pub struct PostService {
    repository: Arc<DuckDbRepository>,
}

impl PostService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Persist a new post owned by `author_id`, stamped with current UTC time
    ///
    /// The body must be non-empty and at most 140 characters; the author
    /// must exist. Posts are immutable once stored.
    pub fn create(&self, author_id: i64, body: &str) -> Result<Post> {
        Post::validate_body(body).map_err(Error::validation)?;

        if self.repository.get_user_by_id(author_id)?.is_none() {
            return Err(Error::not_found(format!("user {}", author_id)));
        }

        self.repository.insert_post(author_id, body, Utc::now())
    }

    /// One page of a user's own posts, newest first (1-indexed pages)
    pub fn posts_by_user(&self, user_id: i64, page: usize, per_page: usize) -> Result<Vec<Post>> {
        let (limit, offset) = page_bounds(page, per_page)?;
        self.repository.get_posts_by_user(user_id, limit, offset)
    }

    pub fn count_by_user(&self, user_id: i64) -> Result<i64> {
        self.repository.count_posts_by_user(user_id)
    }
}
