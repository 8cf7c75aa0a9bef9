//! Timeline service - composes the followed-posts feed
//!
//! The timeline is the set union of posts authored by users the viewer
//! follows and the viewer's own posts, ordered by timestamp descending.
//! Equal timestamps are broken by post id descending, so pagination is
//! stable even when many posts land in the same instant.

use std::sync::Arc;

use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::Result;
use crate::domain::Post;
use crate::services::follow::page_bounds;

/// Timeline service
pub struct TimelineService {
    repository: Arc<DuckDbRepository>,
}

impl TimelineService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// One page of the viewer's timeline
    ///
    /// Pages are 1-indexed. A viewer who follows no one and has authored
    /// nothing gets an empty page, not an error. Page 0 or a zero
    /// per_page is a validation error.
    pub fn followed_posts(
        &self,
        user_id: i64,
        page: usize,
        per_page: usize,
    ) -> Result<TimelinePage> {
        let (limit, offset) = page_bounds(page, per_page)?;

        let total_items = self.repository.count_followed_posts(user_id)?;
        let items = self.repository.followed_posts(user_id, limit, offset)?;
        let total_pages = (total_items as usize).div_ceil(per_page);

        Ok(TimelinePage {
            items,
            page,
            per_page,
            total_items,
            total_pages,
        })
    }
}

/// One page of a timeline, with the totals a pager needs
#[derive(Debug, Serialize)]
pub struct TimelinePage {
    pub items: Vec<Post>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: i64,
    pub total_pages: usize,
}

impl TimelinePage {
    /// Whether a later page exists
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists
    pub fn has_prev(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }
}
