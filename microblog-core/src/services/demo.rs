//! Demo service - manage demo mode
//!
//! Demo mode provides a separate database populated with sample users,
//! posts, and follow edges for trying the application out without
//! registering anything real.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::adapters::demo::{demo_follows, demo_posts, demo_users, DEMO_PASSWORD};
use crate::adapters::duckdb::DuckDbRepository;
use crate::config::Config;
use crate::domain::result::Result;
use crate::services::{AccountService, FollowService};

/// Demo service for managing demo mode
pub struct DemoService {
    data_dir: PathBuf,
}

impl DemoService {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// Check if demo mode is currently enabled
    pub fn is_enabled(&self) -> Result<bool> {
        let config = Config::load(&self.data_dir)?;
        Ok(config.demo_mode)
    }

    /// Enable demo mode
    ///
    /// Deletes any existing demo database for a fresh start, flips the
    /// config flag, and seeds demo.duckdb with sample data.
    pub fn enable(&self) -> Result<()> {
        let demo_db = self.data_dir.join("demo.duckdb");
        let demo_wal = self.data_dir.join("demo.duckdb.wal");
        if demo_db.exists() {
            std::fs::remove_file(&demo_db)?;
        }
        if demo_wal.exists() {
            std::fs::remove_file(&demo_wal)?;
        }

        let mut config = Config::load(&self.data_dir).unwrap_or_default();
        config.enable_demo_mode();
        config.save(&self.data_dir)?;

        let repository = Arc::new(DuckDbRepository::new(&demo_db)?);
        repository.ensure_schema()?;
        self.seed(&repository)?;

        Ok(())
    }

    /// Disable demo mode
    ///
    /// The demo database is kept on disk unless `delete_data` is set.
    pub fn disable(&self, delete_data: bool) -> Result<()> {
        let mut config = Config::load(&self.data_dir).unwrap_or_default();
        config.disable_demo_mode();
        config.save(&self.data_dir)?;

        if delete_data {
            let demo_db = self.data_dir.join("demo.duckdb");
            if demo_db.exists() {
                std::fs::remove_file(&demo_db)?;
            }
        }

        Ok(())
    }

    /// Populate the demo database with sample users, posts, and follows
    ///
    /// Posts get staggered timestamps one minute apart so the demo
    /// timeline has a stable, readable order.
    fn seed(&self, repository: &Arc<DuckDbRepository>) -> Result<()> {
        let accounts = AccountService::new(Arc::clone(repository));
        let follows = FollowService::new(Arc::clone(repository));

        let mut ids: HashMap<&'static str, i64> = HashMap::new();
        for demo_user in demo_users() {
            let user = accounts.register(demo_user.username, demo_user.email, DEMO_PASSWORD)?;
            accounts.update_about_me(user.id, Some(demo_user.about_me))?;
            ids.insert(demo_user.username, user.id);
        }

        let base = Utc::now() - Duration::minutes(demo_posts().len() as i64);
        for (i, (author, body)) in demo_posts().iter().enumerate() {
            repository.insert_post(ids[author], body, base + Duration::minutes(i as i64))?;
        }

        for (follower, followed) in demo_follows() {
            follows.follow(ids[follower], ids[followed])?;
        }

        Ok(())
    }
}
