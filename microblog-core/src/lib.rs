//! Microblog Core - social graph and timeline composition
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (User, Post)
//! - **ports**: Trait seams for the surrounding layers (UserLoader)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, demo data)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::duckdb::DuckDbRepository;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{Post, User};
pub use ports::UserLoader;
pub use services::{EntryPoint, LogEvent, LoggingService, TimelinePage, UserProfile};

/// Main context for microblog operations
///
/// This is the primary entry point for all business logic. It holds the
/// database connection, configuration, and all services. Nothing here is
/// global state: the surrounding layer constructs a context from a data
/// directory and passes it around explicitly.
pub struct MicroblogContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub account_service: AccountService,
    pub credential_service: CredentialService,
    pub follow_service: FollowService,
    pub post_service: PostService,
    pub timeline_service: TimelineService,
    pub session_service: SessionService,
}

impl MicroblogContext {
    /// Create a new microblog context
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;

        // Determine which database file to use
        let db_filename = if config.demo_mode {
            "demo.duckdb"
        } else {
            "microblog.duckdb"
        };

        let db_path = data_dir.join(db_filename);
        let repository = Arc::new(DuckDbRepository::new(&db_path)?);

        // Initialize schema
        repository.ensure_schema()?;

        // Create services
        let account_service = AccountService::new(Arc::clone(&repository));
        let credential_service = CredentialService::new(Arc::clone(&repository));
        let follow_service = FollowService::new(Arc::clone(&repository));
        let post_service = PostService::new(Arc::clone(&repository));
        let timeline_service = TimelineService::new(Arc::clone(&repository));
        let session_service = SessionService::new(Arc::clone(&repository));

        Ok(Self {
            config,
            repository,
            account_service,
            credential_service,
            follow_service,
            post_service,
            timeline_service,
            session_service,
        })
    }
}
