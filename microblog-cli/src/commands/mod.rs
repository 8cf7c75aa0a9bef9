//! CLI command implementations

pub mod demo;
pub mod follow;
pub mod login;
pub mod logs;
pub mod post;
pub mod profile;
pub mod register;
pub mod status;
pub mod timeline;

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use microblog_core::{EntryPoint, LogEvent, LoggingService, MicroblogContext, User, UserLoader};

/// Name of the session file inside the data directory
///
/// This file is the CLI's stand-in for a web session cookie: it holds the
/// opaque user identifier that the core's UserLoader resolves back to a
/// user record.
const SESSION_FILE: &str = "session.json";

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    user_id: String,
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_microblog_dir();
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the microblog directory from environment or default
pub fn get_microblog_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MICROBLOG_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".microblog")
    }
}

/// Get or create the microblog context
pub fn get_context() -> Result<MicroblogContext> {
    let data_dir = get_microblog_dir();

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create microblog directory: {:?}", data_dir))?;

    let ctx = MicroblogContext::new(&data_dir)?;
    Ok(ctx)
}

/// Persist the logged-in user's identifier
pub fn store_session(user_id: i64) -> Result<()> {
    let path = get_microblog_dir().join(SESSION_FILE);
    let session = SessionFile {
        user_id: user_id.to_string(),
    };
    std::fs::write(&path, serde_json::to_string_pretty(&session)?)?;
    Ok(())
}

/// Forget the stored session, if any
pub fn clear_session() -> Result<()> {
    let path = get_microblog_dir().join(SESSION_FILE);
    if path.exists() {
        std::fs::remove_file(&path)?;
    }
    Ok(())
}

/// Resolve the stored session to a user through the UserLoader port
///
/// A missing session file, a malformed identifier, or a user that no
/// longer exists all resolve to None.
pub fn current_user(ctx: &MicroblogContext) -> Result<Option<User>> {
    let path = get_microblog_dir().join(SESSION_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    let session: SessionFile = match serde_json::from_str(&content) {
        Ok(s) => s,
        Err(_) => return Ok(None),
    };

    let loader: &dyn UserLoader = &ctx.session_service;
    Ok(loader.load_user(&session.user_id)?)
}

/// The logged-in user, or a helpful error
pub fn require_login(ctx: &MicroblogContext) -> Result<User> {
    current_user(ctx)?.context("Not logged in. Run 'mb login <username>' first.")
}
