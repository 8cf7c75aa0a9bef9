//! Follow and unfollow commands

use anyhow::Result;

use super::{get_context, get_logger, log_event, require_login};
use crate::output;
use microblog_core::LogEvent;

pub fn run(username: &str) -> Result<()> {
    let ctx = get_context()?;
    let user = require_login(&ctx)?;

    let target = match ctx.account_service.get_by_username(username)? {
        Some(u) => u,
        None => anyhow::bail!("No such user: {}", username),
    };

    if target.id == user.id {
        output::warning("Your own posts are always in your timeline; self-follow is ignored.");
        return Ok(());
    }

    ctx.follow_service.follow(user.id, target.id)?;

    let logger = get_logger();
    log_event(
        &logger,
        LogEvent::new("user_followed")
            .with_user(user.id)
            .with_command("follow"),
    );

    output::success(&format!("Now following '{}'", target.username));
    Ok(())
}

pub fn run_unfollow(username: &str) -> Result<()> {
    let ctx = get_context()?;
    let user = require_login(&ctx)?;

    let target = match ctx.account_service.get_by_username(username)? {
        Some(u) => u,
        None => anyhow::bail!("No such user: {}", username),
    };

    ctx.follow_service.unfollow(user.id, target.id)?;

    let logger = get_logger();
    log_event(
        &logger,
        LogEvent::new("user_unfollowed")
            .with_user(user.id)
            .with_command("unfollow"),
    );

    output::success(&format!("Stopped following '{}'", target.username));
    Ok(())
}
