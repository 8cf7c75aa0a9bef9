//! Login command - session management
//!
//! The CLI plays the role a web tier's session middleware would: on login
//! it verifies the credential and persists the user's opaque identifier to
//! the session file; every later command resolves it back through the
//! core's UserLoader port.

use anyhow::Result;
use dialoguer::Password;

use super::{clear_session, current_user, get_context, get_logger, log_event, store_session};
use crate::output;
use microblog_core::LogEvent;

pub fn run(username: &str, password: Option<String>) -> Result<()> {
    let ctx = get_context()?;

    let password = match password {
        Some(p) => p,
        None => Password::new().with_prompt("Password").interact()?,
    };

    // One message for both failure modes; which one it was is nobody's
    // business but the account owner's.
    let user = match ctx.account_service.get_by_username(username)? {
        Some(u) => u,
        None => anyhow::bail!("Invalid username or password"),
    };
    if !ctx.credential_service.check_password(user.id, &password)? {
        anyhow::bail!("Invalid username or password");
    }

    store_session(user.id)?;
    ctx.account_service.touch_last_seen(user.id)?;

    let logger = get_logger();
    log_event(
        &logger,
        LogEvent::new("user_logged_in")
            .with_user(user.id)
            .with_command("login"),
    );

    output::success(&format!("Logged in as '{}'", user.username));
    Ok(())
}

pub fn run_logout() -> Result<()> {
    clear_session()?;
    println!("Logged out.");
    Ok(())
}

pub fn run_whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;

    match current_user(&ctx)? {
        Some(user) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!("{} (id {})", user.username, user.id);
            }
        }
        None => println!("Not logged in."),
    }

    Ok(())
}
