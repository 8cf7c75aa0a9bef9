//! Register command - create a new user account

use anyhow::Result;
use dialoguer::Password;

use super::{get_context, get_logger, log_event};
use crate::output;
use microblog_core::LogEvent;

pub fn run(username: &str, email: &str, password: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let user = ctx.account_service.register(username, email, &password)?;

    let logger = get_logger();
    log_event(
        &logger,
        LogEvent::new("user_registered")
            .with_user(user.id)
            .with_command("register"),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    output::success(&format!("Registered '{}' (id {})", user.username, user.id));
    println!("Log in with 'mb login {}'", user.username);
    Ok(())
}
