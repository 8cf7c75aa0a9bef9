//! Post command - publish a new post

use std::io::{self, Read};

use anyhow::Result;

use super::{get_context, get_logger, log_event, require_login};
use crate::output;
use microblog_core::LogEvent;

pub fn run(body: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = require_login(&ctx)?;

    // Get the body from the argument or stdin
    let body = match body {
        Some(b) => b,
        None if atty::isnt(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer.trim().to_string()
        }
        None => anyhow::bail!("No post body provided. Pass it as an argument or pipe it on stdin."),
    };

    let post = ctx.post_service.create(user.id, &body)?;

    let logger = get_logger();
    log_event(
        &logger,
        LogEvent::new("post_created")
            .with_user(user.id)
            .with_command("post"),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&post)?);
        return Ok(());
    }

    output::success(&format!("Posted (id {})", post.id));
    Ok(())
}
