//! Profile command - show a user's profile

use anyhow::Result;

use super::{get_context, require_login};
use crate::output;

pub fn run(username: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let username = match username {
        Some(name) => name,
        None => require_login(&ctx)?.username,
    };

    let profile = match ctx.account_service.profile(&username)? {
        Some(p) => p,
        None => anyhow::bail!("No such user: {}", username),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.add_row(vec!["Username", &profile.username]);
    table.add_row(vec!["About", profile.about_me.as_deref().unwrap_or("-")]);
    table.add_row(vec!["Last seen", &profile.last_seen]);
    table.add_row(vec!["Posts", &profile.post_count.to_string()]);
    table.add_row(vec!["Followers", &profile.follower_count.to_string()]);
    table.add_row(vec!["Following", &profile.following_count.to_string()]);
    table.add_row(vec!["Avatar", &profile.avatar_url]);

    println!("{}", table);
    Ok(())
}
