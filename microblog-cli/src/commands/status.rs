//! Status command - database summary

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;

    let users = ctx.repository.count_users()?;
    let posts = ctx.repository.count_posts()?;
    let follows = ctx.repository.count_follow_edges()?;

    if json {
        let summary = serde_json::json!({
            "users": users,
            "posts": posts,
            "followEdges": follows,
            "demoMode": ctx.config.demo_mode,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Microblog Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Users", &users.to_string()]);
    table.add_row(vec!["Posts", &posts.to_string()]);
    table.add_row(vec!["Follow edges", &follows.to_string()]);
    println!("{}", table);

    if ctx.config.demo_mode {
        println!();
        output::warning("Demo mode is ON - you are looking at the demo database");
    }

    Ok(())
}
