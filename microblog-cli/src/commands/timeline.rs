//! Timeline command - show the followed-posts feed

use std::collections::HashMap;

use anyhow::Result;
use colored::Colorize;

use super::{get_context, require_login};
use crate::output;
use microblog_core::MicroblogContext;

pub fn run(page: usize, per_page: Option<usize>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = require_login(&ctx)?;

    let per_page = per_page.unwrap_or(ctx.config.posts_per_page);
    let feed = ctx.timeline_service.followed_posts(user.id, page, per_page)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&feed)?);
        return Ok(());
    }

    if feed.items.is_empty() {
        println!("Nothing here yet. Follow someone or write a post.");
        return Ok(());
    }

    let mut authors: HashMap<i64, String> = HashMap::new();
    let mut table = output::create_table();
    table.set_header(vec!["When", "Author", "Post"]);

    for post in &feed.items {
        let author = author_name(&ctx, &mut authors, post.user_id)?;
        table.add_row(vec![
            post.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            author,
            post.body.clone(),
        ]);
    }

    println!("{}", table);
    println!(
        "Page {} of {} ({} posts)",
        feed.page.to_string().bold(),
        feed.total_pages.max(1),
        feed.total_items
    );
    if feed.has_next() {
        println!("Next: 'mb timeline --page {}'", feed.page + 1);
    }

    Ok(())
}

fn author_name(
    ctx: &MicroblogContext,
    cache: &mut HashMap<i64, String>,
    user_id: i64,
) -> Result<String> {
    if let Some(name) = cache.get(&user_id) {
        return Ok(name.clone());
    }
    let name = ctx
        .account_service
        .get_by_id(user_id)?
        .map(|u| u.username)
        .unwrap_or_else(|| format!("user {}", user_id));
    cache.insert(user_id, name.clone());
    Ok(name)
}
