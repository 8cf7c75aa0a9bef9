//! Logs command - view and manage activity logs

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::get_microblog_dir;
use crate::output;
use microblog_core::{EntryPoint, LoggingService};

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only errors
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear old log entries
    Clear {
        /// Delete logs older than N days
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Show log statistics and database path
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn get_logging_service() -> Result<LoggingService> {
    let data_dir = get_microblog_dir();
    std::fs::create_dir_all(&data_dir)?;
    let service = LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))?;
    Ok(service)
}

fn format_timestamp(timestamp_ms: i64) -> String {
    use chrono::{TimeZone, Utc};
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

pub fn run(command: LogsCommands) -> Result<()> {
    match command {
        LogsCommands::List { limit, errors, json } => {
            let service = get_logging_service()?;
            let entries = if errors {
                service.get_errors(limit)?
            } else {
                service.get_recent(limit)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            if entries.is_empty() {
                println!("No log entries found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Time", "Entry", "Event", "User", "Error"]);

            for entry in entries {
                table.add_row(vec![
                    format_timestamp(entry.timestamp),
                    entry.entry_point,
                    entry.event,
                    entry
                        .user_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    entry.error_message.unwrap_or_else(|| "-".to_string()),
                ]);
            }

            println!("{}", table);
            Ok(())
        }
        LogsCommands::Clear { older_than_days, force } => {
            let service = get_logging_service()?;

            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Delete log entries older than {} days?",
                        older_than_days
                    ))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }

            let cutoff_ms = chrono::Utc::now().timestamp_millis()
                - (older_than_days as i64) * 24 * 60 * 60 * 1000;
            let deleted = service.delete_before(cutoff_ms)?;
            output::success(&format!("Deleted {} log entries", deleted));
            Ok(())
        }
        LogsCommands::Stats { json } => {
            let service = get_logging_service()?;
            let count = service.count()?;

            if json {
                let stats = serde_json::json!({
                    "entries": count,
                    "dbPath": service.db_path().display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }

            println!("{}", "Activity Log".bold());
            println!("Entries: {}", count);
            println!("Database: {}", service.db_path().display());
            Ok(())
        }
    }
}
