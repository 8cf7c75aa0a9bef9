//! Microblog CLI - a small social feed in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{demo, follow, login, logs, post, profile, register, status, timeline};

/// Microblog - post, follow, and read your timeline
#[derive(Parser)]
#[command(name = "mb", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user account
    Register {
        /// Username (unique, no whitespace)
        username: String,
        /// Email address (unique)
        email: String,
        /// Password (prompted interactively if omitted)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in and persist the session
    Login {
        /// Username to log in as
        username: String,
        /// Password (prompted interactively if omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Log out of the current session
    Logout,

    /// Show the currently logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Publish a new post (argument or stdin)
    Post {
        /// Post body, at most 140 characters
        body: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Follow another user
    Follow {
        /// Username to follow
        username: String,
    },

    /// Stop following a user
    Unfollow {
        /// Username to unfollow
        username: String,
    },

    /// Show your timeline (posts from followed users plus your own)
    Timeline {
        /// Page to show (1-indexed)
        #[arg(long, default_value = "1")]
        page: usize,
        /// Posts per page (defaults to the configured page size)
        #[arg(long)]
        per_page: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a user's profile (yours if no username given)
    Profile {
        /// Username to show
        username: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show overall database status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View and manage activity logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register { username, email, password, json } => {
            register::run(&username, &email, password, json)
        }
        Commands::Login { username, password } => login::run(&username, password),
        Commands::Logout => login::run_logout(),
        Commands::Whoami { json } => login::run_whoami(json),
        Commands::Post { body, json } => post::run(body, json),
        Commands::Follow { username } => follow::run(&username),
        Commands::Unfollow { username } => follow::run_unfollow(&username),
        Commands::Timeline { page, per_page, json } => timeline::run(page, per_page, json),
        Commands::Profile { username, json } => profile::run(username, json),
        Commands::Status { json } => status::run(json),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
