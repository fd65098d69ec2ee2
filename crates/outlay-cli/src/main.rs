//! Outlay CLI - Self-hosted expense tracker
//!
//! Usage:
//!   outlay init                          Initialize database
//!   outlay add --description D --amount A    Record an expense
//!   outlay list                          Show recent expenses
//!   outlay serve --port 8000             Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            cors_origins,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, cors_origins, static_dir.as_deref()).await,
        Commands::List { limit } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_list(&db, limit)
        }
        Commands::Add {
            description,
            amount,
            category,
            date,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_add(&db, &description, amount, &category, date.as_deref())
        }
        Commands::Delete { id } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_delete(&db, id)
        }
        Commands::Status => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_status(&db)
        }
    }
}
