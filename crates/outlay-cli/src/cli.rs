//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Outlay - Track expenses from the terminal or a web client
#[derive(Parser)]
#[command(name = "outlay")]
#[command(about = "Self-hosted expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "outlay.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin (repeatable, e.g. the web client's dev server)
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,

        /// Directory containing static files to serve (e.g., a built web client)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// List recent expenses
    List {
        /// Maximum number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Add an expense
    Add {
        /// What the money was spent on
        #[arg(short, long)]
        description: String,

        /// Amount spent
        #[arg(short, long)]
        amount: f64,

        /// Category: Food, Travel, Utilities, Entertainment, Other
        #[arg(short, long, default_value = "Other")]
        category: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense by id
    Delete {
        /// Expense id
        id: i64,
    },

    /// Show database status and spending totals
    Status,
}
