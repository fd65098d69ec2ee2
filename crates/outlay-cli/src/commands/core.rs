//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Show database status and spending totals

use std::path::Path;

use anyhow::{Context, Result};
use outlay_core::db::Database;

/// Open the database, creating it (and its schema) if missing
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record an expense: outlay add --description \"Lunch\" --amount 12.50 --category Food");
    println!("  2. Start web UI: outlay serve");

    Ok(())
}

pub fn cmd_status(db: &Database) -> Result<()> {
    let count = db.count_expenses()?;
    let total = db.total_spent()?;
    let summaries = db.category_summaries()?;

    println!();
    println!("📊 Outlay Status");
    println!("   ─────────────────────────────");
    println!("   Database: {}", db.path());
    println!("   Expenses: {}", count);
    println!("   Total spent: ${:.2}", total);

    if count > 0 {
        println!();
        println!("   By category:");
        for summary in summaries {
            if summary.count > 0 {
                println!(
                    "   {:>14} │ {:>10} │ {} records",
                    summary.category.as_str(),
                    format!("${:.2}", summary.total),
                    summary.count
                );
            }
        }
    }

    Ok(())
}
