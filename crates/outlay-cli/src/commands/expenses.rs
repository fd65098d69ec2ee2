//! Expense command implementations

use anyhow::Result;
use chrono::NaiveDate;
use outlay_core::db::Database;
use outlay_core::models::{Category, NewExpense};

use super::truncate;

pub fn cmd_list(db: &Database, limit: i64) -> Result<()> {
    let expenses = db.list_recent_expenses(limit)?;

    if expenses.is_empty() {
        println!("No expenses found. Record one with:");
        println!("  outlay add --description \"Lunch\" --amount 12.50 --category Food");
        return Ok(());
    }

    println!();
    println!("📝 Recent Expenses");
    println!("   ─────────────────────────────────────────────────────────────");

    for expense in expenses {
        println!(
            "   [{}] {} │ {:>10} │ {:>13} │ {}",
            expense.id,
            expense.date,
            format!("${:.2}", expense.amount),
            expense.category.as_str(),
            truncate(&expense.description, 40)
        );
    }

    Ok(())
}

pub fn cmd_add(
    db: &Database,
    description: &str,
    amount: f64,
    category: &str,
    date: Option<&str>,
) -> Result<()> {
    let category: Category = category
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let date = match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!("Invalid --date format (use YYYY-MM-DD)"))?,
        None => chrono::Utc::now().date_naive(),
    };

    let new = NewExpense {
        description: description.to_string(),
        amount,
        category,
        date,
    };

    let id = db.create_expense(&new)?;
    db.log_audit(
        "cli",
        "create",
        Some("expense"),
        Some(id),
        Some(&format!("description={}, amount={:.2}", description, amount)),
    )?;

    println!(
        "✅ Recorded expense [{}]: {} ${:.2} ({})",
        id, description, amount, category
    );

    Ok(())
}

pub fn cmd_delete(db: &Database, id: i64) -> Result<()> {
    // Verify expense exists
    let expense = db
        .get_expense(id)?
        .ok_or_else(|| anyhow::anyhow!("Expense {} not found", id))?;

    db.delete_expense(id)?;
    db.log_audit(
        "cli",
        "delete",
        Some("expense"),
        Some(id),
        Some(&format!("description={}", expense.description)),
    )?;

    println!("🗑️  Deleted expense [{}]: {}", id, expense.description);

    Ok(())
}
