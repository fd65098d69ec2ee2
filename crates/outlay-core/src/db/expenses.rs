//! Expense record operations

use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Category, CategorySummary, Expense, NewExpense};

/// Map a SELECTed expense row (id, description, amount, category, date, created_at)
fn map_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let category_str: String = row.get(3)?;
    let date_str: String = row.get(4)?;
    let created_at_str: String = row.get(5)?;

    Ok(Expense {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        category: category_str.parse().unwrap_or(Category::Other),
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| chrono::Utc::now().date_naive()),
        created_at: parse_datetime(&created_at_str),
    })
}

const EXPENSE_COLUMNS: &str = "id, description, amount, category, date, created_at";

impl Database {
    /// Insert a new expense, returning its assigned id
    pub fn create_expense(&self, new: &NewExpense) -> Result<i64> {
        new.validate()?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (description, amount, category, date) VALUES (?, ?, ?, ?)",
            params![
                new.description.trim(),
                new.amount,
                new.category.as_str(),
                new.date.format("%Y-%m-%d").to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List all expenses, newest first (date desc, then id desc)
    pub fn list_expenses(&self) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses ORDER BY date DESC, id DESC",
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map([], map_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// List the most recent expenses, bounded by `limit`
    pub fn list_recent_expenses(&self, limit: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses ORDER BY date DESC, id DESC LIMIT ?",
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map(params![limit], map_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Get an expense by id
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
                params![id],
                map_expense,
            )
            .ok();

        Ok(expense)
    }

    /// Replace an expense's full representation
    pub fn update_expense(&self, id: i64, new: &NewExpense) -> Result<()> {
        new.validate()?;

        let conn = self.conn()?;
        conn.execute(
            "UPDATE expenses SET description = ?, amount = ?, category = ?, date = ? WHERE id = ?",
            params![
                new.description.trim(),
                new.amount,
                new.category.as_str(),
                new.date.format("%Y-%m-%d").to_string(),
                id,
            ],
        )?;

        Ok(())
    }

    /// Delete an expense by id
    pub fn delete_expense(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM expenses WHERE id = ?", params![id])?;
        Ok(())
    }

    /// Total number of stored expenses
    pub fn count_expenses(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Sum of all expense amounts
    pub fn total_spent(&self) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM expenses",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Per-category totals and counts (admin dashboard)
    ///
    /// Categories with no expenses are included with zero totals so the
    /// dashboard shape is stable.
    pub fn category_summaries(&self) -> Result<Vec<CategorySummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT category, COALESCE(SUM(amount), 0.0), COUNT(*) FROM expenses GROUP BY category",
        )?;

        let mut by_category: Vec<CategorySummary> = Category::all()
            .iter()
            .map(|&category| CategorySummary {
                category,
                total: 0.0,
                count: 0,
            })
            .collect();

        let rows = stmt
            .query_map([], |row| {
                let category_str: String = row.get(0)?;
                let total: f64 = row.get(1)?;
                let count: i64 = row.get(2)?;
                Ok((category_str, total, count))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for (category_str, total, count) in rows {
            let category = category_str.parse().unwrap_or(Category::Other);
            if let Some(summary) = by_category.iter_mut().find(|s| s.category == category) {
                summary.total += total;
                summary.count += count;
            }
        }

        Ok(by_category)
    }
}
