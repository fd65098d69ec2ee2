//! Admin surface handlers
//!
//! A JSON stand-in for the original framework-provided admin site: read-only
//! endpoints for operational inspection of records, totals, and the audit log.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::Serialize;

use crate::{get_actor, AppError, AppState};
use outlay_core::models::{AuditEntry, CategorySummary, Expense};

/// Maximum rows returned by the admin listings
const ADMIN_LIST_LIMIT: i64 = 200;

/// Admin index payload
#[derive(Serialize)]
pub struct AdminIndex {
    pub name: &'static str,
    pub sections: Vec<AdminSection>,
}

#[derive(Serialize)]
pub struct AdminSection {
    pub name: &'static str,
    pub path: &'static str,
}

/// Dashboard payload: record counts and spending totals
#[derive(Serialize)]
pub struct AdminDashboard {
    pub expense_count: i64,
    pub total_spent: f64,
    pub by_category: Vec<CategorySummary>,
}

/// Status payload: database and build information
#[derive(Serialize)]
pub struct AdminStatus {
    pub version: &'static str,
    pub db_path: String,
    pub expense_count: i64,
}

/// GET /admin/ - Admin index
pub async fn admin_index() -> Json<AdminIndex> {
    Json(AdminIndex {
        name: "Outlay administration",
        sections: vec![
            AdminSection {
                name: "dashboard",
                path: "/admin/dashboard",
            },
            AdminSection {
                name: "expenses",
                path: "/admin/expenses",
            },
            AdminSection {
                name: "audit",
                path: "/admin/audit",
            },
            AdminSection {
                name: "status",
                path: "/admin/status",
            },
        ],
    })
}

/// GET /admin/dashboard - Counts and per-category totals
pub async fn admin_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdminDashboard>, AppError> {
    let expense_count = state.db.count_expenses()?;
    let total_spent = state.db.total_spent()?;
    let by_category = state.db.category_summaries()?;

    Ok(Json(AdminDashboard {
        expense_count,
        total_spent,
        by_category,
    }))
}

/// GET /admin/expenses - Raw record listing, newest first
pub async fn admin_expenses(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Expense>>, AppError> {
    let actor = get_actor(request.headers());

    let expenses = state.db.list_recent_expenses(ADMIN_LIST_LIMIT)?;

    state.db.log_audit(
        &actor,
        "admin_list",
        Some("expense"),
        None,
        Some(&format!("count={}", expenses.len())),
    )?;

    Ok(Json(expenses))
}

/// GET /admin/audit - Recent audit log entries
pub async fn admin_audit(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    let entries = state.db.list_audit_log(ADMIN_LIST_LIMIT)?;
    Ok(Json(entries))
}

/// GET /admin/status - Database path and build version
pub async fn admin_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdminStatus>, AppError> {
    let expense_count = state.db.count_expenses()?;

    Ok(Json(AdminStatus {
        version: env!("CARGO_PKG_VERSION"),
        db_path: state.db.path().to_string(),
        expense_count,
    }))
}
