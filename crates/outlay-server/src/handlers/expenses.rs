//! Expense CRUD handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::{get_actor, parse_pk, AppError, AppState, SuccessResponse, MAX_BODY_SIZE};
use outlay_core::models::{Category, Expense, NewExpense};

/// Request body for creating or replacing an expense
#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    pub description: String,
    /// Accepts a JSON number or a numeric string; the original web client
    /// submits strings produced by `toFixed(2)`.
    #[serde(deserialize_with = "amount_from_number_or_string")]
    pub amount: f64,
    pub category: String,
    pub date: String,
}

fn amount_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom("invalid amount")),
    }
}

impl ExpenseRequest {
    fn into_new_expense(self) -> Result<NewExpense, AppError> {
        let category: Category = self
            .category
            .parse()
            .map_err(|_| AppError::bad_request(&format!("Unknown category: {}", self.category)))?;

        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|_| AppError::bad_request("Invalid date format (use YYYY-MM-DD)"))?;

        Ok(NewExpense {
            description: self.description,
            amount: self.amount,
            category,
            date,
        })
    }
}

/// Map a core error onto an HTTP status
///
/// Validation failures surface as 400; everything else is sanitized to 500.
fn map_core_error(err: outlay_core::Error) -> AppError {
    match err {
        outlay_core::Error::InvalidData(msg) => AppError::bad_request(&msg),
        outlay_core::Error::NotFound(msg) => AppError::not_found(&msg),
        err => AppError::from(err),
    }
}

/// Resolve the `:pk` path segment to an existing expense
///
/// A non-integer segment never matches the item route, so both that case and
/// a missing record produce a not-found outcome.
fn resolve_pk(state: &AppState, pk: &str) -> Result<Expense, AppError> {
    let id = parse_pk(pk).ok_or_else(|| AppError::not_found("Not found"))?;
    state
        .db
        .get_expense(id)
        .map_err(map_core_error)?
        .ok_or_else(|| AppError::not_found(&format!("Expense {} not found", id)))
}

async fn read_body(request: Request) -> Result<ExpenseRequest, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    serde_json::from_slice(&bytes).map_err(|_| AppError::bad_request("Invalid JSON"))
}

/// GET /api/expenses/ - List all expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Expense>>, AppError> {
    let actor = get_actor(request.headers());

    let expenses = state.db.list_expenses().map_err(map_core_error)?;

    // Audit log - read access
    state.db.log_audit(
        &actor,
        "list",
        Some("expense"),
        None,
        Some(&format!("count={}", expenses.len())),
    )?;

    Ok(Json(expenses))
}

/// POST /api/expenses/ - Create a new expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let actor = get_actor(request.headers());

    let new = read_body(request).await?.into_new_expense()?;
    let id = state.db.create_expense(&new).map_err(map_core_error)?;

    state.db.log_audit(
        &actor,
        "create",
        Some("expense"),
        Some(id),
        Some(&format!(
            "description={}, amount={:.2}, category={}",
            new.description, new.amount, new.category
        )),
    )?;

    let expense = state
        .db
        .get_expense(id)
        .map_err(map_core_error)?
        .ok_or_else(|| AppError::internal("Expense not found after creation"))?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET /api/expenses/:pk/ - Get a single expense
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<String>,
    request: Request,
) -> Result<Json<Expense>, AppError> {
    let actor = get_actor(request.headers());

    let expense = resolve_pk(&state, &pk)?;

    state
        .db
        .log_audit(&actor, "get", Some("expense"), Some(expense.id), None)?;

    Ok(Json(expense))
}

/// PUT /api/expenses/:pk/ - Replace an expense
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<String>,
    request: Request,
) -> Result<Json<Expense>, AppError> {
    let actor = get_actor(request.headers());

    // Verify the expense exists before touching the body
    let existing = resolve_pk(&state, &pk)?;

    let new = read_body(request).await?.into_new_expense()?;
    state
        .db
        .update_expense(existing.id, &new)
        .map_err(map_core_error)?;

    state.db.log_audit(
        &actor,
        "update",
        Some("expense"),
        Some(existing.id),
        Some(&format!(
            "description={}, amount={:.2}, category={}",
            new.description, new.amount, new.category
        )),
    )?;

    let expense = state
        .db
        .get_expense(existing.id)
        .map_err(map_core_error)?
        .ok_or_else(|| AppError::internal("Expense not found after update"))?;

    Ok(Json(expense))
}

/// DELETE /api/expenses/:pk/ - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<String>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let actor = get_actor(request.headers());

    let expense = resolve_pk(&state, &pk)?;

    state.db.delete_expense(expense.id).map_err(map_core_error)?;

    state.db.log_audit(
        &actor,
        "delete",
        Some("expense"),
        Some(expense.id),
        Some(&format!("description={}", expense.description)),
    )?;

    Ok(Json(SuccessResponse { success: true }))
}
