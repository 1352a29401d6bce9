//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use curhat_core::models::{ExpenseRecord, NewExpense};
use curhat_core::{BatchOutcome, ExpenseStore, PeriodFilter};

#[derive(Debug, Deserialize)]
pub struct ListExpensesQuery {
    pub year: Option<i32>,
    pub month: Option<i32>,
    /// Most recent N when no month is given
    pub limit: Option<usize>,
}

/// GET /api/expenses - Expenses for a month, or the most recent ones
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListExpensesQuery>,
) -> Result<Json<Vec<ExpenseRecord>>, AppError> {
    let records = match (params.year, params.month) {
        (Some(year), Some(month)) => {
            let range = PeriodFilter::checked_month(year, month)?.resolve();
            state.db.list_expenses(range.as_ref())?
        }
        (None, None) => match params.limit {
            Some(limit) => state.db.recent_expenses(limit.max(1))?,
            None => state.db.list_expenses(None)?,
        },
        _ => return Err(AppError::bad_request("Provide both year and month, or neither")),
    };

    Ok(Json(records))
}

/// POST /api/expenses - Log an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewExpense>,
) -> Result<(StatusCode, Json<ExpenseRecord>), AppError> {
    let id = state.db.insert_expense(&body, state.now())?;
    let record = state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::internal("Created expense could not be read back"))?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// DELETE /api/expenses/:id - Delete one expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.db.delete_expense(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct DeleteExpensesRequest {
    pub ids: Vec<i64>,
}

/// POST /api/expenses/delete - Delete several expenses
///
/// Deletes one by one and reports which failed, together with the refreshed
/// audit payload. A failed refresh leaves `payload` null and still returns 200,
/// since the deletes already happened.
pub async fn delete_expenses(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DeleteExpensesRequest>,
) -> Result<Json<BatchOutcome>, AppError> {
    if body.ids.is_empty() {
        return Err(AppError::bad_request("No expense ids given"));
    }
    let outcome = state.analytics.audit().delete_batch(&body.ids, state.now());
    Ok(Json(outcome))
}
