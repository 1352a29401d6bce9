//! Dashboard and savings goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{AppError, AppState};
use curhat_core::engine::with_progress;
use curhat_core::models::NewSavingsGoal;
use curhat_core::{DashboardStats, GoalUpdate, GoalWithProgress};

/// GET /api/dashboard/stats - Top categories and today's forecast
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(state.analytics.dashboard(state.now())?))
}

/// GET /api/dashboard/savings - All goals with progress
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GoalWithProgress>>, AppError> {
    let goals = state.db.list_goals(state.now())?;
    Ok(Json(with_progress(goals)))
}

/// POST /api/dashboard/savings - Create a goal for the current month
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewSavingsGoal>,
) -> Result<(StatusCode, Json<GoalWithProgress>), AppError> {
    let now = state.now();
    let id = state.db.create_goal(&body)?;
    let goal = state
        .db
        .get_goal(id, now)?
        .ok_or_else(|| AppError::internal("Created goal could not be read back"))?;

    Ok((StatusCode::CREATED, Json(GoalWithProgress::from(goal))))
}

/// PUT /api/dashboard/savings/:id - Partially update a goal
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<GoalUpdate>,
) -> Result<Json<GoalWithProgress>, AppError> {
    if body.is_empty() {
        return Err(AppError::bad_request("No fields to update"));
    }
    let goal = state.db.update_goal(id, &body, state.now())?;
    Ok(Json(GoalWithProgress::from(goal)))
}

/// DELETE /api/dashboard/savings/:id - Delete a goal
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.db.delete_goal(id)?;
    Ok(StatusCode::NO_CONTENT)
}
