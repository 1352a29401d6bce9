//! Regret audit handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use curhat_core::models::RegretVerdict;
use curhat_core::AuditPayload;

/// GET /api/report/audit - Purchases awaiting a regret verdict, plus totals
pub async fn get_audit(State(state): State<Arc<AppState>>) -> Result<Json<AuditPayload>, AppError> {
    let payload = state.analytics.audit().payload(state.now())?;
    Ok(Json(payload))
}

#[derive(Debug, Deserialize)]
pub struct MarkQuery {
    pub is_regret: bool,
}

/// POST /api/report/audit/:id?is_regret=bool - Record a verdict
///
/// Returns the refreshed payload. A failed write answers 502 and can be
/// retried as is.
pub async fn mark_audit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<MarkQuery>,
) -> Result<Json<AuditPayload>, AppError> {
    let verdict = RegretVerdict::from(params.is_regret);
    let payload = state.analytics.audit().mark(id, verdict, state.now())?;
    Ok(Json(payload))
}
