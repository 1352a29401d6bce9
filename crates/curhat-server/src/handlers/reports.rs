//! Report handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, MAX_SCATTER_LIMIT};
use curhat_core::period::parse_month;
use curhat_core::{
    CorrelationFinding, EmotionalReport, MonthlyReport, MoodPoint, PeriodFilter, RecordWarning,
    StatsSnapshot,
};

/// Query parameters selecting a history window
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// "all" for all time, or "YYYY-MM"
    pub period: Option<String>,
    pub year: Option<i32>,
    /// May be out of 1..=12; rolls over into neighbouring years
    pub month: Option<i32>,
}

impl PeriodQuery {
    /// Resolve to a filter, defaulting to the current month
    fn filter(&self, state: &AppState) -> Result<PeriodFilter, AppError> {
        match self.period.as_deref().map(str::trim) {
            Some("all") => return Ok(PeriodFilter::Unbounded),
            Some(p) if !p.is_empty() && p != "month" => {
                return parse_month(p).map_err(|_| {
                    AppError::bad_request("Invalid period (use 'all' or YYYY-MM)")
                });
            }
            _ => {}
        }

        let now = state.now();
        Ok(PeriodFilter::checked_month(
            self.year.unwrap_or(now.year()),
            self.month.unwrap_or(now.month() as i32),
        )?)
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub period: String,
    #[serde(flatten)]
    pub stats: StatsSnapshot,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RecordWarning>,
}

/// GET /api/report/stats - Spending statistics for a month or all time
pub async fn report_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let filter = params.filter(&state)?;

    let (stats, warnings) = state.analytics.stats_with_warnings(filter)?;

    Ok(Json(StatsResponse {
        period: filter.label(),
        stats,
        warnings,
    }))
}

/// GET /api/report/emotional - Spending per emotion with an insight line
pub async fn report_emotional(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EmotionalReport>, AppError> {
    Ok(Json(state.analytics.emotional()?))
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<i32>,
}

/// GET /api/report/monthly - Monthly summary, breakdown and insight
pub async fn report_monthly(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthQuery>,
) -> Result<Json<MonthlyReport>, AppError> {
    let now = state.now();
    let year = params.year.unwrap_or(now.year());
    let month = params.month.unwrap_or(now.month() as i32);

    Ok(Json(state.analytics.monthly(year, month)?))
}

/// GET /api/report/correlation - Emotion tied to above-average spending, or null
pub async fn report_correlation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Option<CorrelationFinding>>, AppError> {
    Ok(Json(state.analytics.correlation()?))
}

#[derive(Debug, Deserialize)]
pub struct ScatterQuery {
    #[serde(default = "default_scatter_limit")]
    pub limit: usize,
}

fn default_scatter_limit() -> usize {
    100
}

/// GET /api/report/scatter - Mood vs amount points for recent expenses
pub async fn report_scatter(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScatterQuery>,
) -> Result<Json<Vec<MoodPoint>>, AppError> {
    let limit = params.limit.clamp(1, MAX_SCATTER_LIMIT);
    Ok(Json(state.analytics.scatter(limit)?))
}
