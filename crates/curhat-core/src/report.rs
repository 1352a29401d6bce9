//! Report payloads built from the analytics pieces

use serde::Serialize;

use crate::emotions::{self, EmotionSummary};
use crate::models::ExpenseRecord;
use crate::narrator::{self, EMPTY_MONTH_MESSAGE};
use crate::period::PeriodFilter;
use crate::stats::{self, StatsSnapshot};

/// Emotion breakdown with its narrated insight
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionalReport {
    pub emotional_spending: Vec<EmotionSummary>,
    pub total_tracked: i64,
    pub insight: String,
}

pub fn emotional_report(records: &[ExpenseRecord]) -> EmotionalReport {
    let summaries = emotions::summarize(records);
    EmotionalReport {
        total_tracked: summaries.iter().fold(0, |acc, s| acc.saturating_add(s.total)),
        insight: narrator::narrate(&summaries),
        emotional_spending: summaries,
    }
}

/// One calendar month at a glance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    /// "YYYY-MM"
    pub month: String,
    pub stats: StatsSnapshot,
    pub emotion_breakdown: Vec<EmotionSummary>,
    /// Narrated insight; absent for an empty month
    pub insight: Option<String>,
    /// Set instead of an insight when the month has no transactions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Build the report for `year`/`month` from records already inside that month
pub fn monthly_report(year: i32, month: i32, records: &[ExpenseRecord]) -> MonthlyReport {
    let label = PeriodFilter::month(year, month).label();

    if records.is_empty() {
        return MonthlyReport {
            month: label,
            stats: StatsSnapshot::default(),
            emotion_breakdown: Vec::new(),
            insight: None,
            message: Some(EMPTY_MONTH_MESSAGE.to_string()),
        };
    }

    let breakdown = emotions::summarize(records);
    MonthlyReport {
        month: label,
        stats: stats::aggregate(records),
        insight: Some(narrator::narrate(&breakdown)),
        emotion_breakdown: breakdown,
        message: None,
    }
}
