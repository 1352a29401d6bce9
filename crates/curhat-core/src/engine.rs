//! Analytics facade
//!
//! Binds an [`ExpenseStore`] to an [`AnalyticsConfig`] and exposes every
//! report as one call. The store is only read here; writes go through
//! [`RegretAudit`] or the store itself.

use chrono::NaiveDateTime;

use crate::audit::RegretAudit;
use crate::budget::{self, GoalWithProgress};
use crate::config::AnalyticsConfig;
use crate::correlation::{self, CorrelationFinding};
use crate::dashboard::{self, DashboardStats};
use crate::emotions::{self, MoodPoint};
use crate::error::Result;
use crate::models::{ExpenseRecord, SavingsGoal};
use crate::period::PeriodFilter;
use crate::report::{self, EmotionalReport, MonthlyReport};
use crate::stats::{self, RecordWarning, StatsSnapshot};
use crate::store::ExpenseStore;

pub struct Analytics<S: ExpenseStore> {
    store: S,
    config: AnalyticsConfig,
}

impl<S: ExpenseStore> Analytics<S> {
    pub fn new(store: S, config: AnalyticsConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn records(&self, filter: PeriodFilter) -> Result<Vec<ExpenseRecord>> {
        let range = filter.resolve();
        let records = self.store.list_expenses(range.as_ref())?;
        tracing::debug!(period = %filter.label(), records = records.len(), "Loaded records");
        Ok(records)
    }

    /// Statistics snapshot for a month or all time
    pub fn stats(&self, filter: PeriodFilter) -> Result<StatsSnapshot> {
        Ok(stats::aggregate(&self.records(filter)?))
    }

    /// Statistics snapshot plus malformed-field warnings, both from one read
    pub fn stats_with_warnings(
        &self,
        filter: PeriodFilter,
    ) -> Result<(StatsSnapshot, Vec<RecordWarning>)> {
        let records = self.records(filter)?;
        Ok((stats::aggregate(&records), stats::inspect(&records)))
    }

    /// Emotion breakdown and insight over all time
    pub fn emotional(&self) -> Result<EmotionalReport> {
        Ok(report::emotional_report(&self.records(PeriodFilter::Unbounded)?))
    }

    /// Most over-spending emotion over all time, if any
    pub fn correlation(&self) -> Result<Option<CorrelationFinding>> {
        let records = self.records(PeriodFilter::Unbounded)?;
        let finding = correlation::detect(&records, &self.config.correlation);
        if let Some(f) = &finding {
            tracing::info!(
                emotion = %f.emotion,
                deviation = f.deviation_percent,
                "Emotion correlates with higher spending"
            );
        }
        Ok(finding)
    }

    /// Mood/value points for the most recent `limit` records
    pub fn scatter(&self, limit: usize) -> Result<Vec<MoodPoint>> {
        Ok(emotions::mood_points(&self.store.recent_expenses(limit)?))
    }

    pub fn monthly(&self, year: i32, month: i32) -> Result<MonthlyReport> {
        let records = self.records(PeriodFilter::checked_month(year, month)?)?;
        Ok(report::monthly_report(year, month, &records))
    }

    pub fn dashboard(&self, now: NaiveDateTime) -> Result<DashboardStats> {
        let records = self.store.recent_expenses(self.config.dashboard.recent_window)?;
        Ok(dashboard::dashboard(&records, now, &self.config.dashboard))
    }

    /// Regret audit over this store using the configured candidate policy
    pub fn audit(&self) -> RegretAudit<&S> {
        RegretAudit::from_config(&self.store, &self.config.audit)
    }
}

/// Attach progress to goals
pub fn with_progress(goals: Vec<SavingsGoal>) -> Vec<GoalWithProgress> {
    goals.into_iter().map(GoalWithProgress::from).collect()
}

/// Progress summary line for logs and CLI output
pub fn describe_goal(goal: &SavingsGoal) -> String {
    let p = budget::progress(goal);
    format!(
        "{}: {} / {} ({}%){}",
        goal.name,
        dashboard::format_rupiah(goal.current_amount),
        dashboard::format_rupiah(goal.target_amount),
        p.percent,
        if p.is_over_budget { " over budget" } else { "" }
    )
}
