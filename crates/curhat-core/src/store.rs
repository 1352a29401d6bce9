//! The storage seam analytics read from and audit writes go through

use chrono::NaiveDateTime;

use crate::audit::CandidatePolicy;
use crate::error::Result;
use crate::models::{ExpenseRecord, RegretStats, RegretStatus};
use crate::period::DateRange;

/// Where expense records live
///
/// Listing returns newest first. Writes are single attempts; callers decide
/// whether to retry.
pub trait ExpenseStore {
    /// Records dated inside `range`, or every record when `None`
    fn list_expenses(&self, range: Option<&DateRange>) -> Result<Vec<ExpenseRecord>>;

    /// The `limit` most recent records
    fn recent_expenses(&self, limit: usize) -> Result<Vec<ExpenseRecord>> {
        let mut records = self.list_expenses(None)?;
        records.truncate(limit);
        Ok(records)
    }

    fn get_expense(&self, id: i64) -> Result<Option<ExpenseRecord>>;

    /// Persist a regret flag; fails with `NotFound` for unknown ids
    fn set_regret(&self, id: i64, status: RegretStatus) -> Result<()>;

    /// Delete a record; fails with `NotFound` for unknown ids
    fn delete_expense(&self, id: i64) -> Result<()>;

    /// Records awaiting a regret verdict, as chosen by `policy`
    fn audit_candidates(
        &self,
        policy: &dyn CandidatePolicy,
        now: NaiveDateTime,
    ) -> Result<Vec<ExpenseRecord>> {
        let records = self.list_expenses(None)?;
        Ok(policy.select(&records, now))
    }

    /// Total and count of records marked as regretted
    fn regret_stats(&self) -> Result<RegretStats> {
        let records = self.list_expenses(None)?;
        Ok(records
            .iter()
            .filter(|r| r.regret == RegretStatus::Regretted)
            .fold(RegretStats::default(), |acc, r| RegretStats {
                total_wasted: acc.total_wasted.saturating_add(r.amount_value()),
                count: acc.count + 1,
            }))
    }
}

impl<T: ExpenseStore + ?Sized> ExpenseStore for &T {
    fn list_expenses(&self, range: Option<&DateRange>) -> Result<Vec<ExpenseRecord>> {
        (**self).list_expenses(range)
    }

    fn recent_expenses(&self, limit: usize) -> Result<Vec<ExpenseRecord>> {
        (**self).recent_expenses(limit)
    }

    fn get_expense(&self, id: i64) -> Result<Option<ExpenseRecord>> {
        (**self).get_expense(id)
    }

    fn set_regret(&self, id: i64, status: RegretStatus) -> Result<()> {
        (**self).set_regret(id, status)
    }

    fn delete_expense(&self, id: i64) -> Result<()> {
        (**self).delete_expense(id)
    }

    fn audit_candidates(
        &self,
        policy: &dyn CandidatePolicy,
        now: NaiveDateTime,
    ) -> Result<Vec<ExpenseRecord>> {
        (**self).audit_candidates(policy, now)
    }

    fn regret_stats(&self) -> Result<RegretStats> {
        (**self).regret_stats()
    }
}
