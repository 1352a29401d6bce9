//! Savings goal progress
//!
//! A goal is a spending budget: `current_amount` is what was spent on
//! matching categories in the goal's period, compared against the target.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::emotions::percent_of;
use crate::error::{Error, Result};
use crate::models::{PeriodType, SavingsGoal};
use crate::stats::CategoryTotals;

/// Progress of one goal against its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetProgress {
    /// 0-100, capped
    pub percent: u32,
    pub is_over_budget: bool,
}

/// A goal together with its computed progress
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalWithProgress {
    #[serde(flatten)]
    pub goal: SavingsGoal,
    pub progress: BudgetProgress,
}

impl From<SavingsGoal> for GoalWithProgress {
    fn from(goal: SavingsGoal) -> Self {
        let progress = progress(&goal);
        Self { goal, progress }
    }
}

/// Compute progress for a goal
///
/// A zero target is only "over budget" once something has been spent.
pub fn progress(goal: &SavingsGoal) -> BudgetProgress {
    let current = goal.current_amount.max(0);
    let target = goal.target_amount;

    if target <= 0 {
        let over = current > 0;
        return BudgetProgress {
            percent: if over { 100 } else { 0 },
            is_over_budget: over,
        };
    }

    BudgetProgress {
        percent: percent_of(current, target).min(100),
        is_over_budget: current > target,
    }
}

/// Spending attributed to a goal by name
///
/// A category matches when either lower-cased name contains the other,
/// so a goal named "Makanan" tracks "Makanan & Minuman".
pub fn matched_spending(goal_name: &str, totals: &CategoryTotals) -> i64 {
    let needle = goal_name.trim().to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    totals
        .iter()
        .filter(|(category, _)| {
            let name = category.as_str().to_lowercase();
            name.contains(&needle) || needle.contains(&name)
        })
        .fold(0, |acc, (_, total)| acc.saturating_add(*total))
}

/// Partial update of a savings goal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub target_amount: Option<i64>,
    pub period_type: Option<PeriodType>,
    #[serde(default, deserialize_with = "crate::models::lenient_timestamp")]
    pub period_start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "crate::models::lenient_timestamp")]
    pub period_end: Option<NaiveDateTime>,
}

impl GoalUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.target_amount.is_none()
            && self.period_type.is_none()
            && self.period_start.is_none()
            && self.period_end.is_none()
    }

    /// Apply onto `goal`, leaving it untouched on error
    ///
    /// Custom periods need both bounds with start before end; switching to a
    /// rolling period clears any stored bounds.
    pub fn apply(&self, goal: &mut SavingsGoal) -> Result<()> {
        let mut next = goal.clone();

        if let Some(name) = &self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::InvalidData("Goal name cannot be empty".to_string()));
            }
            next.name = name.to_string();
        }
        if let Some(target) = self.target_amount {
            if target < 0 {
                return Err(Error::InvalidData(format!(
                    "Target amount cannot be negative: {}",
                    target
                )));
            }
            next.target_amount = target;
        }
        if let Some(period_type) = self.period_type {
            next.period_type = period_type;
        }
        if self.period_start.is_some() {
            next.period_start = self.period_start;
        }
        if self.period_end.is_some() {
            next.period_end = self.period_end;
        }

        match next.period_type {
            PeriodType::Custom => match (next.period_start, next.period_end) {
                (Some(start), Some(end)) if start < end => {}
                (Some(start), Some(end)) => {
                    return Err(Error::InvalidRange(format!(
                        "custom period start {} is not before end {}",
                        start, end
                    )))
                }
                _ => {
                    return Err(Error::InvalidRange(
                        "custom period requires both start and end".to_string(),
                    ))
                }
            },
            PeriodType::ThisMonth | PeriodType::ThisWeek => {
                next.period_start = None;
                next.period_end = None;
            }
        }

        *goal = next;
        Ok(())
    }
}
