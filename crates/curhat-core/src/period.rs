//! Period resolution
//!
//! Turns a history filter (one calendar month, or all time) and a savings
//! goal's period descriptor into concrete date windows. Every function takes
//! `now` explicitly so results are reproducible.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{PeriodType, SavingsGoal};

/// A concrete window of time
///
/// `start` is always inclusive. `end` is exclusive unless `end_inclusive` is
/// set (custom goal ranges, where the user picks the last day to count).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub end_inclusive: bool,
}

impl DateRange {
    /// Half-open window `[start, end)`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            end_inclusive: false,
        }
    }

    /// Closed window `[start, end]`
    pub fn inclusive(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            end_inclusive: true,
        }
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        if t < self.start {
            return false;
        }
        if self.end_inclusive {
            t <= self.end
        } else {
            t < self.end
        }
    }
}

/// History filter mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PeriodFilter {
    /// A single calendar month; `month` may be out of 1..=12 and is rolled over
    Bounded { year: i32, month: i32 },
    /// All time
    Unbounded,
}

impl PeriodFilter {
    pub fn month(year: i32, month: i32) -> Self {
        PeriodFilter::Bounded { year, month }
    }

    /// Like [`PeriodFilter::month`], but rejects months that roll over past
    /// the calendar's supported years
    pub fn checked_month(year: i32, month: i32) -> Result<Self> {
        let (rolled, _) = roll_month(i64::from(year), i64::from(month));
        let supported = i64::from(NaiveDate::MIN.year())..=i64::from(NaiveDate::MAX.year());
        if !supported.contains(&rolled) {
            return Err(Error::InvalidData(format!(
                "Month {} of year {} is out of range",
                month, year
            )));
        }
        Ok(PeriodFilter::Bounded { year, month })
    }

    /// The month containing `now`
    pub fn current_month(now: NaiveDateTime) -> Self {
        PeriodFilter::Bounded {
            year: now.year(),
            month: now.month() as i32,
        }
    }

    /// Resolve to a window, or `None` for "no bound"
    pub fn resolve(&self) -> Option<DateRange> {
        match *self {
            PeriodFilter::Bounded { year, month } => Some(month_range(year, month)),
            PeriodFilter::Unbounded => None,
        }
    }

    /// Label like "2025-03" for bounded filters, "all" otherwise
    pub fn label(&self) -> String {
        match *self {
            PeriodFilter::Bounded { year, month } => {
                let (y, m) = normalize_month(year, month);
                format!("{}-{:02}", y, m)
            }
            PeriodFilter::Unbounded => "all".to_string(),
        }
    }
}

/// Roll an arbitrary month number into `(year, 1..=12)`
///
/// Month 0 is December of the previous year, month 13 is January of the next.
/// The year saturates at the ends of `i32`.
pub fn normalize_month(year: i32, month: i32) -> (i32, u32) {
    let (year, month) = roll_month(i64::from(year), i64::from(month));
    let year = i32::try_from(year).unwrap_or(if year < 0 { i32::MIN } else { i32::MAX });
    (year, month)
}

fn roll_month(year: i64, month: i64) -> (i64, u32) {
    let zero_based = month - 1;
    (
        year + zero_based.div_euclid(12),
        (zero_based.rem_euclid(12) + 1) as u32,
    )
}

/// Midnight on the first of the month, pinned to the calendar's ends when
/// the year is out of range
fn first_of_month(year: i32, month: i64) -> NaiveDateTime {
    let (y, m) = roll_month(i64::from(year), month);
    i32::try_from(y)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, m, 1))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(if y < 0 { NaiveDateTime::MIN } else { NaiveDateTime::MAX })
}

/// `[first day of month, first day of next month)`
///
/// Months past the supported calendar resolve to an empty window at the
/// nearest end.
pub fn month_range(year: i32, month: i32) -> DateRange {
    let month = i64::from(month);
    DateRange::new(first_of_month(year, month), first_of_month(year, month + 1))
}

/// Parse "YYYY-MM" into a bounded filter
pub fn parse_month(s: &str) -> Result<PeriodFilter> {
    let (y, m) = s
        .trim()
        .split_once('-')
        .ok_or_else(|| Error::InvalidData(format!("Invalid month '{}' (use YYYY-MM)", s)))?;
    let year = y
        .parse::<i32>()
        .map_err(|_| Error::InvalidData(format!("Invalid year in '{}'", s)))?;
    let month = m
        .parse::<i32>()
        .map_err(|_| Error::InvalidData(format!("Invalid month in '{}'", s)))?;
    if !(1..=12).contains(&month) {
        return Err(Error::InvalidData(format!("Month out of range in '{}'", s)));
    }
    PeriodFilter::checked_month(year, month)
}

/// Resolve the tracking window for a goal period
pub fn resolve_goal_period(
    period_type: PeriodType,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Result<DateRange> {
    match period_type {
        PeriodType::ThisMonth => Ok(month_range(now.year(), now.month() as i32)),
        PeriodType::ThisWeek => Ok(DateRange::new(now - Duration::days(7), now)),
        PeriodType::Custom => match (start, end) {
            (Some(start), Some(end)) if start < end => Ok(DateRange::inclusive(start, end)),
            (Some(start), Some(end)) => Err(Error::InvalidRange(format!(
                "custom period start {} is not before end {}",
                start, end
            ))),
            _ => Err(Error::InvalidRange(
                "custom period requires both start and end".to_string(),
            )),
        },
    }
}

/// Resolve the tracking window of a stored goal
pub fn goal_range(goal: &SavingsGoal, now: NaiveDateTime) -> Result<DateRange> {
    resolve_goal_period(goal.period_type, goal.period_start, goal.period_end, now)
}

/// Keep records dated inside `range`; `None` keeps everything
///
/// In-memory mirror of the SQL date filter, for test stores. Undated records
/// only survive an unbounded filter.
#[cfg(test)]
pub(crate) fn filter_records(
    records: &[crate::models::ExpenseRecord],
    range: Option<&DateRange>,
) -> Vec<crate::models::ExpenseRecord> {
    match range {
        None => records.to_vec(),
        Some(range) => records
            .iter()
            .filter(|r| r.date.is_some_and(|d| range.contains(d)))
            .cloned()
            .collect(),
    }
}
