//! Savings goal operations
//!
//! `current_amount` is never stored. It is derived on read from the expenses
//! in the goal's resolved period whose category matches the goal name.

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};

use super::{format_timestamp, parse_stored_timestamp, Database};
use crate::budget::{matched_spending, GoalUpdate};
use crate::error::{Error, Result};
use crate::models::{NewSavingsGoal, PeriodType, SavingsGoal};
use crate::period::goal_range;
use crate::stats::CategoryTotals;
use crate::store::ExpenseStore;

const GOAL_COLUMNS: &str = "id, name, target_amount, period_type, period_start, period_end";

impl Database {
    fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<SavingsGoal> {
        let period_type: String = row.get(3)?;
        Ok(SavingsGoal {
            id: row.get(0)?,
            name: row.get(1)?,
            target_amount: row.get(2)?,
            current_amount: 0,
            period_type: period_type.parse().unwrap_or_default(),
            period_start: parse_stored_timestamp(row.get(4)?),
            period_end: parse_stored_timestamp(row.get(5)?),
        })
    }

    /// Fill in `current_amount` from matching spending in the goal's period
    fn with_current_amount(&self, mut goal: SavingsGoal, now: NaiveDateTime) -> Result<SavingsGoal> {
        let range = match goal_range(&goal, now) {
            Ok(range) => range,
            Err(e) => {
                tracing::warn!(goal_id = goal.id, error = %e, "Goal has an unusable period, tracking nothing");
                goal.current_amount = 0;
                return Ok(goal);
            }
        };
        let records = self.list_expenses(Some(&range))?;
        let totals = CategoryTotals::from_records(&records);
        goal.current_amount = matched_spending(&goal.name, &totals);
        Ok(goal)
    }

    /// List all goals with their current spending
    pub fn list_goals(&self, now: NaiveDateTime) -> Result<Vec<SavingsGoal>> {
        let goals = {
            let conn = self.conn()?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM savings_goals ORDER BY id",
                GOAL_COLUMNS
            ))?;
            let goals = stmt
                .query_map([], |row| Self::row_to_goal(row))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            goals
        };

        goals
            .into_iter()
            .map(|goal| self.with_current_amount(goal, now))
            .collect()
    }

    pub fn get_goal(&self, id: i64, now: NaiveDateTime) -> Result<Option<SavingsGoal>> {
        let goal = {
            let conn = self.conn()?;
            let goal = conn
                .query_row(
                    &format!("SELECT {} FROM savings_goals WHERE id = ?", GOAL_COLUMNS),
                    params![id],
                    |row| Self::row_to_goal(row),
                )
                .optional()?;
            goal
        };

        goal.map(|g| self.with_current_amount(g, now)).transpose()
    }

    /// Create a goal tracking the current month
    pub fn create_goal(&self, goal: &NewSavingsGoal) -> Result<i64> {
        let name = goal.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("Goal name cannot be empty".to_string()));
        }
        if goal.target_amount < 0 {
            return Err(Error::InvalidData(format!(
                "Target amount cannot be negative: {}",
                goal.target_amount
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO savings_goals (name, target_amount, period_type) VALUES (?, ?, ?)",
            params![name, goal.target_amount, PeriodType::ThisMonth.as_str()],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(goal_id = id, name = name, "Created savings goal");
        Ok(id)
    }

    /// Apply a partial update and return the refreshed goal
    pub fn update_goal(&self, id: i64, update: &GoalUpdate, now: NaiveDateTime) -> Result<SavingsGoal> {
        let mut goal = self
            .get_goal(id, now)?
            .ok_or_else(|| Error::NotFound(format!("Savings goal {} not found", id)))?;

        update.apply(&mut goal)?;

        {
            let conn = self.conn()?;
            conn.execute(
                r#"
                UPDATE savings_goals
                SET name = ?, target_amount = ?, period_type = ?, period_start = ?, period_end = ?
                WHERE id = ?
                "#,
                params![
                    goal.name,
                    goal.target_amount,
                    goal.period_type.as_str(),
                    goal.period_start.map(format_timestamp),
                    goal.period_end.map(format_timestamp),
                    id,
                ],
            )?;
        }

        self.with_current_amount(goal, now)
    }

    pub fn delete_goal(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM savings_goals WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Savings goal {} not found", id)));
        }
        Ok(())
    }
}
