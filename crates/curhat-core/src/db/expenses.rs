//! Expense operations

use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension};

use super::{format_timestamp, parse_stored_timestamp, Database};
use crate::error::{Error, Result};
use crate::models::{Category, Emotion, ExpenseRecord, NewExpense, RegretStats, RegretStatus};
use crate::period::DateRange;
use crate::store::ExpenseStore;

const EXPENSE_COLUMNS: &str =
    "id, item_name, amount, category, emotion_label, date, is_regret, description, sentiment_score";

/// Newest first; undated rows sink to the bottom
const NEWEST_FIRST: &str = "ORDER BY date IS NULL, date DESC, id DESC";

/// Stored amounts are usually integers but older rows may hold text or reals
fn amount_from_value(value: Value) -> Option<i64> {
    match value {
        Value::Integer(v) => Some(v),
        Value::Real(v) if v.is_finite() => Some(v.trunc() as i64),
        Value::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.trunc() as i64))
        }
        _ => None,
    }
}

impl Database {
    /// Log a new expense, dated `now` unless the input carries a date
    pub fn insert_expense(&self, expense: &NewExpense, now: NaiveDateTime) -> Result<i64> {
        let item_name = expense.item_name.trim();
        if item_name.is_empty() {
            return Err(Error::InvalidData("Item name cannot be empty".to_string()));
        }
        if expense.amount < 0 {
            return Err(Error::InvalidData(format!(
                "Amount cannot be negative: {}",
                expense.amount
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO expenses (item_name, amount, category, emotion_label, date, is_regret, description, sentiment_score)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                item_name,
                expense.amount,
                expense.category.as_str(),
                expense.emotion_label.as_str(),
                format_timestamp(expense.date.unwrap_or(now)),
                expense.regret.as_flag(),
                expense.description,
                expense.sentiment_score,
            ],
        )?;

        let id = conn.last_insert_rowid();
        tracing::debug!(expense_id = id, amount = expense.amount, "Inserted expense");
        Ok(id)
    }

    pub(crate) fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<ExpenseRecord> {
        let category: Option<String> = row.get(3)?;
        let emotion: Option<String> = row.get(4)?;
        let is_regret: Option<bool> = row.get(6)?;

        Ok(ExpenseRecord {
            id: row.get(0)?,
            item_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            amount: amount_from_value(row.get(2)?),
            category: Category::from_label(category.as_deref()),
            emotion_label: Emotion::from_label(emotion.as_deref()),
            date: parse_stored_timestamp(row.get(5)?),
            regret: RegretStatus::from(is_regret),
            description: row.get(7)?,
            sentiment_score: row.get(8)?,
        })
    }

    /// Count all stored expenses
    pub fn count_expenses(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl ExpenseStore for Database {
    fn list_expenses(&self, range: Option<&DateRange>) -> Result<Vec<ExpenseRecord>> {
        let conn = self.conn()?;

        let mut sql = format!("SELECT {} FROM expenses", EXPENSE_COLUMNS);
        let mut bounds: Vec<String> = Vec::new();
        if let Some(range) = range {
            let end_op = if range.end_inclusive { "<=" } else { "<" };
            sql.push_str(&format!(" WHERE date >= ? AND date {} ?", end_op));
            bounds.push(format_timestamp(range.start));
            bounds.push(format_timestamp(range.end));
        }
        sql.push(' ');
        sql.push_str(NEWEST_FIRST);

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(bounds.iter()), |row| Self::row_to_expense(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn recent_expenses(&self, limit: usize) -> Result<Vec<ExpenseRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses {} LIMIT ?",
            EXPENSE_COLUMNS, NEWEST_FIRST
        ))?;
        let records = stmt
            .query_map(params![limit as i64], |row| Self::row_to_expense(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn get_expense(&self, id: i64) -> Result<Option<ExpenseRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
                params![id],
                |row| Self::row_to_expense(row),
            )
            .optional()?;
        Ok(record)
    }

    fn set_regret(&self, id: i64, status: RegretStatus) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE expenses SET is_regret = ? WHERE id = ?",
            params![status.as_flag(), id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Expense {} not found", id)));
        }
        Ok(())
    }

    fn delete_expense(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM expenses WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Expense {} not found", id)));
        }
        tracing::debug!(expense_id = id, "Deleted expense");
        Ok(())
    }

    fn regret_stats(&self) -> Result<RegretStats> {
        let conn = self.conn()?;
        // Same coercion as ExpenseRecord::amount_value: null/garbage/negative count as 0.
        // Summed here so the total saturates instead of tripping SQLite's overflow error.
        let mut stmt = conn.prepare(
            r#"
            SELECT MAX(COALESCE(CAST(amount AS INTEGER), 0), 0)
            FROM expenses
            WHERE is_regret = 1
            "#,
        )?;
        let amounts = stmt.query_map([], |row| row.get::<_, i64>(0))?;

        let mut stats = RegretStats::default();
        for amount in amounts {
            stats.total_wasted = stats.total_wasted.saturating_add(amount?);
            stats.count += 1;
        }
        Ok(stats)
    }
}
