//! Expense command implementations (add, list, delete)

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use curhat_core::dashboard::format_rupiah;
use curhat_core::models::{parse_timestamp, Category, Emotion, ExpenseRecord, NewExpense, RegretStatus};
use curhat_core::period::parse_month;
use curhat_core::{Analytics, Database, ExpenseStore};

use super::truncate;

/// Build an expense from command-line values
pub fn build_expense(
    item: &str,
    amount: i64,
    category: Option<&str>,
    emotion: Option<&str>,
    date: Option<&str>,
    note: Option<String>,
) -> Result<NewExpense> {
    let date = match date {
        Some(raw) => Some(
            parse_timestamp(raw)
                .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", raw))?,
        ),
        None => None,
    };

    Ok(NewExpense {
        item_name: item.to_string(),
        amount,
        category: Category::from_label(category),
        emotion_label: Emotion::from_label(emotion),
        date,
        regret: RegretStatus::Unset,
        description: note,
        sentiment_score: None,
    })
}

pub fn cmd_add(db: &Database, expense: &NewExpense, now: NaiveDateTime) -> Result<()> {
    let id = db
        .insert_expense(expense, now)
        .context("Failed to save expense")?;

    println!(
        "✅ Logged #{}: {} - Rp {} ({}, {})",
        id,
        expense.item_name.trim(),
        format_rupiah(expense.amount),
        expense.category.as_str(),
        expense.emotion_label.as_str()
    );
    Ok(())
}

pub fn cmd_list(db: &Database, month: Option<&str>, limit: usize) -> Result<()> {
    let records = match month {
        Some(raw) => {
            let filter = parse_month(raw)?;
            db.list_expenses(filter.resolve().as_ref())?
        }
        None => db.recent_expenses(limit.max(1))?,
    };

    if records.is_empty() {
        println!("No expenses found.");
        return Ok(());
    }

    println!();
    println!(
        "{:>5}  {:<16}  {:<24}  {:>12}  {:<18}  {:<8}  {}",
        "ID", "Date", "Item", "Amount", "Category", "Emotion", "Regret"
    );
    println!("{}", "─".repeat(100));
    for record in &records {
        print_expense_row(record);
    }
    println!();
    println!("{} expense(s)", records.len());

    Ok(())
}

pub(crate) fn print_expense_row(record: &ExpenseRecord) {
    let date = record
        .date
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let amount = match record.amount {
        Some(a) => format_rupiah(a),
        None => "?".to_string(),
    };
    let regret = match record.regret {
        RegretStatus::Unset => "",
        RegretStatus::Regretted => "😣",
        RegretStatus::WorthIt => "👍",
    };
    println!(
        "{:>5}  {:<16}  {:<24}  {:>12}  {:<18}  {:<8}  {}",
        record.id,
        date,
        truncate(&record.item_name, 24),
        amount,
        truncate(record.category.as_str(), 18),
        truncate(record.emotion_label.as_str(), 8),
        regret
    );
}

pub fn cmd_delete(analytics: &Analytics<Database>, ids: &[i64], now: NaiveDateTime) -> Result<()> {
    let outcome = analytics.audit().delete_batch(ids, now);

    for id in &outcome.succeeded {
        println!("🗑️  Deleted expense #{}", id);
    }
    for failure in &outcome.failed {
        println!("❌ Could not delete #{}: {}", failure.id, failure.reason);
    }

    if !outcome.failed.is_empty() && outcome.succeeded.is_empty() {
        anyhow::bail!("No expenses were deleted");
    }
    Ok(())
}
