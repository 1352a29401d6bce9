//! Savings goal commands

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use curhat_core::engine::describe_goal;
use curhat_core::models::{parse_timestamp, NewSavingsGoal, PeriodType};
use curhat_core::{budget, Database, GoalUpdate};

fn parse_bound(raw: Option<&str>, flag: &str) -> Result<Option<NaiveDateTime>> {
    raw.map(|s| {
        parse_timestamp(s).with_context(|| format!("Invalid --{} '{}' (use YYYY-MM-DD)", flag, s))
    })
    .transpose()
}

/// Build a goal update from command-line flags
pub fn build_goal_update(
    name: Option<String>,
    target: Option<i64>,
    period: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<GoalUpdate> {
    let period_type = period
        .map(|p| p.parse::<PeriodType>().map_err(|e| anyhow::anyhow!(e)))
        .transpose()?;

    Ok(GoalUpdate {
        name,
        target_amount: target,
        period_type,
        period_start: parse_bound(start, "start")?,
        period_end: parse_bound(end, "end")?,
    })
}

pub fn cmd_goals_list(db: &Database, now: NaiveDateTime) -> Result<()> {
    let goals = db.list_goals(now)?;

    if goals.is_empty() {
        println!("No savings goals yet. Add one with: curhat goals add Makanan 1500000");
        return Ok(());
    }

    println!();
    println!("🎯 Savings Goals");
    println!("   ─────────────────────────────");
    for goal in &goals {
        let icon = if budget::progress(goal).is_over_budget {
            "🔴"
        } else {
            "🟢"
        };
        println!(
            "   {} #{:<3} {}  [{}]",
            icon,
            goal.id,
            describe_goal(goal),
            goal.period_type
        );
    }
    println!();
    Ok(())
}

pub fn cmd_goals_add(db: &Database, name: &str, target: i64, now: NaiveDateTime) -> Result<()> {
    let id = db.create_goal(&NewSavingsGoal {
        name: name.to_string(),
        target_amount: target,
    })?;
    let goal = db
        .get_goal(id, now)?
        .context("Created goal could not be read back")?;
    println!("✅ Created goal #{}: {}", id, describe_goal(&goal));
    Ok(())
}

pub fn cmd_goals_update(db: &Database, id: i64, update: &GoalUpdate, now: NaiveDateTime) -> Result<()> {
    if update.is_empty() {
        anyhow::bail!("Nothing to update. Pass --name, --target, --period, --start or --end");
    }
    let goal = db.update_goal(id, update, now)?;
    println!("✅ Updated goal #{}: {}", id, describe_goal(&goal));
    Ok(())
}

pub fn cmd_goals_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_goal(id)?;
    println!("🗑️  Deleted goal #{}", id);
    Ok(())
}
