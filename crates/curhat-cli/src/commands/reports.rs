//! Report command implementations

use anyhow::Result;
use chrono::NaiveDateTime;
use curhat_core::dashboard::format_rupiah;
use curhat_core::period::parse_month;
use curhat_core::{Analytics, Database, EmotionSummary, PeriodFilter, RecordWarning};

/// Resolve a period argument: none means the current month, "all" means all time
pub fn parse_period(period: Option<&str>, now: NaiveDateTime) -> Result<PeriodFilter> {
    match period.map(str::trim) {
        None | Some("") => Ok(PeriodFilter::current_month(now)),
        Some(p) if p.eq_ignore_ascii_case("all") => Ok(PeriodFilter::Unbounded),
        Some(p) => Ok(parse_month(p)?),
    }
}

pub fn cmd_stats(analytics: &Analytics<Database>, filter: PeriodFilter, json: bool) -> Result<()> {
    let (stats, warnings) = analytics.stats_with_warnings(filter)?;

    if json {
        let value = serde_json::json!({
            "period": filter.label(),
            "stats": stats,
            "warnings": warnings,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!("📊 Spending Stats ({})", filter.label());
    println!("   ─────────────────────────────");
    println!("   Total:      Rp {}", format_rupiah(stats.total));
    println!("   Purchases:  {}", stats.count);
    println!("   Average:    Rp {}", format_rupiah(stats.average));
    if let Some(highest) = &stats.highest {
        println!(
            "   Highest:    {} - Rp {} ({})",
            highest.item,
            format_rupiah(highest.amount),
            highest.date.format("%Y-%m-%d")
        );
    }

    if !stats.categories.is_empty() {
        println!();
        println!("   By category:");
        for (category, total) in stats.categories.iter() {
            println!("     {:<20} Rp {:>12}", category.as_str(), format_rupiah(*total));
        }
    }

    print_warnings(&warnings);
    println!();
    Ok(())
}

fn print_warnings(warnings: &[RecordWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!();
    println!("   ⚠️  {} field issue(s), counted as zero:", warnings.len());
    for warning in warnings {
        match warning {
            RecordWarning::MissingAmount { id } => println!("     #{}: missing amount", id),
            RecordWarning::NegativeAmount { id, amount } => {
                println!("     #{}: negative amount {}", id, amount)
            }
            RecordWarning::MissingDate { id } => println!("     #{}: missing date", id),
        }
    }
}

fn print_emotion_table(summaries: &[EmotionSummary]) {
    for summary in summaries {
        let bar = "█".repeat((summary.percentage / 5) as usize);
        println!(
            "   {:<8} Rp {:>12}  {:>3}%  {}",
            summary.emotion.as_str(),
            format_rupiah(summary.total),
            summary.percentage,
            bar
        );
    }
}

pub fn cmd_emotions(analytics: &Analytics<Database>, json: bool) -> Result<()> {
    let report = analytics.emotional()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("💭 Emotional Spending (all time)");
    println!("   ─────────────────────────────");
    print_emotion_table(&report.emotional_spending);
    println!();
    println!("   Total tracked: Rp {}", format_rupiah(report.total_tracked));
    println!("   💬 {}", report.insight);
    println!();
    Ok(())
}

pub fn cmd_correlation(analytics: &Analytics<Database>) -> Result<()> {
    let config = &analytics.config().correlation;

    match analytics.correlation()? {
        Some(finding) => {
            println!(
                "📈 Purchases made while {} average Rp {}, {:.0}% above your overall average of Rp {} ({} purchases)",
                finding.emotion.as_str(),
                format_rupiah(finding.emotion_average.round() as i64),
                finding.deviation_percent,
                format_rupiah(finding.global_average.round() as i64),
                finding.count
            );
        }
        None => {
            println!(
                "✅ No emotion stands out (needs {}+ purchases and a gap above {}%)",
                config.min_records, config.materiality_threshold_pct
            );
        }
    }
    Ok(())
}

pub fn cmd_report(analytics: &Analytics<Database>, filter: PeriodFilter) -> Result<()> {
    let (year, month) = match filter {
        PeriodFilter::Bounded { year, month } => (year, month),
        PeriodFilter::Unbounded => anyhow::bail!("Monthly report needs a month (YYYY-MM)"),
    };
    let report = analytics.monthly(year, month)?;

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│        🗓️  Monthly Report {}         │", report.month);
    println!("╰─────────────────────────────────────────╯");
    println!();

    if let Some(message) = &report.message {
        println!("  {}", message);
        println!();
        return Ok(());
    }

    println!("  Total:      Rp {}", format_rupiah(report.stats.total));
    println!("  Purchases:  {}", report.stats.count);
    println!("  Average:    Rp {}", format_rupiah(report.stats.average));
    println!();
    print_emotion_table(&report.emotion_breakdown);
    if let Some(insight) = &report.insight {
        println!();
        println!("  💬 {}", insight);
    }
    println!();
    Ok(())
}

pub fn cmd_dashboard(analytics: &Analytics<Database>, now: NaiveDateTime, json: bool) -> Result<()> {
    let stats = analytics.dashboard(now)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           💰 Curhat Dashboard           │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    if stats.top_categories.is_empty() {
        println!("  No spending recorded yet.");
    } else {
        println!("  Top categories:");
        for (rank, category) in stats.top_categories.iter().enumerate() {
            println!(
                "    {}. {:<20} Rp {:>12}",
                rank + 1,
                category.name,
                format_rupiah(category.total)
            );
        }
    }
    println!();
    println!("  🔮 {}", stats.forecast.message);
    println!();
    Ok(())
}
