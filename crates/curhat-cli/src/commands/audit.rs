//! Regret audit commands

use anyhow::Result;
use chrono::NaiveDateTime;
use curhat_core::dashboard::format_rupiah;
use curhat_core::models::RegretVerdict;
use curhat_core::{Analytics, AuditPayload, Database};

use super::expenses::print_expense_row;

fn print_payload(payload: &AuditPayload) {
    if payload.candidates.is_empty() {
        println!("✅ Nothing to review. No unreviewed bad-mood purchases older than the cooldown.");
    } else {
        println!();
        println!("🤔 Worth it? {} purchase(s) to review:", payload.candidates.len());
        println!();
        for record in &payload.candidates {
            print_expense_row(record);
        }
    }
    println!();
    println!(
        "   💸 Regretted so far: Rp {} across {} purchase(s)",
        format_rupiah(payload.stats.total_wasted),
        payload.stats.count
    );
}

pub fn cmd_audit_list(analytics: &Analytics<Database>, now: NaiveDateTime) -> Result<()> {
    let audit = analytics.audit();
    tracing::debug!(policy = audit.policy_name(), "Selecting audit candidates");
    let payload = audit.payload(now)?;
    print_payload(&payload);
    Ok(())
}

pub fn cmd_audit_mark(
    analytics: &Analytics<Database>,
    ids: &[i64],
    regret: bool,
    now: NaiveDateTime,
) -> Result<()> {
    let verdict = RegretVerdict::from(regret);
    let verdicts: Vec<(i64, RegretVerdict)> = ids.iter().map(|&id| (id, verdict)).collect();
    let outcome = analytics.audit().mark_batch(&verdicts, now);

    let label = if regret { "regretted" } else { "worth it" };
    for id in &outcome.succeeded {
        println!("✅ #{} marked {}", id, label);
    }
    for failure in &outcome.failed {
        println!("❌ #{}: {}", failure.id, failure.reason);
    }
    match (&outcome.payload, &outcome.refresh_error) {
        (Some(payload), _) => print_payload(payload),
        (None, Some(error)) => {
            println!("⚠️  Verdicts saved, but the audit list could not be refreshed: {}", error)
        }
        (None, None) => {}
    }

    if outcome.succeeded.is_empty() {
        anyhow::bail!("No verdicts were saved");
    }
    Ok(())
}
