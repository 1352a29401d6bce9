//! Regret audit
//!
//! Surfaces past purchases made in a bad mood so the user can say whether
//! they regret them, and keeps a running "dana terbuang" (wasted money) total.
//! Which records count as candidates is a pluggable [`CandidatePolicy`].

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::AuditConfig;
use crate::error::{Error, Result};
use crate::models::{Emotion, ExpenseRecord, RegretStats, RegretStatus, RegretVerdict};
use crate::store::ExpenseStore;

/// Chooses which records are offered for review
pub trait CandidatePolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Pick candidates from `records`, in the order they should be shown
    fn select(&self, records: &[ExpenseRecord], now: NaiveDateTime) -> Vec<ExpenseRecord>;
}

/// Unreviewed purchases made while sad, angry or stressed, old enough to
/// look back on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegativeMoodPolicy {
    pub emotions: Vec<Emotion>,
    pub min_age: Duration,
    pub limit: usize,
}

impl Default for NegativeMoodPolicy {
    fn default() -> Self {
        Self::from_config(&AuditConfig::default())
    }
}

impl NegativeMoodPolicy {
    pub fn from_config(config: &AuditConfig) -> Self {
        Self {
            emotions: config.emotions.clone(),
            min_age: Duration::hours(config.min_age_hours),
            limit: config.max_candidates,
        }
    }
}

impl CandidatePolicy for NegativeMoodPolicy {
    fn name(&self) -> &'static str {
        "negative_mood"
    }

    fn select(&self, records: &[ExpenseRecord], now: NaiveDateTime) -> Vec<ExpenseRecord> {
        let cutoff = now - self.min_age;
        let mut candidates: Vec<ExpenseRecord> = records
            .iter()
            .filter(|r| r.regret == RegretStatus::Unset)
            .filter(|r| self.emotions.contains(&r.emotion_label))
            .filter(|r| r.date.is_some_and(|d| d < cutoff))
            .cloned()
            .collect();

        candidates.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        candidates.truncate(self.limit);
        candidates
    }
}

/// What the audit screen shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditPayload {
    pub candidates: Vec<ExpenseRecord>,
    pub stats: RegretStats,
}

/// One write that failed inside a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub id: i64,
    pub reason: String,
}

/// Result of a batch of writes followed by one refresh
///
/// The per-id results stand even when the refresh fails; `payload` is then
/// `None` and `refresh_error` says why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub succeeded: Vec<i64>,
    pub failed: Vec<BatchFailure>,
    pub payload: Option<AuditPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_error: Option<String>,
}

/// Regret audit over an expense store
pub struct RegretAudit<S: ExpenseStore> {
    store: S,
    policy: Box<dyn CandidatePolicy>,
}

impl<S: ExpenseStore> RegretAudit<S> {
    /// Audit with the default negative-mood policy
    pub fn new(store: S) -> Self {
        Self::with_policy(store, Box::new(NegativeMoodPolicy::default()))
    }

    pub fn from_config(store: S, config: &AuditConfig) -> Self {
        Self::with_policy(store, Box::new(NegativeMoodPolicy::from_config(config)))
    }

    pub fn with_policy(store: S, policy: Box<dyn CandidatePolicy>) -> Self {
        Self { store, policy }
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Current candidates and regret totals, read fresh from the store
    pub fn payload(&self, now: NaiveDateTime) -> Result<AuditPayload> {
        let candidates = self.store.audit_candidates(self.policy.as_ref(), now)?;
        let stats = self.store.regret_stats()?;
        tracing::debug!(
            policy = self.policy.name(),
            candidates = candidates.len(),
            wasted = stats.total_wasted,
            "Built audit payload"
        );
        Ok(AuditPayload { candidates, stats })
    }

    /// Record a verdict and return the refreshed payload
    ///
    /// One write attempt. A failed write is reported as `ExternalWrite` and
    /// nothing is refreshed; the caller may try again.
    pub fn mark(&self, id: i64, verdict: RegretVerdict, now: NaiveDateTime) -> Result<AuditPayload> {
        self.write_verdict(id, verdict)?;
        self.payload(now)
    }

    /// Record several verdicts one after another, then refresh once
    pub fn mark_batch(
        &self,
        verdicts: &[(i64, RegretVerdict)],
        now: NaiveDateTime,
    ) -> BatchOutcome {
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for &(id, verdict) in verdicts {
            match self.write_verdict(id, verdict) {
                Ok(()) => succeeded.push(id),
                Err(e) => failed.push(BatchFailure {
                    id,
                    reason: e.to_string(),
                }),
            }
        }
        self.finish_batch(succeeded, failed, now)
    }

    /// Delete several records one after another, then refresh once
    pub fn delete_batch(&self, ids: &[i64], now: NaiveDateTime) -> BatchOutcome {
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for &id in ids {
            match self.store.delete_expense(id) {
                Ok(()) => succeeded.push(id),
                Err(e) => {
                    tracing::warn!(record_id = id, error = %e, "Failed to delete expense");
                    failed.push(BatchFailure {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        self.finish_batch(succeeded, failed, now)
    }

    fn finish_batch(
        &self,
        succeeded: Vec<i64>,
        failed: Vec<BatchFailure>,
        now: NaiveDateTime,
    ) -> BatchOutcome {
        let (payload, refresh_error) = match self.payload(now) {
            Ok(payload) => (Some(payload), None),
            Err(e) => {
                tracing::warn!(
                    succeeded = succeeded.len(),
                    failed = failed.len(),
                    error = %e,
                    "Audit refresh failed after batch"
                );
                (None, Some(e.to_string()))
            }
        };
        BatchOutcome {
            succeeded,
            failed,
            payload,
            refresh_error,
        }
    }

    fn write_verdict(&self, id: i64, verdict: RegretVerdict) -> Result<()> {
        let status = RegretStatus::from(verdict);
        match self.store.set_regret(id, status) {
            Ok(()) => {
                tracing::info!(record_id = id, verdict = status.as_str(), "Regret verdict saved");
                Ok(())
            }
            Err(Error::NotFound(msg)) => Err(Error::NotFound(msg)),
            Err(e) => {
                tracing::warn!(record_id = id, error = %e, "Regret verdict write failed");
                Err(Error::ExternalWrite {
                    id,
                    reason: e.to_string(),
                })
            }
        }
    }
}
