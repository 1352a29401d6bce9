//! Curhat Core Library
//!
//! Analytics for an emotion-tagged expense tracker:
//! - Period resolution for monthly history and savings goal windows
//! - Spending statistics, emotion summaries and templated insights
//! - Emotion-to-spending correlation
//! - Regret audit with a pluggable candidate policy
//! - Savings goal progress and dashboard widgets
//! - SQLite storage with connection pooling

pub mod audit;
pub mod budget;
pub mod config;
pub mod correlation;
pub mod dashboard;
pub mod db;
pub mod emotions;
pub mod engine;
pub mod error;
pub mod models;
pub mod narrator;
pub mod period;
pub mod report;
pub mod stats;
pub mod store;

pub use audit::{AuditPayload, BatchOutcome, CandidatePolicy, NegativeMoodPolicy, RegretAudit};
pub use budget::{BudgetProgress, GoalUpdate, GoalWithProgress};
pub use config::{AnalyticsConfig, AuditConfig, CorrelationConfig, DashboardConfig};
pub use correlation::CorrelationFinding;
pub use dashboard::{DashboardStats, Forecast};
pub use db::Database;
pub use emotions::{EmotionSummary, MoodPoint};
pub use engine::Analytics;
pub use error::{Error, Result};
pub use period::{DateRange, PeriodFilter};
pub use report::{EmotionalReport, MonthlyReport};
pub use stats::{RecordWarning, StatsSnapshot};
pub use store::ExpenseStore;
