//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - init and shared utilities (open_db, load_config, now)
//! - `expenses` - add, list, delete
//! - `reports` - stats, emotions, correlation, monthly report, dashboard
//! - `audit` - regret audit listing and verdicts
//! - `goals` - savings goal management
//! - `serve` - Web server command

pub mod audit;
pub mod core;
pub mod expenses;
pub mod goals;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use audit::*;
pub use core::*;
pub use expenses::*;
pub use goals::*;
pub use reports::*;
pub use serve::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
