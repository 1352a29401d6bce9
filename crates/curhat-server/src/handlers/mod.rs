//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod audit;
pub mod dashboard;
pub mod expenses;
pub mod health;
pub mod reports;

// Re-export all handlers for use in router
pub use audit::*;
pub use dashboard::*;
pub use expenses::*;
pub use health::*;
pub use reports::*;
