//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` / `open_analytics` - Shared utilities to open the store
//! - `load_config` - Analytics configuration lookup
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use curhat_core::config::default_config_path;
use curhat_core::{Analytics, AnalyticsConfig, Database};

/// Local wall-clock time used for every command
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Open (and migrate) the database
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Explicit file if given, else the user override, else built-in defaults
pub fn load_config(config_path: Option<&Path>) -> Result<AnalyticsConfig> {
    match config_path {
        Some(path) => AnalyticsConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => AnalyticsConfig::load().context("Failed to load analytics config"),
    }
}

pub fn open_analytics(db_path: &Path, config_path: Option<&Path>) -> Result<Analytics<Database>> {
    let db = open_db(db_path)?;
    let config = load_config(config_path)?;
    Ok(Analytics::new(db, config))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let count = db.count_expenses()?;
    println!("   Expenses on record: {}", count);

    match default_config_path() {
        Some(path) if path.exists() => println!("   ⚙️  Config: {}", path.display()),
        Some(path) => println!("   ⚙️  Config: built-in defaults (override at {})", path.display()),
        None => println!("   ⚙️  Config: built-in defaults"),
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Log an expense: curhat add \"Boba\" 25000 --emotion Stress");
    println!("  2. Start web UI: curhat serve");

    Ok(())
}
