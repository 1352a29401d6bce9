//! CLI argument definitions using clap
//!
//! The command implementations live in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Curhat - Spending journal that listens to your mood
#[derive(Parser)]
#[command(name = "curhat")]
#[command(about = "Emotion-tagged expense tracker and spending analytics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "curhat.db", global = true)]
    pub db: PathBuf,

    /// Analytics config file (defaults to the user config, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Log an expense
    Add {
        /// What was bought
        item: String,

        /// Amount in rupiah
        amount: i64,

        /// Category (e.g. "Makanan & Minuman", "Transport")
        #[arg(short, long)]
        category: Option<String>,

        /// Emotion at the time (Senang, Sedih, Marah, Stress, Lapar, Netral)
        #[arg(short, long)]
        emotion: Option<String>,

        /// When it happened (YYYY-MM-DD or ISO timestamp, default now)
        #[arg(long)]
        date: Option<String>,

        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },

    /// List expenses
    List {
        /// Month to list (YYYY-MM); most recent expenses otherwise
        #[arg(short, long)]
        month: Option<String>,

        /// Maximum number of expenses when no month is given
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Delete expenses by id
    Delete {
        /// Expense IDs
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Spending statistics for a month or all time
    Stats {
        /// "all" or YYYY-MM (default: current month)
        #[arg(short, long)]
        period: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Spending per emotion, all time
    Emotions {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Emotion whose purchases run noticeably above average
    Correlation,

    /// Monthly report with emotion breakdown and insight
    Report {
        /// Month (YYYY-MM, default: current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Top categories and today's spending forecast
    Dashboard {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Review purchases made in a bad mood
    Audit {
        #[command(subcommand)]
        action: Option<AuditAction>,
    },

    /// Manage savings goals
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[derive(Subcommand)]
pub enum AuditAction {
    /// List purchases awaiting a verdict (default)
    List,

    /// Mark purchases as regretted
    Regret {
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Mark purchases as worth it
    WorthIt {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List goals with progress (default)
    List,

    /// Create a goal for the current month
    Add {
        /// Goal name, matched against category names
        name: String,

        /// Spending target in rupiah
        target: i64,
    },

    /// Update a goal
    Update {
        /// Goal ID
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        target: Option<i64>,

        /// this_month, this_week or custom
        #[arg(long)]
        period: Option<String>,

        /// Custom period start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Custom period end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
    },

    /// Delete a goal
    Delete {
        /// Goal ID
        id: i64,
    },
}
