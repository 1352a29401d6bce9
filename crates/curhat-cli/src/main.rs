//! Curhat CLI - Emotion-tagged expense tracker
//!
//! Usage:
//!   curhat init                              Initialize database
//!   curhat add Boba 50000 -e Stress          Log an expense
//!   curhat stats --period 2025-06            Monthly statistics
//!   curhat audit                             Review bad-mood purchases
//!   curhat serve --port 8000                 Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let now = commands::now();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Add {
            item,
            amount,
            category,
            emotion,
            date,
            note,
        } => {
            let db = commands::open_db(&cli.db)?;
            let expense = commands::build_expense(
                &item,
                amount,
                category.as_deref(),
                emotion.as_deref(),
                date.as_deref(),
                note,
            )?;
            commands::cmd_add(&db, &expense, now)
        }
        Commands::List { month, limit } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_list(&db, month.as_deref(), limit)
        }
        Commands::Delete { ids } => {
            let analytics = commands::open_analytics(&cli.db, cli.config.as_deref())?;
            commands::cmd_delete(&analytics, &ids, now)
        }
        Commands::Stats { period, json } => {
            let analytics = commands::open_analytics(&cli.db, cli.config.as_deref())?;
            let filter = commands::parse_period(period.as_deref(), now)?;
            commands::cmd_stats(&analytics, filter, json)
        }
        Commands::Emotions { json } => {
            let analytics = commands::open_analytics(&cli.db, cli.config.as_deref())?;
            commands::cmd_emotions(&analytics, json)
        }
        Commands::Correlation => {
            let analytics = commands::open_analytics(&cli.db, cli.config.as_deref())?;
            commands::cmd_correlation(&analytics)
        }
        Commands::Report { month } => {
            let analytics = commands::open_analytics(&cli.db, cli.config.as_deref())?;
            let filter = commands::parse_period(month.as_deref(), now)?;
            commands::cmd_report(&analytics, filter)
        }
        Commands::Dashboard { json } => {
            let analytics = commands::open_analytics(&cli.db, cli.config.as_deref())?;
            commands::cmd_dashboard(&analytics, now, json)
        }
        Commands::Audit { action } => {
            let analytics = commands::open_analytics(&cli.db, cli.config.as_deref())?;
            match action {
                None | Some(AuditAction::List) => commands::cmd_audit_list(&analytics, now),
                Some(AuditAction::Regret { ids }) => {
                    commands::cmd_audit_mark(&analytics, &ids, true, now)
                }
                Some(AuditAction::WorthIt { ids }) => {
                    commands::cmd_audit_mark(&analytics, &ids, false, now)
                }
            }
        }
        Commands::Goals { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(GoalsAction::List) => commands::cmd_goals_list(&db, now),
                Some(GoalsAction::Add { name, target }) => {
                    commands::cmd_goals_add(&db, &name, target, now)
                }
                Some(GoalsAction::Update {
                    id,
                    name,
                    target,
                    period,
                    start,
                    end,
                }) => {
                    let update = commands::build_goal_update(
                        name,
                        target,
                        period.as_deref(),
                        start.as_deref(),
                        end.as_deref(),
                    )?;
                    commands::cmd_goals_update(&db, id, &update, now)
                }
                Some(GoalsAction::Delete { id }) => commands::cmd_goals_delete(&db, id),
            }
        }
        Commands::Serve { port, host } => {
            let config = commands::load_config(cli.config.as_deref())?;
            commands::cmd_serve(&cli.db, &host, port, config).await
        }
    }
}
