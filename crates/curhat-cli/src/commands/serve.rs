//! Server command implementation

use std::path::Path;

use anyhow::Result;
use curhat_core::AnalyticsConfig;
use curhat_server::{ServerConfig, ALLOWED_ORIGINS_ENV};

use super::open_db;

pub async fn cmd_serve(db_path: &Path, host: &str, port: u16, analytics: AnalyticsConfig) -> Result<()> {
    println!("🚀 Starting Curhat web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    let config = ServerConfig::from_env();
    if config.allowed_origins.is_empty() {
        println!("   CORS: same-origin only (set {} to allow others)", ALLOWED_ORIGINS_ENV);
    } else {
        println!("   CORS: {}", config.allowed_origins.join(", "));
    }

    let db = open_db(db_path)?;
    curhat_server::serve_with_config(db, host, port, analytics, config).await
}
