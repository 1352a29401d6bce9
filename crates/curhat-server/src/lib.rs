//! Curhat Web Server
//!
//! Axum-based JSON API over the Curhat analytics core: reports, the regret
//! audit, dashboard widgets, savings goals and a thin expense CRUD.
//!
//! - Restrictive CORS policy (origins from `CURHAT_ALLOWED_ORIGINS`)
//! - Request tracing
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::NaiveDateTime;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use curhat_core::{Analytics, AnalyticsConfig, Database};

mod handlers;

/// Maximum number of points a scatter request may ask for
pub const MAX_SCATTER_LIMIT: usize = 1000;

/// Environment variable listing allowed CORS origins, comma separated
pub const ALLOWED_ORIGINS_ENV: &str = "CURHAT_ALLOWED_ORIGINS";

/// Source of "now" for every time-dependent handler
pub type Clock = fn() -> NaiveDateTime;

/// Local wall-clock time
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read allowed origins from `CURHAT_ALLOWED_ORIGINS`
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self { allowed_origins }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub analytics: Analytics<Database>,
    pub config: ServerConfig,
    pub clock: Clock,
}

impl AppState {
    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }
}

/// Create the application router
pub fn create_router(db: Database, analytics: AnalyticsConfig, config: ServerConfig) -> Router {
    create_router_with_clock(db, analytics, config, local_now)
}

/// Create the application router with a fixed clock (for testing)
pub fn create_router_with_clock(
    db: Database,
    analytics: AnalyticsConfig,
    config: ServerConfig,
    clock: Clock,
) -> Router {
    let state = Arc::new(AppState {
        analytics: Analytics::new(db.clone(), analytics),
        db,
        config: config.clone(),
        clock,
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Reports
        .route("/report/stats", get(handlers::report_stats))
        .route("/report/emotional", get(handlers::report_emotional))
        .route("/report/monthly", get(handlers::report_monthly))
        .route("/report/correlation", get(handlers::report_correlation))
        .route("/report/scatter", get(handlers::report_scatter))
        // Regret audit
        .route("/report/audit", get(handlers::get_audit))
        .route("/report/audit/:id", post(handlers::mark_audit))
        // Dashboard
        .route("/dashboard/stats", get(handlers::dashboard_stats))
        .route(
            "/dashboard/savings",
            get(handlers::list_goals).post(handlers::create_goal),
        )
        .route(
            "/dashboard/savings/:id",
            put(handlers::update_goal).delete(handlers::delete_goal),
        )
        // Expenses
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route("/expenses/delete", post(handlers::delete_expenses))
        .route("/expenses/:id", delete(handlers::delete_expense));

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(db: Database, host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(db, host, port, AnalyticsConfig::default(), ServerConfig::from_env()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    analytics: AnalyticsConfig,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.allowed_origins.is_empty() {
        info!("CORS: same-origin only (set {} to allow others)", ALLOWED_ORIGINS_ENV);
    } else {
        info!(origins = ?config.allowed_origins, "CORS origins allowed");
    }
    if host != "127.0.0.1" && host != "localhost" {
        warn!("⚠️  Listening on {} - the API has no authentication", host);
    }

    let app = create_router(db, analytics, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// API error with a client-safe message
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Caller mistakes and missing records are safe to echo back
        if let Some(core) = err.downcast_ref::<curhat_core::Error>() {
            match core {
                curhat_core::Error::InvalidRange(_) | curhat_core::Error::InvalidData(_) => {
                    return Self::bad_request(&core.to_string());
                }
                curhat_core::Error::NotFound(_) => return Self::not_found(&core.to_string()),
                curhat_core::Error::ExternalWrite { id, .. } => {
                    let message = format!("Could not save changes to expense {}, please try again", id);
                    return Self {
                        status: StatusCode::BAD_GATEWAY,
                        message,
                        internal: Some(err),
                    };
                }
                _ => {}
            }
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
