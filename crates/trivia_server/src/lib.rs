//! HTTP boundary for the trivia API.
//!
//! # Responsibility
//! - Route requests to `trivia_core` services and render JSON envelopes.
//! - Map service errors to 400/404/422/500 responses.
//! - Apply CORS headers and per-request logging.
//!
//! # Invariants
//! - Handlers never report success after a failed service call.
//! - The shared connection is locked for one service call at a time.

pub mod config;
mod error;
mod handlers;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;

use anyhow::Context;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::routing::{get, post};
use axum::{middleware, Router};
use log::info;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use trivia_core::db::open_db;
use trivia_core::init_logging;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a migrated connection (see `trivia_core::db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let conn = self
            .db
            .lock()
            .map_err(|_| ApiError::Internal("database connection lock poisoned".to_string()))?;
        f(&conn)
    }
}

/// Builds the full route table.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/categories", get(handlers::list_categories))
        .route(
            "/categories/:category_id/questions",
            get(handlers::questions_by_category),
        )
        .route(
            "/questions",
            get(handlers::list_questions).post(handlers::create_question),
        )
        .route("/questions/search", post(handlers::search_questions))
        .route(
            "/questions/:question_id",
            get(handlers::get_question).delete(handlers::delete_question),
        )
        .route("/quizzes", post(handlers::next_quiz_question))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(middleware::from_fn(handlers::log_request))
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
}

/// Starts logging, opens the database and serves until the listener fails.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, &config.log_dir.to_string_lossy())
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let conn = open_db(&config.db_path).with_context(|| {
        format!(
            "failed to open trivia database `{}`",
            config.db_path.display()
        )
    })?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(
        "event=server_start module=server status=ok bind_addr={} db_path={}",
        config.bind_addr,
        config.db_path.display()
    );

    axum::serve(listener, build_router(AppState::new(conn)))
        .await
        .context("server stopped unexpectedly")
}
