//! # atelier-api: HTTP Server for Atelier
//!
//! JSON API over the artisan marketplace database.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Request Flow                                    │
//! │                                                                         │
//! │  HTTP request                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  request_span (middleware.rs) ← request id, span, x-request-id         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Router (routes/) ── /api/artisans, /api/products, /api/orders,        │
//! │       │              /api/reports, /health, fallback 404               │
//! │       ▼                                                                 │
//! │  Handler ── AppJson/AppPath/AppQuery → validate (atelier-core)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppState.db (atelier-db) ── repositories, order engine                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Json<T> or ApiError → {"error", "code"}                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::router;

use atelier_db::Database;

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database handle (pool + repositories)
    pub db: Database,
}

impl AppState {
    /// Creates the application state.
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
