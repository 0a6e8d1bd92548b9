//! # atelier-core: Pure Domain Logic for Atelier
//!
//! This crate holds the domain model of the artisan marketplace with zero
//! I/O dependencies. The database layer and the HTTP server both build on it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Atelier Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (axum)                              │   │
//! │  │    /api/artisans  /api/products  /api/orders  /api/reports     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ atelier-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   error   │  │ validation│                  │   │
//! │  │   │  Artisan  │  │ CoreError │  │   rules   │                  │   │
//! │  │   │  Product  │  │Validation │  │  checks   │                  │   │
//! │  │   │   Order   │  │   Error   │  │   dates   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  atelier-db (Database Layer)                    │   │
//! │  │          SQLite queries, migrations, order engine               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Artisan, Product, Order, OrderItem, reports)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation and report date parsing
//!
//! ## Example Usage
//!
//! ```rust
//! use atelier_core::{OrderLine, validation::validate_order_lines};
//!
//! let lines = vec![OrderLine { product_id: 1, quantity: 2 }];
//! assert!(validate_order_lines(&lines).is_ok());
//! assert!(validate_order_lines(&[]).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Threshold used by the low-stock report when the caller gives none.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Number of categories returned by the sales summary.
pub const TOP_CATEGORY_LIMIT: i64 = 5;
