//! # Error Types
//!
//! Domain-specific error types for atelier-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  atelier-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  atelier-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  atelier-api errors (in app)                                           │
//! │  └── ApiError         - What HTTP clients see (JSON)                   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule errors raised by the order engine.
///
/// Every variant aborts the surrounding transaction. None of them leave
/// partial writes behind.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An order line references a product that does not exist.
    #[error("Product {0} not found")]
    ProductNotFound(i64),

    /// Requested quantity exceeds the product's current stock.
    ///
    /// ## When This Occurs
    /// ```text
    /// Order line (product 7, qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 7, available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Whole order rolled back, client gets 400
    /// ```
    ///
    /// `available` already reflects earlier lines of the same order, so two
    /// lines for the same product are checked against the running figure.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Cancel was requested for an order that does not exist.
    #[error("Order {0} not found")]
    OrderNotFound(i64),

    /// Cancel was requested for an order that is already cancelled.
    #[error("Order {0} already cancelled")]
    OrderAlreadyCancelled(i64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before any storage access.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value must not be negative.
    #[error("{field} must be >= 0")]
    Negative { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. an unparseable date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
