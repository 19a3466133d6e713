//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  storefront-core errors (this file)                                 │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  storefront-db errors (separate crate)                              │
//! │  ├── DbError          - Database operation failures                 │
//! │  └── CheckoutError    - CoreError or DbError at the sale boundary   │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → CheckoutError → Caller         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, stock level, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
///
/// These errors represent conditions the engine refuses to persist. They are
/// caught by callers and translated to user-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Attempted to record a sale with zero resolved items.
    ///
    /// ## When This Occurs
    /// - The cart was empty to begin with
    /// - Every cart entry was dropped during validation (unknown, inactive
    ///   or out-of-stock products)
    ///
    /// Recovered by the caller; nothing has been written.
    #[error("sale has no items")]
    EmptySale,

    /// A stock decrement would drive stock below zero.
    ///
    /// ## When This Occurs
    /// The validator's stock read and the decrement are separate reads, so a
    /// cart can pass validation against a snapshot that is stale by the time
    /// the decrement runs (two entries of a product with one unit left, or a
    /// concurrent sale). This guard is the final defense; it aborts and rolls
    /// back the whole sale.
    #[error("stock for product {product_id} would drop below zero (stock {stock}, decrement {requested})")]
    NegativeStock {
        product_id: i64,
        stock: i64,
        requested: i64,
    },

    /// Referenced customer does not exist.
    ///
    /// Surfaced before any write begins.
    #[error("customer not found: {0}")]
    CustomerNotFound(String),

    /// Referenced product does not exist.
    #[error("product not found: {0}")]
    ProductNotFound(i64),

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller-supplied input doesn't meet requirements. Used
/// for early validation before anything touches the database.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value must be exactly N numeric digits.
    #[error("{field} must be exactly {digits} numeric digits")]
    NotNumericDigits { field: String, digits: usize },

    /// Numeric value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
