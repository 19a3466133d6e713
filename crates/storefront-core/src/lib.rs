//! # storefront-core: Pure Domain Logic for the Storefront Register
//!
//! This crate is the **heart** of the storefront register. It contains the
//! domain model and its rules as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Storefront Architecture                          │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                   Caller (UI / CLI / tests)                   │ │
//! │  │     register customer ──► build cart ──► sell ──► list sales  │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │             ★ storefront-core (THIS CRATE) ★                  │ │
//! │  │                                                               │ │
//! │  │   ┌───────────┐   ┌───────────┐   ┌───────────┐              │ │
//! │  │   │   types   │   │   error   │   │ validation│              │ │
//! │  │   │ Customer  │   │ CoreError │   │   rules   │              │ │
//! │  │   │ Product   │   │ Validation│   │   checks  │              │ │
//! │  │   │ Sale      │   │   Error   │   │           │              │ │
//! │  │   └───────────┘   └───────────┘   └───────────┘              │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │                 storefront-db (Database Layer)                │ │
//! │  │      SQLite queries, migrations, repositories, checkout       │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Product, Sale)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: Prices are cents (i64), never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use storefront_core::Product` instead of
// `use storefront_core::types::Product`

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of digits in a customer tax identifier.
///
/// ## Business Reason
/// The tax id is the customer's identity key. It is a fixed-length numeric
/// string, so length is validated up front rather than left to the database.
pub const TAX_ID_DIGITS: usize = 11;

/// Number of digits in a customer phone number.
pub const PHONE_DIGITS: usize = 11;

/// Units consumed per sale line.
///
/// ## Business Reason
/// The data model has no quantity field: selling two units of a product means
/// two cart entries, each producing its own line and its own stock decrement.
pub const UNITS_PER_LINE: i64 = 1;
