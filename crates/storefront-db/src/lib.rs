//! # storefront-db: Database Layer for Storefront
//!
//! This crate provides database access for the storefront register.
//! It uses SQLite for local storage with sqlx for async operations, and
//! hosts the checkout engine that records sales and consumes stock in a
//! single transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Data Flow                              │
//! │                                                                         │
//! │  Caller (register frontend, seed binary, tests)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   storefront-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌───────────────┐   ┌──────────────────┐  │   │
//! │  │   │   Database   │   │ Repositories  │   │     Checkout     │  │   │
//! │  │   │  (pool.rs)   │   │ customer.rs   │   │  (checkout.rs)   │  │   │
//! │  │   │              │   │ product.rs    │   │                  │  │   │
//! │  │   │ SqlitePool   │◄──│ sale.rs       │◄──│ validate_cart    │  │   │
//! │  │   │ Migrations   │   │               │   │ record_sale      │  │   │
//! │  │   └──────────────┘   └───────────────┘   └──────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode, foreign keys on)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (customer, product, sale)
//! - [`checkout`] - Cart validation and transactional sale recording
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{Database, DbConfig};
//!
//! // Create database with default config (runs migrations)
//! let config = DbConfig::new("path/to/store.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let active = db.products().list_active().await?;
//!
//! // Sell: validates the cart, records the sale, decrements stock
//! let sale = db.checkout().sell("12345678901", &[3, 7, 7]).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{CartReport, Checkout, CheckoutError, RejectReason, RejectedEntry};
pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
