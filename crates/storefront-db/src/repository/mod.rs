//! # Repository Module
//!
//! Repository implementations for database access.
//!
//! ## Pattern
//! Each repository:
//! - Owns a clone of the `SqlitePool` (cheap, it's an Arc internally)
//! - Exposes async CRUD methods returning `DbResult`
//! - Maps rows to the pure domain types from storefront-core
//!
//! The checkout engine additionally drives a few crate-internal,
//! connection-scoped helpers here so that header insert, line inserts and
//! stock decrements all run on the same transaction.

pub mod customer;
pub mod product;
pub mod sale;
