//! # Checkout Engine
//!
//! Turns a cart of product ids into a durable sale record while guaranteeing
//! stock is only decremented for units that were actually available, and that
//! a sale and its consumed stock move together.
//!
//! ## The One Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     sell(tax_id, cart)                              │
//! │                                                                     │
//! │  resolve customer ── not found? ──► CustomerNotFound (no writes)    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  validate_cart ── drops unknown / inactive / out-of-stock entries   │
//! │       │           (reported in CartReport::rejected)                │
//! │       ▼                                                             │
//! │  sellable empty? ──► EmptySale (no writes)                          │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  BEGIN ───────────────────────────────────────────────┐             │
//! │  │  INSERT sale header            (generated id)      │             │
//! │  │  for each item:                                    │             │
//! │  │     INSERT sale line           (quantity 1)        │             │
//! │  │     UPDATE stock = stock - 1   (guarded >= 1)      │             │
//! │  │         └── would go negative? ─► ROLLBACK ALL     │             │
//! │  COMMIT ──────────────────────────────────────────────┘             │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Sale { id, customer, items, sold_on }                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The validator's stock read is a point-in-time check, not a reservation.
//! Between it and the decrement another sale may consume the same unit; the
//! guarded decrement inside the transaction is what actually enforces the
//! non-negative invariant, and a refused decrement rolls the whole sale
//! back. No partial sale is ever visible to readers.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::DbError;
use crate::repository::customer::CustomerRepository;
use crate::repository::product::{DecrementError, ProductRepository};
use crate::repository::sale::SaleRepository;
use storefront_core::{CoreError, Customer, Product, Sale, UNITS_PER_LINE};

// =============================================================================
// Errors
// =============================================================================

/// Errors surfaced by the checkout engine: a refused business rule or a
/// failed database operation. Either one aborts the enclosing transaction.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<DecrementError> for CheckoutError {
    fn from(err: DecrementError) -> Self {
        match err {
            DecrementError::Core(e) => CheckoutError::Core(e),
            DecrementError::Db(e) => CheckoutError::Db(e),
        }
    }
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

// =============================================================================
// Cart Validation
// =============================================================================

/// Why a cart entry was dropped during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// No product with that id exists.
    Unknown,
    /// The product exists but was soft-deleted.
    Inactive,
    /// The product is active but has no stock at the moment of validation.
    OutOfStock,
}

/// One dropped cart entry and the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedEntry {
    pub product_id: i64,
    pub reason: RejectReason,
}

/// Outcome of validating a cart.
///
/// `sellable` preserves cart order and duplicates; callers that only want
/// the classic drop-silently behavior can ignore `rejected` entirely.
#[derive(Debug, Clone)]
pub struct CartReport {
    /// Resolved products that can be sold, one entry per sellable cart entry.
    pub sellable: Vec<Product>,
    /// Entries that were dropped, with reasons.
    pub rejected: Vec<RejectedEntry>,
}

impl CartReport {
    /// Whether nothing in the cart survived validation.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sellable.is_empty()
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// The checkout engine: cart validation, sale recording, stock consumption.
///
/// ## Usage
/// ```rust,ignore
/// let checkout = db.checkout();
///
/// // The whole flow in one call:
/// let sale = checkout.sell("12345678901", &[3, 7, 7]).await?;
///
/// // Or step by step:
/// let report = checkout.validate_cart(&[3, 7, 7]).await?;
/// let sale = checkout.record_sale(&customer, &report.sellable).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Checkout {
    pool: SqlitePool,
}

impl Checkout {
    /// Creates a new checkout engine on the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Checkout { pool }
    }

    /// Resolves a cart of product ids into sellable products.
    ///
    /// Each entry is resolved independently, duplicates included: an entry
    /// is sellable iff the product exists, is active, and has stock >= 1 at
    /// resolution time. Everything else lands in `rejected` with a reason.
    ///
    /// Read-only; the stock levels seen here are a snapshot, not a
    /// reservation.
    pub async fn validate_cart(&self, cart: &[i64]) -> CheckoutResult<CartReport> {
        let products = ProductRepository::new(self.pool.clone());

        let mut sellable = Vec::with_capacity(cart.len());
        let mut rejected = Vec::new();

        for &product_id in cart {
            match products.get_by_id(product_id).await? {
                None => rejected.push(RejectedEntry {
                    product_id,
                    reason: RejectReason::Unknown,
                }),
                Some(p) if !p.is_active => rejected.push(RejectedEntry {
                    product_id,
                    reason: RejectReason::Inactive,
                }),
                Some(p) if p.stock < UNITS_PER_LINE => rejected.push(RejectedEntry {
                    product_id,
                    reason: RejectReason::OutOfStock,
                }),
                Some(p) => sellable.push(p),
            }
        }

        debug!(
            sellable = sellable.len(),
            rejected = rejected.len(),
            "Cart validated"
        );

        Ok(CartReport { sellable, rejected })
    }

    /// Records a sale dated today. See [`record_sale_on`](Self::record_sale_on).
    pub async fn record_sale(&self, customer: &Customer, items: &[Product]) -> CheckoutResult<Sale> {
        self.record_sale_on(customer, items, Utc::now().date_naive())
            .await
    }

    /// Records a sale: one header row, one line per item, one stock
    /// decrement per line, all in a single transaction.
    ///
    /// ## Preconditions
    /// - `customer` must be registered; otherwise `CustomerNotFound` is
    ///   returned before any write begins
    /// - `items` must be non-empty; otherwise `EmptySale` is returned and
    ///   nothing is written
    ///
    /// ## Atomicity
    /// Line insertion and stock decrement are interleaved per item, and any
    /// failure (including the non-negative stock guard) returns early,
    /// which drops the transaction and rolls everything back: no header, no
    /// lines, no decrements survive a partial failure.
    pub async fn record_sale_on(
        &self,
        customer: &Customer,
        items: &[Product],
        sold_on: NaiveDate,
    ) -> CheckoutResult<Sale> {
        if items.is_empty() {
            return Err(CoreError::EmptySale.into());
        }

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // Re-check the customer inside the transaction so the header insert
        // can never dangle, even if the caller's copy is stale.
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM customers WHERE tax_id = ?1")
            .bind(&customer.tax_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DbError::from)?;

        if exists.is_none() {
            return Err(CoreError::CustomerNotFound(customer.tax_id.clone()).into());
        }

        let sale_id = SaleRepository::insert_header(&mut tx, &customer.tax_id, sold_on).await?;

        // One line and one decrement per cart entry. A product appearing
        // twice gets two lines and loses two units.
        let mut recorded = Vec::with_capacity(items.len());
        for item in items {
            SaleRepository::insert_line(&mut tx, sale_id, item.id).await?;

            let new_stock =
                ProductRepository::decrement_stock(&mut tx, item.id, UNITS_PER_LINE).await?;

            let mut sold = item.clone();
            sold.stock = new_stock;
            recorded.push(sold);
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            sale_id = sale_id,
            customer = %customer.tax_id,
            units = recorded.len(),
            "Sale recorded"
        );

        Ok(Sale {
            id: sale_id,
            customer: customer.clone(),
            items: recorded,
            sold_on,
        })
    }

    /// The composed flow: resolve the customer, validate the cart, refuse an
    /// empty result, record the sale.
    ///
    /// Unknown, inactive and out-of-stock cart entries are dropped without
    /// failing the call; only a cart with *no* sellable entries is an error.
    pub async fn sell(&self, customer_tax_id: &str, cart: &[i64]) -> CheckoutResult<Sale> {
        let customers = CustomerRepository::new(self.pool.clone());

        let customer = customers
            .get_by_tax_id(customer_tax_id)
            .await?
            .ok_or_else(|| CoreError::CustomerNotFound(customer_tax_id.to_string()))?;

        let report = self.validate_cart(cart).await?;
        if report.is_empty() {
            return Err(CoreError::EmptySale.into());
        }

        self.record_sale(&customer, &report.sellable).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use storefront_core::NewProduct;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn customer(tax_id: &str, name: &str) -> Customer {
        Customer {
            tax_id: tax_id.into(),
            name: name.into(),
            phone: "11987654321".into(),
            address: "1 Main St".into(),
        }
    }

    async fn register_alice(db: &Database) -> Customer {
        let alice = customer("12345678901", "Alice");
        db.customers().insert(&alice).await.unwrap();
        alice
    }

    async fn add_product(db: &Database, name: &str, stock: i64) -> Product {
        db.products()
            .insert(&NewProduct::general(name, 300, 900, stock))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_sale_with_stock_one_succeeds_and_stock_hits_zero() {
        let db = test_db().await;
        register_alice(&db).await;
        let p = add_product(&db, "Notebook", 1).await;

        let report = db.checkout().validate_cart(&[p.id]).await.unwrap();
        assert_eq!(report.sellable.len(), 1);
        assert!(report.rejected.is_empty());

        let sale = db.checkout().sell("12345678901", &[p.id]).await.unwrap();
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.total_cents(), 900);

        let after = db.products().get_by_id(p.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 0);
    }

    #[tokio::test]
    async fn test_out_of_stock_cart_never_reaches_recording() {
        let db = test_db().await;
        register_alice(&db).await;
        let p = add_product(&db, "Notebook", 0).await;

        let report = db.checkout().validate_cart(&[p.id]).await.unwrap();
        assert!(report.is_empty());
        assert_eq!(
            report.rejected,
            vec![RejectedEntry {
                product_id: p.id,
                reason: RejectReason::OutOfStock
            }]
        );

        let err = db.checkout().sell("12345678901", &[p.id]).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Core(CoreError::EmptySale)));

        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_entries_on_last_unit_roll_back_entirely() {
        let db = test_db().await;
        register_alice(&db).await;
        let p = add_product(&db, "Notebook", 1).await;

        // Both entries pass validation independently against the same
        // stock snapshot of 1.
        let report = db.checkout().validate_cart(&[p.id, p.id]).await.unwrap();
        assert_eq!(report.sellable.len(), 2);

        // The second decrement inside the transaction must refuse and roll
        // the whole sale back.
        let err = db
            .checkout()
            .sell("12345678901", &[p.id, p.id])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::NegativeStock {
                stock: 0,
                requested: 1,
                ..
            })
        ));

        let after = db.products().get_by_id(p.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 1, "rolled-back sale must not consume stock");
        assert_eq!(db.sales().count().await.unwrap(), 0, "no header row");
        assert_eq!(db.sales().line_count().await.unwrap(), 0, "no line rows");
    }

    #[tokio::test]
    async fn test_unknown_customer_fails_before_any_write() {
        let db = test_db().await;
        let p = add_product(&db, "Notebook", 5).await;

        let err = db.checkout().sell("99999999999", &[p.id]).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::CustomerNotFound(ref id)) if id == "99999999999"
        ));

        let after = db.products().get_by_id(p.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 5);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_record_sale_checks_customer_inside_transaction() {
        let db = test_db().await;
        let p = add_product(&db, "Notebook", 5).await;

        // Caller holds a customer value that was never registered.
        let ghost = customer("55555555555", "Ghost");
        let err = db
            .checkout()
            .record_sale(&ghost, &[p.clone()])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::CustomerNotFound(_))
        ));

        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_items_is_refused_without_writes() {
        let db = test_db().await;
        let alice = register_alice(&db).await;

        let err = db.checkout().record_sale(&alice, &[]).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Core(CoreError::EmptySale)));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_validation_reports_each_reason() {
        let db = test_db().await;
        register_alice(&db).await;

        let ok = add_product(&db, "Notebook", 3).await;
        let empty = add_product(&db, "Pencil", 0).await;
        let retired = add_product(&db, "Eraser", 10).await;
        db.products().soft_delete(retired.id).await.unwrap();

        let report = db
            .checkout()
            .validate_cart(&[ok.id, empty.id, retired.id, 424242])
            .await
            .unwrap();

        assert_eq!(report.sellable, vec![ok]);
        assert_eq!(
            report.rejected,
            vec![
                RejectedEntry {
                    product_id: empty.id,
                    reason: RejectReason::OutOfStock
                },
                RejectedEntry {
                    product_id: retired.id,
                    reason: RejectReason::Inactive
                },
                RejectedEntry {
                    product_id: 424242,
                    reason: RejectReason::Unknown
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_stock_drops_by_occurrence_count() {
        let db = test_db().await;
        register_alice(&db).await;
        let a = add_product(&db, "Notebook", 5).await;
        let b = add_product(&db, "Pencil", 2).await;

        let sale = db
            .checkout()
            .sell("12345678901", &[a.id, b.id, a.id])
            .await
            .unwrap();
        assert_eq!(sale.unit_count(), 3);

        let a_after = db.products().get_by_id(a.id).await.unwrap().unwrap();
        let b_after = db.products().get_by_id(b.id).await.unwrap().unwrap();
        assert_eq!(a_after.stock, 3, "two occurrences, two decrements");
        assert_eq!(b_after.stock, 1);

        // The reconstructed sale lists the duplicate occurrence twice.
        let lines = db.sales().products_for_sale(sale.id).await.unwrap();
        assert_eq!(
            lines.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![a.id, b.id, a.id]
        );
    }

    #[tokio::test]
    async fn test_invalid_entries_are_dropped_but_sale_proceeds() {
        let db = test_db().await;
        register_alice(&db).await;
        let p = add_product(&db, "Notebook", 5).await;

        let sale = db
            .checkout()
            .sell("12345678901", &[424242, p.id])
            .await
            .unwrap();
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].id, p.id);
    }

    #[tokio::test]
    async fn test_list_in_range_is_inclusive_on_both_ends() {
        let db = test_db().await;
        let alice = register_alice(&db).await;
        let p = add_product(&db, "Notebook", 10).await;

        let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        for day in [10, 11, 12, 13] {
            db.checkout()
                .record_sale_on(&alice, &[p.clone()], d(day))
                .await
                .unwrap();
        }

        let in_range = db.sales().list_in_range(d(11), d(12)).await.unwrap();
        let dates: Vec<_> = in_range.iter().map(|s| s.sold_on).collect();
        assert_eq!(dates, vec![d(11), d(12)]);

        // Degenerate single-day range still matches its endpoint.
        let single = db.sales().list_in_range(d(10), d(10)).await.unwrap();
        assert_eq!(single.len(), 1);

        let all = db.sales().list_all().await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_listing_is_idempotent_and_reconstructs_the_sale() {
        let db = test_db().await;
        register_alice(&db).await;
        let p = add_product(&db, "Notebook", 5).await;

        let recorded = db.checkout().sell("12345678901", &[p.id, p.id]).await.unwrap();

        let first = db.sales().list_all().await.unwrap();
        let second = db.sales().list_all().await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(first[0].sold_on, second[0].sold_on);
        assert_eq!(first[0].items, second[0].items);

        let listed = &first[0];
        assert_eq!(listed.id, recorded.id);
        assert_eq!(listed.customer.tax_id, "12345678901");
        assert_eq!(listed.customer.name, "Alice");
        assert_eq!(listed.unit_count(), 2);
        assert_eq!(listed.total_cents(), 1800);
    }
}
