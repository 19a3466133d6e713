//! # Sale Repository
//!
//! Database operations for sales and sale lines.
//!
//! ## Split of Responsibilities
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Sale Repository                               │
//! │                                                                     │
//! │  WRITE SIDE (crate-internal, connection-scoped)                     │
//! │  ├── insert_header(conn, ...)  one row in `sales`                   │
//! │  └── insert_line(conn, ...)    one row in `sale_lines`, quantity 1  │
//! │      Only the checkout engine calls these, always inside the one    │
//! │      transaction that also decrements stock.                        │
//! │                                                                     │
//! │  READ SIDE (public, pool-scoped)                                    │
//! │  ├── list_all()                every sale, reconstructed            │
//! │  ├── list_in_range(a, b)       sales with a <= sold_on <= b         │
//! │  └── products_for_sale(id)     the line items of one sale           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A sale row is immutable once committed. There is no update, void or
//! reversal statement in this module on purpose.

use chrono::NaiveDate;
use sqlx::sqlite::SqlitePool;
use sqlx::{FromRow, SqliteConnection};
use tracing::debug;

use crate::error::DbResult;
use storefront_core::{Customer, Product, ProductKind, Sale, UNITS_PER_LINE};

#[derive(Debug, FromRow)]
struct SaleHeaderRow {
    id: i64,
    sold_on: NaiveDate,
    tax_id: String,
    name: String,
    phone: String,
    address: String,
}

#[derive(Debug, FromRow)]
struct LineProductRow {
    id: i64,
    name: String,
    purchase_price_cents: i64,
    sale_price_cents: i64,
    stock: i64,
    is_active: bool,
    author: Option<String>,
}

impl From<LineProductRow> for Product {
    fn from(row: LineProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            purchase_price_cents: row.purchase_price_cents,
            sale_price_cents: row.sale_price_cents,
            stock: row.stock,
            is_active: row.is_active,
            kind: ProductKind::from_author(row.author),
        }
    }
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Write side (transaction-scoped, checkout engine only)
    // =========================================================================

    /// Inserts a sale header and returns the generated sale id.
    pub(crate) async fn insert_header(
        conn: &mut SqliteConnection,
        customer_tax_id: &str,
        sold_on: NaiveDate,
    ) -> DbResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sales (customer_tax_id, sold_on)
            VALUES (?1, ?2)
            RETURNING id
            "#,
        )
        .bind(customer_tax_id)
        .bind(sold_on)
        .fetch_one(conn)
        .await?;

        debug!(sale_id = id, customer = %customer_tax_id, "Sale header inserted");
        Ok(id)
    }

    /// Inserts one sale line. Quantity is always one unit.
    pub(crate) async fn insert_line(
        conn: &mut SqliteConnection,
        sale_id: i64,
        product_id: i64,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sale_lines (sale_id, product_id, quantity)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(sale_id)
        .bind(product_id)
        .bind(UNITS_PER_LINE)
        .execute(conn)
        .await?;

        Ok(())
    }

    // =========================================================================
    // Read side (Sale Query Service)
    // =========================================================================

    /// Lists every recorded sale, reconstructed with its customer and items.
    ///
    /// Read-only and idempotent: two calls without intervening writes return
    /// the same sequence.
    pub async fn list_all(&self) -> DbResult<Vec<Sale>> {
        let headers: Vec<SaleHeaderRow> = sqlx::query_as(
            r#"
            SELECT s.id, s.sold_on, c.tax_id, c.name, c.phone, c.address
            FROM sales s
            INNER JOIN customers c ON s.customer_tax_id = c.tax_id
            ORDER BY s.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(headers).await
    }

    /// Lists sales with `start <= sold_on <= end`, inclusive on both ends.
    pub async fn list_in_range(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<Sale>> {
        let headers: Vec<SaleHeaderRow> = sqlx::query_as(
            r#"
            SELECT s.id, s.sold_on, c.tax_id, c.name, c.phone, c.address
            FROM sales s
            INNER JOIN customers c ON s.customer_tax_id = c.tax_id
            WHERE s.sold_on BETWEEN ?1 AND ?2
            ORDER BY s.id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(headers).await
    }

    /// Fetches the products referenced by a sale's lines, one entry per
    /// line (a product sold twice appears twice).
    pub async fn products_for_sale(&self, sale_id: i64) -> DbResult<Vec<Product>> {
        let rows: Vec<LineProductRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.name, p.purchase_price_cents, p.sale_price_cents,
                   p.stock, p.is_active, p.author
            FROM products p
            INNER JOIN sale_lines sl ON p.id = sl.product_id
            WHERE sl.sale_id = ?1
            ORDER BY sl.id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Counts recorded sales (for diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Counts recorded sale lines (for diagnostics and tests).
    pub async fn line_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_lines")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Attaches each header's line items, building full Sale values.
    async fn hydrate(&self, headers: Vec<SaleHeaderRow>) -> DbResult<Vec<Sale>> {
        let mut sales = Vec::with_capacity(headers.len());

        for header in headers {
            let items = self.products_for_sale(header.id).await?;
            sales.push(Sale {
                id: header.id,
                customer: Customer {
                    tax_id: header.tax_id,
                    name: header.name,
                    phone: header.phone,
                    address: header.address,
                },
                items,
                sold_on: header.sold_on,
            });
        }

        Ok(sales)
    }
}
