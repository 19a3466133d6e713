//! # Product Repository
//!
//! Database operations for products, including the book variant and the
//! guarded stock decrement the checkout transaction relies on.
//!
//! ## Book Variant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │               Nullable Column ⇄ Tagged Variant                      │
//! │                                                                     │
//! │  products.author  NULL        ──►  ProductKind::General             │
//! │  products.author  'J. Amado'  ──►  ProductKind::Book { author }     │
//! │                                                                     │
//! │  The translation happens HERE and only here. Everything above the   │
//! │  repository sees the enum, never an optional author string.         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::SqlitePool;
use sqlx::{FromRow, SqliteConnection};
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::{CoreError, NewProduct, Product, ProductKind};

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    purchase_price_cents: i64,
    sale_price_cents: i64,
    stock: i64,
    is_active: bool,
    author: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
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

const SELECT_COLUMNS: &str =
    "id, name, purchase_price_cents, sale_price_cents, stock, is_active, author";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let book = repo
///     .insert(&NewProduct::book("Dom Casmurro", 1500, 2990, 4, "Machado de Assis"))
///     .await?;
/// let found = repo.get_by_id(book.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product (plain or book) and returns it with the
    /// repository-assigned id.
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        debug!(name = %new.name, book = new.kind.is_book(), "Inserting product");

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, purchase_price_cents, sale_price_cents, stock, is_active, author)
            VALUES (?1, ?2, ?3, ?4, 1, ?5)
            RETURNING id
            "#,
        )
        .bind(&new.name)
        .bind(new.purchase_price_cents)
        .bind(new.sale_price_cents)
        .bind(new.stock)
        .bind(new.kind.author())
        .fetch_one(&self.pool)
        .await?;

        Ok(Product {
            id,
            name: new.name.clone(),
            purchase_price_cents: new.purchase_price_cents,
            sale_price_cents: new.sale_price_cents,
            stock: new.stock,
            is_active: true,
            kind: new.kind.clone(),
        })
    }

    /// Gets a product by id, active or not.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - product found
    /// * `Ok(None)` - product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Updates an existing product's fields, including its kind.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?2,
                purchase_price_cents = ?3,
                sale_price_cents = ?4,
                stock = ?5,
                is_active = ?6,
                author = ?7
            WHERE id = ?1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.purchase_price_cents)
        .bind(product.sale_price_cents)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(product.kind.author())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id));
        }

        Ok(())
    }

    /// Overwrites a product's stock with a new absolute level.
    ///
    /// For restocking and corrections. Sales never use this; they go
    /// through the guarded [`decrement_stock`](Self::decrement_stock).
    pub async fn set_stock(&self, id: i64, new_stock: i64) -> DbResult<()> {
        debug!(id = id, new_stock = new_stock, "Setting stock");

        let result = sqlx::query("UPDATE products SET stock = ?2 WHERE id = ?1")
            .bind(id)
            .bind(new_stock)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// Historical sale lines still reference the product, so rows are never
    /// removed; an inactive product simply stops being sellable.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Soft-deleting product");

        let result = sqlx::query("UPDATE products SET is_active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Lists active products, ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM products WHERE is_active = 1 ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Lists active books (products with an author), ordered by name.
    pub async fn list_books(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM products \
             WHERE is_active = 1 AND author IS NOT NULL ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Decrements a product's stock, refusing to go below zero.
    ///
    /// ## Inventory Guard
    /// ```text
    /// UPDATE products SET stock = stock - by
    /// WHERE id = ? AND stock >= by
    /// RETURNING stock
    /// ```
    /// One conditional statement, so the check and the write are the same
    /// atomic operation on the row. An earlier sellability check may have
    /// read a stale stock level; this guard still holds.
    ///
    /// Runs on a caller-supplied connection so the checkout engine can keep
    /// every decrement of a sale inside the sale's transaction.
    ///
    /// ## Returns
    /// * `Ok(new_stock)` - stock after the decrement
    /// * `Err(CoreError::NegativeStock)` - decrement refused, stock untouched
    /// * `Err(CoreError::ProductNotFound)` - no such product
    pub(crate) async fn decrement_stock(
        conn: &mut SqliteConnection,
        product_id: i64,
        by: i64,
    ) -> Result<i64, DecrementError> {
        let new_stock: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET stock = stock - ?2
            WHERE id = ?1 AND stock >= ?2
            RETURNING stock
            "#,
        )
        .bind(product_id)
        .bind(by)
        .fetch_optional(&mut *conn)
        .await
        .map_err(DbError::from)?;

        match new_stock {
            Some(stock) => {
                debug!(id = product_id, stock = stock, "Stock decremented");
                Ok(stock)
            }
            None => {
                // Guard refused: either the row is missing or the decrement
                // would go negative. Read the stock to tell the two apart.
                let stock: Option<i64> =
                    sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                        .bind(product_id)
                        .fetch_optional(&mut *conn)
                        .await
                        .map_err(DbError::from)?;

                match stock {
                    Some(stock) => Err(CoreError::NegativeStock {
                        product_id,
                        stock,
                        requested: by,
                    }
                    .into()),
                    None => Err(CoreError::ProductNotFound(product_id).into()),
                }
            }
        }
    }
}

/// Failure modes of the guarded decrement: a refused business rule or a
/// database failure. Both abort the enclosing transaction.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DecrementError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Db(#[from] DbError),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use storefront_core::NewProduct;

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let a = repo
            .insert(&NewProduct::general("Notebook", 300, 750, 10))
            .await
            .unwrap();
        let b = repo
            .insert(&NewProduct::general("Pencil", 50, 120, 200))
            .await
            .unwrap();

        assert!(a.id >= 1);
        assert_eq!(b.id, a.id + 1);
        assert!(a.is_active);
    }

    #[tokio::test]
    async fn test_book_round_trip_through_author_column() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let book = repo
            .insert(&NewProduct::book(
                "Dom Casmurro",
                1500,
                2990,
                4,
                "Machado de Assis",
            ))
            .await
            .unwrap();

        let found = repo.get_by_id(book.id).await.unwrap().unwrap();
        assert_eq!(found.author(), Some("Machado de Assis"));
        assert!(found.kind.is_book());

        let plain = repo
            .insert(&NewProduct::general("Bookmark", 20, 90, 30))
            .await
            .unwrap();
        let found = repo.get_by_id(plain.id).await.unwrap().unwrap();
        assert_eq!(found.author(), None);
    }

    #[tokio::test]
    async fn test_list_books_filters_on_author() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&NewProduct::general("Bookmark", 20, 90, 30))
            .await
            .unwrap();
        repo.insert(&NewProduct::book("Vidas Secas", 1200, 2490, 2, "Graciliano Ramos"))
            .await
            .unwrap();

        let books = repo.list_books().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Vidas Secas");

        assert_eq!(repo.list_active().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_listing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let p = repo
            .insert(&NewProduct::general("Eraser", 30, 80, 15))
            .await
            .unwrap();
        repo.soft_delete(p.id).await.unwrap();

        assert!(repo.list_active().await.unwrap().is_empty());

        // Still resolvable by id, just inactive.
        let found = repo.get_by_id(p.id).await.unwrap().unwrap();
        assert!(!found.is_active);
    }

    #[tokio::test]
    async fn test_decrement_stock_guard() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let p = repo
            .insert(&NewProduct::general("Ruler", 100, 250, 1))
            .await
            .unwrap();

        let mut conn = db.pool().acquire().await.unwrap();

        let new_stock = ProductRepository::decrement_stock(&mut *conn, p.id, 1)
            .await
            .unwrap();
        assert_eq!(new_stock, 0);

        // Second decrement would go negative and must be refused untouched.
        let err = ProductRepository::decrement_stock(&mut *conn, p.id, 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DecrementError::Core(CoreError::NegativeStock {
                stock: 0,
                requested: 1,
                ..
            })
        ));

        let err = ProductRepository::decrement_stock(&mut *conn, 9999, 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DecrementError::Core(CoreError::ProductNotFound(9999))
        ));

        drop(conn);
        let found = repo.get_by_id(p.id).await.unwrap().unwrap();
        assert_eq!(found.stock, 0);
    }
}
