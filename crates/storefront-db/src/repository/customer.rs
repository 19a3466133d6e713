//! # Customer Repository
//!
//! Database operations for customers.
//!
//! Customers are keyed by tax id; there is no surrogate key. Registration
//! inserts, updates never touch the key, and deletion is a hard delete
//! (customers carry no soft-delete flag, unlike products).

use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::Customer;

#[derive(Debug, FromRow)]
struct CustomerRow {
    tax_id: String,
    name: String,
    phone: String,
    address: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            tax_id: row.tax_id,
            name: row.name,
            phone: row.phone,
            address: row.address,
        }
    }
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Registers a new customer.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - tax id already registered
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(tax_id = %customer.tax_id, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (tax_id, name, phone, address)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&customer.tax_id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Looks a customer up by tax id.
    ///
    /// ## Returns
    /// * `Ok(Some(Customer))` - customer found
    /// * `Ok(None)` - no customer registered under that tax id
    pub async fn get_by_tax_id(&self, tax_id: &str) -> DbResult<Option<Customer>> {
        let row: Option<CustomerRow> = sqlx::query_as(
            r#"
            SELECT tax_id, name, phone, address
            FROM customers
            WHERE tax_id = ?1
            "#,
        )
        .bind(tax_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    /// Updates a customer's mutable fields. The tax id never changes.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no customer with that tax id
    pub async fn update(&self, customer: &Customer) -> DbResult<()> {
        debug!(tax_id = %customer.tax_id, "Updating customer");

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = ?2, phone = ?3, address = ?4
            WHERE tax_id = ?1
            "#,
        )
        .bind(&customer.tax_id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", &customer.tax_id));
        }

        Ok(())
    }

    /// Deletes a customer.
    ///
    /// Fails with a foreign key violation if the customer has recorded
    /// sales; sale history is never orphaned.
    pub async fn delete(&self, tax_id: &str) -> DbResult<()> {
        debug!(tax_id = %tax_id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE tax_id = ?1")
            .bind(tax_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", tax_id));
        }

        Ok(())
    }

    /// Lists all registered customers, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let rows: Vec<CustomerRow> = sqlx::query_as(
            r#"
            SELECT tax_id, name, phone, address
            FROM customers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use crate::error::DbError;
    use storefront_core::Customer;

    fn alice() -> Customer {
        Customer {
            tax_id: "12345678901".into(),
            name: "Alice".into(),
            phone: "11987654321".into(),
            address: "1 Main St".into(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.insert(&alice()).await.unwrap();

        let found = repo.get_by_tax_id("12345678901").await.unwrap().unwrap();
        assert_eq!(found.name, "Alice");

        assert!(repo.get_by_tax_id("99999999999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_tax_id_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.insert(&alice()).await.unwrap();
        let err = repo.insert(&alice()).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.insert(&alice()).await.unwrap();

        let mut moved = alice();
        moved.address = "2 Side St".into();
        repo.update(&moved).await.unwrap();

        let found = repo.get_by_tax_id("12345678901").await.unwrap().unwrap();
        assert_eq!(found.address, "2 Side St");

        repo.delete("12345678901").await.unwrap();
        assert!(repo.get_by_tax_id("12345678901").await.unwrap().is_none());

        // Deleting again reports not found.
        let err = repo.delete("12345678901").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
