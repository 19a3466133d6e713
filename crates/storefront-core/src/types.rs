//! # Domain Types
//!
//! Core domain types used throughout the storefront register.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │    Customer     │   │     Product     │   │      Sale       │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  tax_id (key)   │   │  id (assigned)  │   │  id (assigned)  │   │
//! │  │  name           │   │  name           │   │  customer       │   │
//! │  │  phone          │   │  prices (cents) │   │  items (cart)   │   │
//! │  │  address        │   │  stock, active  │   │  sold_on        │   │
//! │  └─────────────────┘   │  kind           │   └─────────────────┘   │
//! │                        └─────────────────┘                         │
//! │                                                                     │
//! │  ProductKind::General          plain shelf product                  │
//! │  ProductKind::Book { author }  book variant, extra author field     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! - `Customer` identity is its `tax_id`; two customers with the same tax id
//!   are the same customer regardless of other fields.
//! - `Product` identity is its repository-assigned integer `id`.
//!
//! Both equality impls below follow that rule, so carts and line lists can
//! be compared by identity the way lookups are.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Customer
// =============================================================================

/// A registered customer.
///
/// Identity is the `tax_id`: a fixed-length numeric string that is the
/// primary key in storage and the only field used for equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Tax identifier, exactly 11 numeric digits. Identity key.
    pub tax_id: String,

    /// Display name.
    pub name: String,

    /// Phone number, exactly 11 numeric digits.
    pub phone: String,

    /// Street address.
    pub address: String,
}

impl PartialEq for Customer {
    fn eq(&self, other: &Self) -> bool {
        self.tax_id == other.tax_id
    }
}

impl Eq for Customer {}

impl std::hash::Hash for Customer {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.tax_id.hash(state);
    }
}

// =============================================================================
// Product
// =============================================================================

/// Discriminates a plain product from the book variant.
///
/// ## Storage Mapping
/// Storage has no type tag; a product is a book iff its nullable `author`
/// column holds a non-empty value. The persistence layer translates between
/// that column and this enum, so the rest of the code never inspects an
/// optional author string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ProductKind {
    /// A plain shelf product.
    General,
    /// A book, which additionally carries its author.
    Book { author: String },
}

impl ProductKind {
    /// Builds the kind from the nullable author column representation.
    ///
    /// Empty or whitespace-only author strings mean "not a book", matching
    /// how absent column values are treated.
    pub fn from_author(author: Option<String>) -> Self {
        match author {
            Some(a) if !a.trim().is_empty() => ProductKind::Book { author: a },
            _ => ProductKind::General,
        }
    }

    /// The nullable author column representation of this kind.
    pub fn author(&self) -> Option<&str> {
        match self {
            ProductKind::General => None,
            ProductKind::Book { author } => Some(author),
        }
    }

    /// Whether this is the book variant.
    #[inline]
    pub fn is_book(&self) -> bool {
        matches!(self, ProductKind::Book { .. })
    }
}

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Identifier assigned by the repository on insert. Identity key.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// What the store paid per unit, in cents.
    pub purchase_price_cents: i64,

    /// What the store charges per unit, in cents.
    pub sale_price_cents: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Whether the product is active (soft delete flag).
    pub is_active: bool,

    /// Plain product or book variant.
    pub kind: ProductKind,
}

impl Product {
    /// Checks whether one unit of this product can be sold right now.
    ///
    /// Sellable = exists (we have it in hand), is active, and has at least
    /// one unit of stock. This is a point-in-time check; the transactional
    /// decrement re-enforces non-negativity at write time.
    #[inline]
    pub fn is_sellable(&self) -> bool {
        self.is_active && self.stock >= 1
    }

    /// Convenience accessor for the author of the book variant.
    #[inline]
    pub fn author(&self) -> Option<&str> {
        self.kind.author()
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Product {}

impl std::hash::Hash for Product {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A product about to be inserted, before the repository assigns its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub purchase_price_cents: i64,
    pub sale_price_cents: i64,
    pub stock: i64,
    pub kind: ProductKind,
}

impl NewProduct {
    /// A plain product, active by default.
    pub fn general(
        name: impl Into<String>,
        purchase_price_cents: i64,
        sale_price_cents: i64,
        stock: i64,
    ) -> Self {
        NewProduct {
            name: name.into(),
            purchase_price_cents,
            sale_price_cents,
            stock,
            kind: ProductKind::General,
        }
    }

    /// A book, active by default.
    pub fn book(
        name: impl Into<String>,
        purchase_price_cents: i64,
        sale_price_cents: i64,
        stock: i64,
        author: impl Into<String>,
    ) -> Self {
        NewProduct {
            name: name.into(),
            purchase_price_cents,
            sale_price_cents,
            stock,
            kind: ProductKind::Book {
                author: author.into(),
            },
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale: one customer, one date, one unit per listed product.
///
/// A sale is immutable once recorded. There is no pending, cancelled or
/// reversed state; cancellation is a cart-clearing action before the sale
/// is committed, never a mutation of a persisted sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    /// Identifier assigned by the repository on insert.
    pub id: i64,

    /// The customer who made the purchase.
    pub customer: Customer,

    /// Products sold, one unit each. Duplicate entries mean duplicate units.
    pub items: Vec<Product>,

    /// Calendar date of the sale.
    pub sold_on: NaiveDate,
}

impl Sale {
    /// Sum of the sale prices of every item, in cents.
    pub fn total_cents(&self) -> i64 {
        self.items.iter().map(|p| p.sale_price_cents).sum()
    }

    /// Number of units sold (one per item entry).
    #[inline]
    pub fn unit_count(&self) -> usize {
        self.items.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, stock: i64, active: bool) -> Product {
        Product {
            id,
            name: format!("product-{id}"),
            purchase_price_cents: 500,
            sale_price_cents: 900,
            stock,
            is_active: active,
            kind: ProductKind::General,
        }
    }

    #[test]
    fn test_product_equality_is_by_id() {
        let mut a = product(1, 10, true);
        let b = product(1, 0, false);
        a.name = "renamed".into();

        assert_eq!(a, b);
        assert_ne!(a, product(2, 10, true));
    }

    #[test]
    fn test_customer_equality_is_by_tax_id() {
        let a = Customer {
            tax_id: "12345678901".into(),
            name: "Alice".into(),
            phone: "11987654321".into(),
            address: "1 Main St".into(),
        };
        let mut b = a.clone();
        b.name = "Alice Renamed".into();

        assert_eq!(a, b);
    }

    #[test]
    fn test_sellable_requires_active_and_stock() {
        assert!(product(1, 1, true).is_sellable());
        assert!(!product(1, 0, true).is_sellable());
        assert!(!product(1, 5, false).is_sellable());
    }

    #[test]
    fn test_kind_from_author_column() {
        assert_eq!(
            ProductKind::from_author(Some("Machado de Assis".into())),
            ProductKind::Book {
                author: "Machado de Assis".into()
            }
        );
        assert_eq!(ProductKind::from_author(None), ProductKind::General);
        // Blank author means "not a book", same as an absent column value.
        assert_eq!(ProductKind::from_author(Some("  ".into())), ProductKind::General);
    }

    #[test]
    fn test_kind_author_round_trip() {
        let kind = ProductKind::Book {
            author: "Clarice Lispector".into(),
        };
        assert_eq!(kind.author(), Some("Clarice Lispector"));
        assert_eq!(ProductKind::General.author(), None);
    }

    #[test]
    fn test_sale_total_sums_sale_prices() {
        let customer = Customer {
            tax_id: "12345678901".into(),
            name: "Alice".into(),
            phone: "11987654321".into(),
            address: "1 Main St".into(),
        };
        let mut cheap = product(1, 3, true);
        cheap.sale_price_cents = 250;
        let mut dear = product(2, 3, true);
        dear.sale_price_cents = 1000;

        let sale = Sale {
            id: 7,
            customer,
            items: vec![cheap.clone(), dear, cheap],
            sold_on: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        };

        assert_eq!(sale.total_cents(), 1500);
        assert_eq!(sale.unit_count(), 3);
    }
}
