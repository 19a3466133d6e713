//! # Validation Module
//!
//! Input validation for customer and product registration.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Caller (form / CLI)                                       │
//! │  └── THIS MODULE: field rules, before anything is persisted         │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: Database (SQLite)                                         │
//! │  ├── NOT NULL and PRIMARY KEY constraints                           │
//! │  └── CHECK (stock >= 0)                                             │
//! │                                                                     │
//! │  Defense in depth: the layers catch different mistakes              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{PHONE_DIGITS, TAX_ID_DIGITS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn is_exact_digits(value: &str, digits: usize) -> bool {
    value.len() == digits && value.chars().all(|c| c.is_ascii_digit())
}

// =============================================================================
// Customer Fields
// =============================================================================

/// Validates a customer tax identifier.
///
/// ## Rules
/// - Exactly 11 numeric digits, nothing else
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_tax_id;
///
/// assert!(validate_tax_id("12345678901").is_ok());
/// assert!(validate_tax_id("123.456.789-01").is_err());
/// assert!(validate_tax_id("1234567890").is_err());
/// ```
pub fn validate_tax_id(tax_id: &str) -> ValidationResult<()> {
    if !is_exact_digits(tax_id, TAX_ID_DIGITS) {
        return Err(ValidationError::NotNumericDigits {
            field: "tax id".to_string(),
            digits: TAX_ID_DIGITS,
        });
    }
    Ok(())
}

/// Validates a customer phone number: exactly 11 numeric digits.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if !is_exact_digits(phone, PHONE_DIGITS) {
        return Err(ValidationError::NotNumericDigits {
            field: "phone".to_string(),
            digits: PHONE_DIGITS,
        });
    }
    Ok(())
}

/// Validates a customer name.
///
/// ## Rules
/// - At least 2 characters after trimming
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() < 2 {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: 2,
        });
    }

    Ok(())
}

/// Validates a customer address.
///
/// ## Rules
/// - At least 5 characters after trimming
pub fn validate_address(address: &str) -> ValidationResult<()> {
    let address = address.trim();

    if address.is_empty() {
        return Err(ValidationError::Required {
            field: "address".to_string(),
        });
    }

    if address.len() < 5 {
        return Err(ValidationError::TooShort {
            field: "address".to_string(),
            min: 5,
        });
    }

    Ok(())
}

// =============================================================================
// Product Fields
// =============================================================================

/// Validates a product name: must not be empty.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }
    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero is allowed
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock quantity.
///
/// ## Rules
/// - Must be non-negative (>= 0); stock never goes below zero anywhere
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tax_id() {
        assert!(validate_tax_id("12345678901").is_ok());

        assert!(validate_tax_id("").is_err());
        assert!(validate_tax_id("1234567890").is_err()); // 10 digits
        assert!(validate_tax_id("123456789012").is_err()); // 12 digits
        assert!(validate_tax_id("123.456.789-01").is_err()); // punctuation
        assert!(validate_tax_id("1234567890a").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("11987654321").is_ok());
        assert!(validate_phone("(11)98765-43").is_err());
        assert!(validate_phone("119876543").is_err());
    }

    #[test]
    fn test_validate_customer_name() {
        assert!(validate_customer_name("Jo").is_ok());
        assert!(validate_customer_name("Maria Silva").is_ok());

        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name("J").is_err());
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("1 Main St").is_ok());
        assert!(validate_address("Rua A").is_ok());

        assert!(validate_address("").is_err());
        assert!(validate_address("Rua").is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(100).is_ok());
        assert!(validate_stock(-1).is_err());
    }
}
