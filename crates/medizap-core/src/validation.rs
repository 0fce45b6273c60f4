//! # Validation Module
//!
//! Argument checks that run before any store access.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Boundary (CLI / API)                                          │
//! │  └── Type validation (argument parsing)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── quantity > 0                                                       │
//! │  └── price >= 0                                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── CHECK (quantity > 0), CHECK (price_cents >= 0)                     │
//! │  └── UNIQUE (cart_entries.medicine_id)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is not validated: a stock update overwrites the value
//! as given.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## Example
/// ```rust
/// use medizap_core::validation::validate_quantity;
///
/// assert!(validate_quantity(3).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-1).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Adds a requested quantity to an existing cart quantity.
///
/// Both sides are already positive, so the only failure is overflow.
pub fn merge_quantity(existing: i64, added: i64) -> ValidationResult<i64> {
    existing
        .checked_add(added)
        .ok_or_else(|| ValidationError::Overflow {
            field: "quantity".to_string(),
        })
}

/// Validates a price in minor units.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free samples)
///
/// ## Example
/// ```rust
/// use medizap_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}
