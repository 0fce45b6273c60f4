//! # Error Types
//!
//! Domain-specific error types for medizap-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medizap-core errors (this file)                                       │
//! │  ├── CoreError        - Not-found, invalid argument, storage failures  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  medizap-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures → CoreError        │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the caller sees (code + message)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed operation never leaves a partial write behind: the error is
//! raised before the store transaction commits.

use thiserror::Error;

use crate::types::{CartEntryId, MedicineId};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Medicine cannot be found.
    #[error("Medicine not found: {0}")]
    MedicineNotFound(MedicineId),

    /// Cart entry cannot be found.
    #[error("Cart entry not found: {0}")]
    CartEntryNotFound(CartEntryId),

    /// Invalid argument (wraps ValidationError).
    ///
    /// ## When This Occurs
    /// - `add_to_cart(id, 0)` or `add_to_cart(id, -1)`
    /// - `update_quantity(entry, 0)`
    /// - A merge, line total or cart total would overflow
    /// - A negative medicine price
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The backing store failed (connection, constraint, I/O).
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// Returns true for the not-found family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::MedicineNotFound(_) | CoreError::CartEntryNotFound(_)
        )
    }

    /// Returns true when the caller passed an invalid argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Text could not be read as a value of this field.
    #[error("{field} is not a valid amount: '{value}'")]
    InvalidFormat { field: String, value: String },

    /// Arithmetic on the field would exceed the 64-bit range.
    #[error("{field} is too large")]
    Overflow { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::MedicineNotFound(MedicineId::new(42));
        assert_eq!(err.to_string(), "Medicine not found: 42");

        let err: CoreError = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Validation error: quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert!(core_err.is_invalid_argument());
    }

    #[test]
    fn test_format_and_overflow_messages() {
        let err = ValidationError::InvalidFormat {
            field: "price".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "price is not a valid amount: 'abc'");

        let err = ValidationError::Overflow {
            field: "cart total".to_string(),
        };
        assert_eq!(err.to_string(), "cart total is too large");
    }

    #[test]
    fn test_is_not_found() {
        assert!(CoreError::CartEntryNotFound(CartEntryId::new(1)).is_not_found());
        assert!(!CoreError::Storage("disk full".to_string()).is_not_found());
    }
}
