//! # Error Types
//!
//! Domain-specific error types for catalog-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  catalog-core errors (this file)                                       │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  catalog-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → service layer           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Not-found and insufficient stock are NOT errors here: lookups return
//! `Option` and a refused stock decrement returns `false`.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Catalog domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A product was asked to become its own parent.
    #[error("Product {product_id} cannot be its own parent")]
    SelfParent { product_id: String },

    /// Linking the product under the parent would close a loop.
    ///
    /// ## Example
    /// ```text
    /// SHIRT ──► SHIRT-RED ──► SHIRT-RED-XL
    ///   ▲                          │
    ///   └──── set_parent(SHIRT, SHIRT-RED-XL) ✗
    /// ```
    #[error("Setting parent of {product_id} to {parent_id} would create a cycle")]
    HierarchyCycle {
        product_id: String,
        parent_id: String,
    },

    /// The referenced parent product does not exist.
    #[error("Parent product not found: {0}")]
    ParentNotFound(String),

    /// Stock increase would overflow the stock counter.
    #[error("Stock for {sku} would overflow: current {current}, adding {quantity}")]
    StockOverflow {
        sku: String,
        current: i64,
        quantity: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Raised before any state change.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., slug with spaces, uid with surrounding whitespace).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
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
        let err = CoreError::HierarchyCycle {
            product_id: "a".to_string(),
            parent_id: "b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Setting parent of a to b would create a cycle"
        );

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "Validation error: sku is required");
    }
}
