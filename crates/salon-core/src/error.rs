//! # Error Types
//!
//! Domain-specific error types for salon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  salon-core errors (this file)                                         │
//! │  ├── CoreError        - Sale draft / business rule violations          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  salon-client errors (separate crate)                                  │
//! │  └── ClientError      - Transport, auth and backend failures           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → Screen message      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing engine itself never returns an error; invalid inputs are
//! clamped. Errors here come from the sale draft and from validators.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised while building a sale.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The service is not part of the current draft.
    #[error("Service not in sale: {0}")]
    ServiceNotFound(i64),

    /// The same service was selected twice.
    #[error("Service already selected: {0}")]
    DuplicateService(i64),

    /// Too many services in one sale.
    #[error("A sale cannot have more than {max} services")]
    TooManyServices { max: usize },

    /// Finalizing a draft that has no services.
    #[error("Select at least one service")]
    EmptySale,

    /// A coupon was chosen but no customer is selected.
    #[error("Select a customer before applying a coupon")]
    NoCustomerSelected,

    /// The coupon does not belong to the selected customer.
    #[error("Coupon {0} does not belong to the selected customer")]
    CouponNotOwned(i64),

    /// The coupon has already been used or is past its expiry date.
    ///
    /// ## User Workflow
    /// ```text
    /// Select customer ──► Pick coupon "10% 할인"
    ///      │
    ///      ▼
    /// coupon.used == true  or  expiry < sale date
    ///      │
    ///      ▼
    /// CouponNotRedeemable { id, reason: "already used" }
    ///      │
    ///      ▼
    /// UI shows: "Coupon 7 cannot be applied: already used"
    /// ```
    #[error("Coupon {id} cannot be applied: {reason}")]
    CouponNotRedeemable { id: i64, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation of form input before anything is sent to the
/// backend.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CouponNotRedeemable {
            id: 7,
            reason: "already used".to_string(),
        };
        assert_eq!(err.to_string(), "Coupon 7 cannot be applied: already used");

        let err = CoreError::TooManyServices { max: 50 };
        assert_eq!(err.to_string(), "A sale cannot have more than 50 services");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "loginId".to_string(),
        };
        assert_eq!(err.to_string(), "loginId is required");

        let err = ValidationError::OutOfRange {
            field: "percent".to_string(),
            min: 0,
            max: 100,
        };
        assert_eq!(err.to_string(), "percent must be between 0 and 100");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
