//! # Validation Module
//!
//! Input validation for the login, customer, sale, expense and coupon forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screen form                                                  │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: salon-client API wrappers                                    │
//! │  └── THIS MODULE: checked again before a payload leaves the device     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── 400 / 422 responses, surfaced as notifications                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use salon_core::validation::{validate_phone, validate_percent};
//!
//! assert!(validate_phone("010-1234-5678").is_ok());
//! assert!(validate_percent(110).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{DiscountType, NewCoupon, NewCustomer, NewExpense};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn max_chars(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

// =============================================================================
// Login
// =============================================================================

/// Validates a login id.
///
/// ## Rules
/// - Must not be empty
/// - 4 to 30 characters
/// - Letters, digits, `.`, `_`, `-` only
pub fn validate_login_id(login_id: &str) -> ValidationResult<()> {
    required("loginId", login_id)?;
    let login_id = login_id.trim();

    if login_id.chars().count() < 4 {
        return Err(ValidationError::TooShort {
            field: "loginId".to_string(),
            min: 4,
        });
    }
    max_chars("loginId", login_id, 30)?;

    if !login_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "loginId".to_string(),
            reason: "must contain only letters, numbers, '.', '_' and '-'".to_string(),
        });
    }

    Ok(())
}

/// Validates a password (presence and minimum length only; strength rules
/// live on the backend).
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    if password.chars().count() < 4 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 4,
        });
    }
    Ok(())
}

// =============================================================================
// Customer
// =============================================================================

pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    required("name", name)?;
    max_chars("name", name, 50)
}

/// Validates a Korean phone number.
///
/// ## Rules
/// - Digits with optional hyphens or spaces
/// - 10 or 11 digits, starting with `0`
/// - 9 digits for Seoul landlines (`02`)
///
/// ## Example
/// ```rust
/// use salon_core::validation::validate_phone;
///
/// assert!(validate_phone("01012345678").is_ok());
/// assert!(validate_phone("02-123-4567").is_ok());
/// assert!(validate_phone("12345").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    required("phone", phone)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "phone".to_string(),
        reason: reason.to_string(),
    };

    if !phone
        .trim()
        .chars()
        .all(|c| c.is_ascii_digit() || c == '-' || c == ' ')
    {
        return Err(invalid("must contain only digits and hyphens"));
    }

    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let seoul_landline = digits.len() == 9 && digits.starts_with("02");
    if !(seoul_landline || (10..=11).contains(&digits.len())) || !digits.starts_with('0') {
        return Err(invalid("must be a 10 or 11 digit number starting with 0 (9 for 02)"));
    }

    Ok(())
}

pub fn validate_new_customer(customer: &NewCustomer) -> ValidationResult<()> {
    validate_customer_name(&customer.name)?;
    validate_phone(&customer.phone)?;
    if let Some(memo) = &customer.memo {
        max_chars("memo", memo, 500)?;
    }
    Ok(())
}

// =============================================================================
// Amounts
// =============================================================================

/// Validates a service price. Zero is allowed (complimentary service).
pub fn validate_price(won: i64) -> ValidationResult<()> {
    if won < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

pub fn validate_expense_amount(won: i64) -> ValidationResult<()> {
    if won <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }
    Ok(())
}

pub fn validate_percent(value: i64) -> ValidationResult<()> {
    if !(0..=100).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: "percent".to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

pub fn validate_new_expense(expense: &NewExpense) -> ValidationResult<()> {
    required("category", &expense.category)?;
    max_chars("category", &expense.category, 30)?;
    validate_expense_amount(expense.amount.won())
}

// =============================================================================
// Coupon
// =============================================================================

/// Validates a coupon before issuing it.
///
/// ## Rules
/// - Name required, at most 50 characters
/// - Percent coupons: value in 0-100, and not zero
/// - Fixed coupons: value > 0
pub fn validate_new_coupon(coupon: &NewCoupon) -> ValidationResult<()> {
    required("name", &coupon.name)?;
    max_chars("name", &coupon.name, 50)?;

    match coupon.discount_type {
        DiscountType::Percent => {
            validate_percent(coupon.discount_value)?;
            if coupon.discount_value == 0 {
                return Err(ValidationError::MustBePositive {
                    field: "discountValue".to_string(),
                });
            }
        }
        DiscountType::Fixed => {
            if coupon.discount_value <= 0 {
                return Err(ValidationError::MustBePositive {
                    field: "discountValue".to_string(),
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::NaiveDate;

    #[test]
    fn test_validate_login_id() {
        assert!(validate_login_id("owner").is_ok());
        assert!(validate_login_id("salon.kim_01").is_ok());

        assert!(validate_login_id("").is_err());
        assert!(validate_login_id("abc").is_err());
        assert!(validate_login_id("has space").is_err());
        assert!(validate_login_id(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("abc").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("010-1234-5678").is_ok());
        assert!(validate_phone("01012345678").is_ok());
        assert!(validate_phone("031 123 4567").is_ok());
        assert!(validate_phone("02-123-4567").is_ok());
        assert!(validate_phone("02-1234-5678").is_ok());

        assert!(validate_phone("").is_err());
        assert!(validate_phone("031-123-456").is_err());
        assert!(validate_phone("010-12-34").is_err());
        assert!(validate_phone("110-1234-5678").is_err());
        assert!(validate_phone("010-abcd-5678").is_err());
    }

    #[test]
    fn test_validate_price_and_amount() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(25_000).is_ok());
        assert!(validate_price(-1).is_err());

        assert!(validate_expense_amount(1).is_ok());
        assert!(validate_expense_amount(0).is_err());
    }

    #[test]
    fn test_validate_new_coupon() {
        let mut coupon = NewCoupon {
            customer_id: 1,
            name: "재방문 10%".into(),
            discount_type: DiscountType::Percent,
            discount_value: 10,
            expiry_date: None,
        };
        assert!(validate_new_coupon(&coupon).is_ok());

        coupon.discount_value = 101;
        assert!(validate_new_coupon(&coupon).is_err());
        coupon.discount_value = 0;
        assert!(validate_new_coupon(&coupon).is_err());

        coupon.discount_type = DiscountType::Fixed;
        coupon.discount_value = 5_000;
        assert!(validate_new_coupon(&coupon).is_ok());
        coupon.discount_value = -1;
        assert!(validate_new_coupon(&coupon).is_err());

        coupon.discount_value = 5_000;
        coupon.name = " ".into();
        assert!(validate_new_coupon(&coupon).is_err());
    }

    #[test]
    fn test_validate_new_expense() {
        let expense = NewExpense {
            category: "재료비".into(),
            amount: Money::from_won(45_000),
            expense_date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            memo: None,
        };
        assert!(validate_new_expense(&expense).is_ok());

        let zero = NewExpense { amount: Money::zero(), ..expense.clone() };
        assert!(validate_new_expense(&zero).is_err());

        let blank = NewExpense { category: "".into(), ..expense };
        assert!(validate_new_expense(&blank).is_err());
    }

    #[test]
    fn test_validate_new_customer() {
        let customer = NewCustomer {
            name: "김민지".into(),
            phone: "010-1234-5678".into(),
            memo: Some("두피 민감".into()),
        };
        assert!(validate_new_customer(&customer).is_ok());

        let bad_phone = NewCustomer { phone: "123".into(), ..customer };
        assert!(validate_new_customer(&bad_phone).is_err());
    }
}
