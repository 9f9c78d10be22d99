//! # Money Module
//!
//! Provides the `Money` type for handling won amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    12345 * 0.2 = 2469.0000000000005  ❌ WRONG!                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Won                                              │
//! │    12345 * 20 / 100 = 2469 (integer division floors)                    │
//! │    The won has no minor unit, so one i64 is the whole story             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use salon_core::money::Money;
//!
//! let cut = Money::from_won(25_000);
//! let perm = Money::from_won(80_000);
//! let total = cut + perm;
//! assert_eq!(total.won(), 105_000);
//! assert_eq!(total.to_string(), "105,000원");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A won amount.
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate results (subtotal minus discounts) may go
///   negative before they are floored at zero
/// - **Newtype**: serde writes it as a bare JSON number, which is what the
///   backend sends and expects
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from a won amount.
    #[inline]
    pub const fn from_won(won: i64) -> Self {
        Money(won)
    }

    /// Returns the amount in won.
    #[inline]
    pub const fn won(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Floors the value at zero.
    ///
    /// ```rust
    /// use salon_core::money::Money;
    ///
    /// assert_eq!(Money::from_won(-500).clamp_non_negative(), Money::zero());
    /// assert_eq!(Money::from_won(500).clamp_non_negative().won(), 500);
    /// ```
    #[inline]
    pub const fn clamp_non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Subtraction that saturates at the i64 bounds instead of overflowing.
    #[inline]
    pub const fn saturating_sub(self, other: Money) -> Self {
        Money(self.0.saturating_sub(other.0))
    }

    /// Addition that saturates at the i64 bounds instead of overflowing.
    #[inline]
    pub const fn saturating_add(self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Returns `floor(self * percent / 100)`.
    ///
    /// Always rounds down; there is no fractional won.
    ///
    /// ```rust
    /// use salon_core::money::Money;
    ///
    /// // 12,345 × 20% = 2,469.0 → 2,469
    /// assert_eq!(Money::from_won(12_345).percent_floor(20).won(), 2_469);
    /// // 999 × 15% = 149.85 → 149
    /// assert_eq!(Money::from_won(999).percent_floor(15).won(), 149);
    /// ```
    pub fn percent_floor(&self, percent: i64) -> Money {
        // i128 keeps large subtotals from overflowing the multiplication
        let product = self.0 as i128 * percent as i128;
        Money(product.div_euclid(100) as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders with thousands separators and the won suffix: `12,345원`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}원", sign, grouped)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc.saturating_add(m))
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
