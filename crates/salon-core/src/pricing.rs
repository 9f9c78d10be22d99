//! # Pricing Engine
//!
//! Computes what a customer owes for the selected services after at most one
//! coupon and an explicit points deduction.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Sale Total Calculation                          │
//! │                                                                         │
//! │  line items ──► subtotal = Σ unitPrice                                  │
//! │                      │                                                  │
//! │  coupon ────────────►├──► couponDiscount                                │
//! │                      │      percent: floor(subtotal × value / 100)      │
//! │                      │      fixed:   value (NOT capped at subtotal)     │
//! │                      │      none:    0                                  │
//! │                      │                                                  │
//! │  usedPoints ────────►├──► pointsUsed = clamp(usedPoints, 0, subtotal)   │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  finalAmount = max(0, subtotal - couponDiscount - pointsUsed)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Pure: no I/O, no side effects, same input = same output
//! - Never errors and never panics; out-of-range input is clamped
//! - `final_amount` is always `>= 0`
//!
//! ## Example
//! ```rust
//! use salon_core::pricing::{PricingEngine, PricingInput};
//! use salon_core::types::{Coupon, DiscountType, ServiceLineItem};
//!
//! let input = PricingInput {
//!     line_items: vec![ServiceLineItem::new(1, "펌", 100_000)],
//!     coupon: Some(Coupon {
//!         id: 1,
//!         name: "10%".into(),
//!         discount_type: DiscountType::Percent,
//!         discount_value: 10,
//!         used: false,
//!         expiry_date: None,
//!     }),
//!     used_points: 5_000,
//! };
//!
//! let result = PricingEngine::compute(&input);
//! assert_eq!(result.coupon_discount.won(), 10_000);
//! assert_eq!(result.final_amount.won(), 85_000);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Coupon, DiscountType, ServiceLineItem};

/// Everything the engine needs for one computation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingInput {
    pub line_items: Vec<ServiceLineItem>,
    /// The applied coupon, if any.
    pub coupon: Option<Coupon>,
    /// Points the operator chose to deduct (1 point = 1 won).
    pub used_points: i64,
}

/// Derived totals rendered live on the sales registration screen.
///
/// ## Invariant
/// `final_amount == max(0, subtotal - coupon_discount - points_used)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricingResult {
    pub subtotal: Money,
    pub coupon_discount: Money,
    pub points_used: Money,
    pub final_amount: Money,
}

impl PricingResult {
    /// Coupon discount plus points, as sent in the sale payload.
    pub fn total_discount(&self) -> Money {
        self.coupon_discount.saturating_add(self.points_used)
    }

    /// The part of the discount swallowed by the zero floor.
    ///
    /// Non-zero when a fixed coupon (plus points) exceeds the subtotal. The
    /// total is still clamped; this lets the screen warn the operator before
    /// submitting.
    pub fn absorbed_discount(&self) -> Money {
        self.total_discount()
            .saturating_sub(self.subtotal)
            .clamp_non_negative()
    }

    pub fn is_over_discounted(&self) -> bool {
        self.absorbed_discount().is_positive()
    }
}

/// Stateless sale-total calculator.
pub struct PricingEngine;

impl PricingEngine {
    /// Computes the pricing result for `input`.
    pub fn compute(input: &PricingInput) -> PricingResult {
        Self::compute_parts(&input.line_items, input.coupon.as_ref(), input.used_points)
    }

    /// Borrowing variant of [`PricingEngine::compute`].
    pub fn compute_parts(
        line_items: &[ServiceLineItem],
        coupon: Option<&Coupon>,
        used_points: i64,
    ) -> PricingResult {
        let subtotal = subtotal(line_items);
        let coupon_discount = coupon
            .map(|c| coupon_discount(c, subtotal))
            .unwrap_or_default();
        let points_used = Money::from_won(used_points)
            .clamp_non_negative()
            .min(subtotal);

        let final_amount = subtotal
            .saturating_sub(coupon_discount)
            .saturating_sub(points_used)
            .clamp_non_negative();

        PricingResult {
            subtotal,
            coupon_discount,
            points_used,
            final_amount,
        }
    }
}

/// Sum of unit prices; negative prices count as zero.
pub fn subtotal(line_items: &[ServiceLineItem]) -> Money {
    line_items
        .iter()
        .map(|item| item.unit_price.clamp_non_negative())
        .sum()
}

/// Discount granted by `coupon` on `subtotal`.
///
/// Percent values are clamped into 0-100 and floored. Fixed values are
/// clamped at zero but deliberately not capped at the subtotal; the final
/// `max(0, ...)` absorbs any excess.
pub fn coupon_discount(coupon: &Coupon, subtotal: Money) -> Money {
    match coupon.discount_type {
        DiscountType::Percent => {
            let percent = coupon.discount_value.clamp(0, 100);
            subtotal.clamp_non_negative().percent_floor(percent)
        }
        DiscountType::Fixed => Money::from_won(coupon.discount_value).clamp_non_negative(),
    }
}

/// The most points an operator may deduct: `min(available, subtotal)`,
/// never negative.
pub fn max_usable_points(available: i64, subtotal: Money) -> i64 {
    available.clamp(0, subtotal.won().max(0))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn items(prices: &[i64]) -> Vec<ServiceLineItem> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| ServiceLineItem::new(i as i64 + 1, format!("service {}", i + 1), *p))
            .collect()
    }

    fn coupon(discount_type: DiscountType, value: i64) -> Coupon {
        Coupon {
            id: 1,
            name: "coupon".into(),
            discount_type,
            discount_value: value,
            used: false,
            expiry_date: None,
        }
    }

    fn compute(prices: &[i64], coupon: Option<Coupon>, points: i64) -> PricingResult {
        PricingEngine::compute(&PricingInput {
            line_items: items(prices),
            coupon,
            used_points: points,
        })
    }

    #[test]
    fn test_no_discount() {
        let result = compute(&[20_000, 35_000], None, 0);
        assert_eq!(result.subtotal.won(), 55_000);
        assert!(result.coupon_discount.is_zero());
        assert!(result.points_used.is_zero());
        assert_eq!(result.final_amount.won(), 55_000);
    }

    #[test]
    fn test_percent_coupon_floors() {
        let result = compute(&[12_345], Some(coupon(DiscountType::Percent, 20)), 0);
        assert_eq!(result.coupon_discount.won(), 2_469);
        assert_eq!(result.final_amount.won(), 9_876);
    }

    #[test]
    fn test_fixed_over_discount_clamps_to_zero() {
        let result = compute(&[10_000], Some(coupon(DiscountType::Fixed, 50_000)), 0);
        assert_eq!(result.coupon_discount.won(), 50_000);
        assert_eq!(result.final_amount, Money::zero());
        assert_eq!(result.absorbed_discount().won(), 40_000);
        assert!(result.is_over_discounted());
    }

    #[test]
    fn test_points_and_coupon_combine_additively() {
        let result = compute(&[100_000], Some(coupon(DiscountType::Percent, 10)), 5_000);
        assert_eq!(result.coupon_discount.won(), 10_000);
        assert_eq!(result.points_used.won(), 5_000);
        assert_eq!(result.total_discount().won(), 15_000);
        assert_eq!(result.final_amount.won(), 85_000);
        assert!(!result.is_over_discounted());
    }

    #[test]
    fn test_idempotent() {
        let input = PricingInput {
            line_items: items(&[30_000, 15_000]),
            coupon: Some(coupon(DiscountType::Percent, 15)),
            used_points: 2_000,
        };
        assert_eq!(PricingEngine::compute(&input), PricingEngine::compute(&input));
    }

    #[test]
    fn test_points_reclamped_to_subtotal() {
        let result = compute(&[8_000], None, 20_000);
        assert_eq!(result.points_used.won(), 8_000);
        assert!(result.final_amount.is_zero());

        let negative = compute(&[8_000], None, -500);
        assert!(negative.points_used.is_zero());
        assert_eq!(negative.final_amount.won(), 8_000);
    }

    #[test]
    fn test_percent_out_of_range_is_clamped() {
        let over = compute(&[10_000], Some(coupon(DiscountType::Percent, 150)), 0);
        assert_eq!(over.coupon_discount.won(), 10_000);
        assert!(over.final_amount.is_zero());

        let under = compute(&[10_000], Some(coupon(DiscountType::Percent, -5)), 0);
        assert!(under.coupon_discount.is_zero());
    }

    #[test]
    fn test_negative_fixed_value_is_ignored() {
        let result = compute(&[10_000], Some(coupon(DiscountType::Fixed, -3_000)), 0);
        assert!(result.coupon_discount.is_zero());
        assert_eq!(result.final_amount.won(), 10_000);
    }

    #[test]
    fn test_empty_sale() {
        let result = compute(&[], Some(coupon(DiscountType::Fixed, 5_000)), 1_000);
        assert!(result.subtotal.is_zero());
        assert!(result.points_used.is_zero());
        assert!(result.final_amount.is_zero());
    }

    #[test]
    fn test_final_amount_never_negative_across_inputs() {
        let coupons = [
            None,
            Some(coupon(DiscountType::Percent, 0)),
            Some(coupon(DiscountType::Percent, 55)),
            Some(coupon(DiscountType::Percent, 100)),
            Some(coupon(DiscountType::Fixed, 1)),
            Some(coupon(DiscountType::Fixed, 1_000_000)),
        ];
        for prices in [&[][..], &[0][..], &[999][..], &[15_000, 40_000][..]] {
            for c in &coupons {
                for points in [0, 1, 500, 1_000_000] {
                    let result = compute(prices, c.clone(), points);
                    assert!(!result.final_amount.is_negative());
                    let expected = (result.subtotal - result.coupon_discount - result.points_used)
                        .clamp_non_negative();
                    assert_eq!(result.final_amount, expected);
                }
            }
        }
    }

    #[test]
    fn test_max_usable_points() {
        assert_eq!(max_usable_points(3_000, Money::from_won(10_000)), 3_000);
        assert_eq!(max_usable_points(30_000, Money::from_won(10_000)), 10_000);
        assert_eq!(max_usable_points(-10, Money::from_won(10_000)), 0);
        assert_eq!(max_usable_points(500, Money::zero()), 0);
    }
}
