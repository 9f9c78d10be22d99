//! # Sale Draft
//!
//! The ephemeral state behind the sales registration screen: selected
//! services, the chosen customer, the applied coupon and the points
//! deduction. Created per registration session and discarded on submit or
//! cancel.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Draft Operations                                │
//! │                                                                         │
//! │  Screen Action            Draft Method             State Change         │
//! │  ─────────────            ────────────             ────────────         │
//! │                                                                         │
//! │  Tap service ────────────► add_service() ────────► services.push(item)  │
//! │  +1,000 / -10,000 ───────► adjust_price() ───────► price += step (≥ 0)  │
//! │  Type a price ───────────► set_price() ──────────► price = n (≥ 0)      │
//! │  Pick customer ──────────► select_customer() ───► points, coupons      │
//! │  Pick coupon ────────────► apply_coupon() ───────► coupon = Some(c)     │
//! │  Enter points ───────────► set_used_points() ───► min(balance, sub)    │
//! │                                                                         │
//! │  Every change ───────────► summary() ────────────► PricingResult        │
//! │  Tap "등록" ─────────────► finalize() ───────────► NewSale payload       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{max_usable_points, PricingEngine, PricingResult};
use crate::types::{Coupon, Customer, NewSale, PaymentMethod, ServiceLineItem};
use crate::MAX_LINE_ITEMS;

/// Fixed price-adjustment buttons on the registration screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceStep {
    Thousand,
    TenThousand,
}

impl PriceStep {
    pub const fn amount(&self) -> i64 {
        match self {
            PriceStep::Thousand => 1_000,
            PriceStep::TenThousand => 10_000,
        }
    }
}

/// A sale being registered.
///
/// ## Invariants
/// - Services are unique by `id`
/// - Every unit price is `>= 0` (clamped at entry time)
/// - `used_points` never exceeds `min(points balance, subtotal)`
/// - At most one coupon is applied, and it belongs to the selected customer
#[derive(Debug, Clone)]
pub struct SaleDraft {
    sale_date: NaiveDate,
    services: Vec<ServiceLineItem>,
    customer: Option<Customer>,
    coupon: Option<Coupon>,
    used_points: i64,
    memo: Option<String>,
}

impl SaleDraft {
    pub fn new(sale_date: NaiveDate) -> Self {
        SaleDraft {
            sale_date,
            services: Vec::new(),
            customer: None,
            coupon: None,
            used_points: 0,
            memo: None,
        }
    }

    pub fn sale_date(&self) -> NaiveDate {
        self.sale_date
    }

    pub fn services(&self) -> &[ServiceLineItem] {
        &self.services
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn applied_coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    pub fn used_points(&self) -> i64 {
        self.used_points
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn set_memo(&mut self, memo: Option<String>) {
        self.memo = memo.filter(|m| !m.trim().is_empty());
    }

    // -------------------------------------------------------------------------
    // Services
    // -------------------------------------------------------------------------

    /// Adds a service at its catalogue price.
    pub fn add_service(&mut self, item: ServiceLineItem) -> CoreResult<()> {
        if self.services.iter().any(|s| s.id == item.id) {
            return Err(CoreError::DuplicateService(item.id));
        }
        if self.services.len() >= MAX_LINE_ITEMS {
            return Err(CoreError::TooManyServices { max: MAX_LINE_ITEMS });
        }

        self.services.push(ServiceLineItem {
            unit_price: item.unit_price.clamp_non_negative(),
            ..item
        });
        self.reclamp_points();
        Ok(())
    }

    pub fn remove_service(&mut self, id: i64) -> CoreResult<()> {
        let before = self.services.len();
        self.services.retain(|s| s.id != id);
        if self.services.len() == before {
            return Err(CoreError::ServiceNotFound(id));
        }
        self.reclamp_points();
        Ok(())
    }

    /// Moves a price up or down by one step. A decrement past zero lands on
    /// zero.
    pub fn adjust_price(&mut self, id: i64, step: PriceStep, increase: bool) -> CoreResult<Money> {
        let delta = if increase { step.amount() } else { -step.amount() };
        let item = self.service_mut(id)?;
        let current = item.unit_price.won();
        let next = Money::from_won(current.saturating_add(delta)).clamp_non_negative();
        item.unit_price = next;
        self.reclamp_points();
        Ok(next)
    }

    /// Overwrites a price with a typed value, clamped at zero.
    pub fn set_price(&mut self, id: i64, price: i64) -> CoreResult<Money> {
        let item = self.service_mut(id)?;
        let next = Money::from_won(price).clamp_non_negative();
        item.unit_price = next;
        self.reclamp_points();
        Ok(next)
    }

    fn service_mut(&mut self, id: i64) -> CoreResult<&mut ServiceLineItem> {
        self.services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(CoreError::ServiceNotFound(id))
    }

    // -------------------------------------------------------------------------
    // Customer, coupon, points
    // -------------------------------------------------------------------------

    /// Selects (or replaces) the customer. Any applied coupon and points
    /// deduction belong to the previous customer and are reset.
    pub fn select_customer(&mut self, customer: Customer) {
        self.customer = Some(customer);
        self.coupon = None;
        self.used_points = 0;
    }

    pub fn clear_customer(&mut self) {
        self.customer = None;
        self.coupon = None;
        self.used_points = 0;
    }

    /// Applies one of the selected customer's coupons, replacing any coupon
    /// already applied.
    pub fn apply_coupon(&mut self, coupon_id: i64) -> CoreResult<&Coupon> {
        let customer = self.customer.as_ref().ok_or(CoreError::NoCustomerSelected)?;
        let coupon = customer
            .coupons
            .iter()
            .find(|c| c.id == coupon_id)
            .ok_or(CoreError::CouponNotOwned(coupon_id))?;

        if coupon.used {
            return Err(CoreError::CouponNotRedeemable {
                id: coupon_id,
                reason: "already used".to_string(),
            });
        }
        if !coupon.is_redeemable(self.sale_date) {
            return Err(CoreError::CouponNotRedeemable {
                id: coupon_id,
                reason: "expired".to_string(),
            });
        }

        Ok(self.coupon.insert(coupon.clone()))
    }

    pub fn clear_coupon(&mut self) {
        self.coupon = None;
    }

    /// Sets the points deduction, clamped to `min(balance, subtotal)`.
    /// Returns the value actually kept.
    pub fn set_used_points(&mut self, points: i64) -> i64 {
        self.used_points = points.clamp(0, self.max_usable_points());
        self.used_points
    }

    /// Upper bound for the points input field.
    pub fn max_usable_points(&self) -> i64 {
        let balance = self.customer.as_ref().map_or(0, |c| c.points);
        max_usable_points(balance, crate::pricing::subtotal(&self.services))
    }

    fn reclamp_points(&mut self) {
        self.used_points = self.used_points.min(self.max_usable_points());
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// Live pricing summary for the current draft.
    pub fn summary(&self) -> PricingResult {
        PricingEngine::compute_parts(&self.services, self.coupon.as_ref(), self.used_points)
    }

    /// Builds the payload for `POST /sales`.
    pub fn finalize(&self, payment_method: PaymentMethod) -> CoreResult<NewSale> {
        if self.services.is_empty() {
            return Err(CoreError::EmptySale);
        }

        let summary = self.summary();
        Ok(NewSale {
            customer_id: self.customer.as_ref().map(|c| c.id),
            services: self.services.clone(),
            coupon_id: self.coupon.as_ref().map(|c| c.id),
            used_points: summary.points_used,
            payment_method,
            subtotal: summary.subtotal,
            discount: summary.total_discount(),
            final_amount: summary.final_amount,
            sale_date: self.sale_date,
            memo: self.memo.clone(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
