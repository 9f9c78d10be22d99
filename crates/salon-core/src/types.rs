//! # Domain Types
//!
//! Core domain types shared by the screens and the REST client.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │     Coupon      │   │ ServiceLineItem │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  discountType   │   │  id             │       │
//! │  │  points         │   │  discountValue  │   │  name           │       │
//! │  │  coupons[]      │   │  used, expiry   │   │  unitPrice      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Sale/NewSale  │   │ Expense/NewExp. │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  services[]     │   │  category       │   │  Card           │       │
//! │  │  discount       │   │  amount         │   │  Cash           │       │
//! │  │  finalAmount    │   │  expenseDate    │   │  Transfer       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! Every record here is owned by the backend. The app holds read-only
//! snapshots (`Customer`, `Coupon`, `Sale`, `Expense`) and builds write
//! payloads (`NewSale`, `NewExpense`, `NewCustomer`, `NewCoupon`).
//! Field names follow the backend's camelCase JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Service Line Item
// =============================================================================

/// A service selected for a sale (cut, perm, color, ...).
///
/// The price starts at the catalogue price and may be edited by the operator
/// after selection. Negative prices are clamped to zero at entry time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ServiceLineItem {
    pub id: i64,
    pub name: String,
    pub unit_price: Money,
}

impl ServiceLineItem {
    pub fn new(id: i64, name: impl Into<String>, unit_price: i64) -> Self {
        ServiceLineItem {
            id,
            name: name.into(),
            unit_price: Money::from_won(unit_price).clamp_non_negative(),
        }
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// How a coupon's `discount_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DiscountType {
    /// `discount_value` is a percentage (0-100) of the subtotal.
    Percent,
    /// `discount_value` is a won amount.
    Fixed,
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscountType::Percent => write!(f, "percent"),
            DiscountType::Fixed => write!(f, "fixed"),
        }
    }
}

/// A coupon issued to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Coupon {
    pub id: i64,
    pub name: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    #[serde(default)]
    pub used: bool,
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

impl Coupon {
    /// A coupon can be applied when it is unused and not past its expiry
    /// date. The expiry date itself is still valid.
    pub fn is_redeemable(&self, today: NaiveDate) -> bool {
        !self.used && self.expiry_date.map_or(true, |expiry| expiry >= today)
    }

    /// Human-readable discount label, e.g. `10%` or `5,000원`.
    pub fn discount_label(&self) -> String {
        match self.discount_type {
            DiscountType::Percent => format!("{}%", self.discount_value),
            DiscountType::Fixed => Money::from_won(self.discount_value).to_string(),
        }
    }
}

/// Payload for issuing a coupon to a customer (`POST /benefit/coupon`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewCoupon {
    pub customer_id: i64,
    pub name: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer record with its points balance and coupons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    /// Points balance. Never negative.
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub coupons: Vec<Coupon>,
}

impl Customer {
    /// Points balance as money (1 point = 1 won).
    pub fn points_balance(&self) -> Money {
        Money::from_won(self.points).clamp_non_negative()
    }

    /// Coupons that can be applied on `today`.
    pub fn redeemable_coupons(&self, today: NaiveDate) -> impl Iterator<Item = &Coupon> {
        self.coupons.iter().filter(move |c| c.is_redeemable(today))
    }
}

/// Payload for creating or updating a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub memo: Option<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PaymentMethod {
    Card,
    Cash,
    Transfer,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Card
    }
}

/// Payload for registering a sale (`POST /sales`).
///
/// Built by [`crate::sale::SaleDraft::finalize`]; the amounts are the
/// pricing result the operator saw on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewSale {
    pub customer_id: Option<i64>,
    pub services: Vec<ServiceLineItem>,
    pub coupon_id: Option<i64>,
    pub used_points: Money,
    pub payment_method: PaymentMethod,
    pub subtotal: Money,
    pub discount: Money,
    pub final_amount: Money,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    pub memo: Option<String>,
}

/// A registered sale as returned by `GET /sales`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub services: Vec<ServiceLineItem>,
    pub payment_method: PaymentMethod,
    pub subtotal: Money,
    #[serde(default)]
    pub discount: Money,
    pub final_amount: Money,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    #[serde(default)]
    pub memo: Option<String>,
}

// =============================================================================
// Expense
// =============================================================================

/// A recorded business expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Expense {
    pub id: i64,
    /// Free-form category ("재료비", "임대료", ...).
    pub category: String,
    pub amount: Money,
    #[ts(as = "String")]
    pub expense_date: NaiveDate,
    #[serde(default)]
    pub memo: Option<String>,
}

/// Payload for recording an expense (`POST /expense`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewExpense {
    pub category: String,
    pub amount: Money,
    #[ts(as = "String")]
    pub expense_date: NaiveDate,
    pub memo: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
