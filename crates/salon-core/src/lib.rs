//! # salon-core: Pure Business Logic for Salon POS
//!
//! This crate holds the business logic of the salon point-of-sale app as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Salon POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile UI (screens)                          │   │
//! │  │   Home ──► Sale registration ──► Expenses ──► Customers/Coupons │   │
//! │  └───────────────┬──────────────────────────────────┬──────────────┘   │
//! │                  │ live summary                     │ submit           │
//! │  ┌───────────────▼──────────────────┐  ┌────────────▼──────────────┐   │
//! │  │   ★ salon-core (THIS CRATE) ★    │  │  salon-client             │   │
//! │  │                                  │  │  AuthenticatedRequest-    │   │
//! │  │  pricing   sale   expense        │◄─│  Gateway, typed APIs      │   │
//! │  │  money     types  schedule       │  │                           │   │
//! │  │  validation                      │  │  REST ──► backend         │   │
//! │  │                                  │  └───────────────────────────┘   │
//! │  │  NO I/O • NO NETWORK • PURE      │                                  │
//! │  └──────────────────────────────────┘                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer won amounts
//! - [`types`] - Domain types (Customer, Coupon, Sale, Expense, ...)
//! - [`pricing`] - The sale-total / discount computation
//! - [`sale`] - Sale registration draft
//! - [`expense`] - Expense chart aggregation
//! - [`schedule`] - Home dashboard schedule list
//! - [`validation`] - Form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use salon_core::sale::SaleDraft;
//! use salon_core::types::{PaymentMethod, ServiceLineItem};
//!
//! let mut draft = SaleDraft::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
//! draft.add_service(ServiceLineItem::new(1, "커트", 20_000)).unwrap();
//!
//! assert_eq!(draft.summary().final_amount.won(), 20_000);
//! let payload = draft.finalize(PaymentMethod::Card).unwrap();
//! assert_eq!(payload.final_amount.won(), 20_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod expense;
pub mod money;
pub mod pricing;
pub mod sale;
pub mod schedule;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{PricingEngine, PricingInput, PricingResult};
pub use sale::SaleDraft;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum services selectable in a single sale.
pub const MAX_LINE_ITEMS: usize = 50;
