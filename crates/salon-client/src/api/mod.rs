//! # Typed Endpoints
//!
//! One wrapper per screen area. Payloads are validated locally before they
//! are sent; everything else is the gateway's job.

pub mod auth;
pub mod coupon;
pub mod customer;
pub mod expense;
pub mod sales;

pub use auth::{AuthApi, LoginResponse, UserInfo};
pub use coupon::CouponApi;
pub use customer::CustomerApi;
pub use expense::ExpenseApi;
pub use sales::SalesApi;

use crate::gateway::Gateway;

/// All endpoint groups over one shared gateway.
#[derive(Debug, Clone)]
pub struct SalonApi {
    pub auth: AuthApi,
    pub customers: CustomerApi,
    pub sales: SalesApi,
    pub expenses: ExpenseApi,
    pub coupons: CouponApi,
}

impl SalonApi {
    pub fn new(gateway: Gateway) -> Self {
        SalonApi {
            auth: AuthApi::new(gateway.clone()),
            customers: CustomerApi::new(gateway.clone()),
            sales: SalesApi::new(gateway.clone()),
            expenses: ExpenseApi::new(gateway.clone()),
            coupons: CouponApi::new(gateway),
        }
    }
}
