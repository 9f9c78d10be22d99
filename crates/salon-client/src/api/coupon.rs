//! Coupons (`/benefit/coupon`).

use salon_core::validation::validate_new_coupon;
use salon_core::{Coupon, NewCoupon};

use crate::error::ClientResult;
use crate::gateway::{ApiRequest, Gateway};

#[derive(Debug, Clone)]
pub struct CouponApi {
    gateway: Gateway,
}

impl CouponApi {
    pub fn new(gateway: Gateway) -> Self {
        CouponApi { gateway }
    }

    pub async fn for_customer(&self, customer_id: i64) -> ClientResult<Vec<Coupon>> {
        self.gateway
            .send(ApiRequest::get("/benefit/coupon").query("customerId", customer_id))
            .await
    }

    pub async fn issue(&self, coupon: &NewCoupon) -> ClientResult<Coupon> {
        validate_new_coupon(coupon)?;
        self.gateway
            .send(ApiRequest::post("/benefit/coupon").json(coupon)?)
            .await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.gateway
            .send_empty(ApiRequest::delete(format!("/benefit/coupon/{}", id)))
            .await
    }
}
