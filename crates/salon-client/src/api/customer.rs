//! Customer management (`/customer`).

use salon_core::validation::validate_new_customer;
use salon_core::{Customer, NewCustomer};

use crate::error::ClientResult;
use crate::gateway::{ApiRequest, Gateway};

#[derive(Debug, Clone)]
pub struct CustomerApi {
    gateway: Gateway,
}

impl CustomerApi {
    pub fn new(gateway: Gateway) -> Self {
        CustomerApi { gateway }
    }

    pub async fn all(&self) -> ClientResult<Vec<Customer>> {
        self.gateway.send(ApiRequest::get("/customer/all")).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Customer> {
        self.gateway.send(ApiRequest::get(format!("/customer/{}", id))).await
    }

    /// Searches by name or phone. A blank keyword lists everyone.
    pub async fn search(&self, keyword: &str) -> ClientResult<Vec<Customer>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return self.all().await;
        }
        self.gateway
            .send(ApiRequest::get("/customer/search").query("keyword", keyword))
            .await
    }

    pub async fn create(&self, customer: &NewCustomer) -> ClientResult<Customer> {
        validate_new_customer(customer)?;
        self.gateway
            .send(ApiRequest::post("/customer").json(customer)?)
            .await
    }

    pub async fn update(&self, id: i64, customer: &NewCustomer) -> ClientResult<Customer> {
        validate_new_customer(customer)?;
        self.gateway
            .send(ApiRequest::put(format!("/customer/{}", id)).json(customer)?)
            .await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.gateway
            .send_empty(ApiRequest::delete(format!("/customer/{}", id)))
            .await
    }
}
