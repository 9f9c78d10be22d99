//! Sales (`/sales`).

use chrono::NaiveDate;

use salon_core::validation::validate_price;
use salon_core::{CoreError, NewSale, Sale};

use crate::error::ClientResult;
use crate::gateway::{ApiRequest, Gateway};

#[derive(Debug, Clone)]
pub struct SalesApi {
    gateway: Gateway,
}

impl SalesApi {
    pub fn new(gateway: Gateway) -> Self {
        SalesApi { gateway }
    }

    /// Sales registered on `date` (`GET /sales?date=YYYY-MM-DD`).
    pub async fn by_date(&self, date: NaiveDate) -> ClientResult<Vec<Sale>> {
        self.gateway
            .send(ApiRequest::get("/sales").query("date", date.format("%Y-%m-%d")))
            .await
    }

    /// Registers a sale built by `SaleDraft::finalize`.
    pub async fn create(&self, sale: &NewSale) -> ClientResult<Sale> {
        check_sale(sale)?;
        self.gateway.send(ApiRequest::post("/sales").json(sale)?).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.gateway
            .send_empty(ApiRequest::delete(format!("/sales/{}", id)))
            .await
    }
}

fn check_sale(sale: &NewSale) -> Result<(), CoreError> {
    if sale.services.is_empty() {
        return Err(CoreError::EmptySale);
    }
    for service in &sale.services {
        validate_price(service.unit_price.won())?;
    }
    validate_price(sale.final_amount.won())?;
    Ok(())
}
