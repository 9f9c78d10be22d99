//! Expenses (`/expense`).

use salon_core::validation::validate_new_expense;
use salon_core::{Expense, NewExpense, ValidationError};

use crate::error::ClientResult;
use crate::gateway::{ApiRequest, Gateway};

#[derive(Debug, Clone)]
pub struct ExpenseApi {
    gateway: Gateway,
}

impl ExpenseApi {
    pub fn new(gateway: Gateway) -> Self {
        ExpenseApi { gateway }
    }

    /// Expenses for one calendar month.
    pub async fn by_month(&self, year: i32, month: u32) -> ClientResult<Vec<Expense>> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::OutOfRange {
                field: "month".to_string(),
                min: 1,
                max: 12,
            }
            .into());
        }
        self.gateway
            .send(
                ApiRequest::get("/expense")
                    .query("year", year)
                    .query("month", month),
            )
            .await
    }

    pub async fn create(&self, expense: &NewExpense) -> ClientResult<Expense> {
        validate_new_expense(expense)?;
        self.gateway.send(ApiRequest::post("/expense").json(expense)?).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.gateway
            .send_empty(ApiRequest::delete(format!("/expense/{}", id)))
            .await
    }
}
