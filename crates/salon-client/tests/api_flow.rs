//! Typed endpoint wrappers against a mock backend.

mod common;

use chrono::NaiveDate;
use httpmock::prelude::*;
use serde_json::json;

use common::{envelope, fixture, jwt_expiring_in};
use salon_client::{ClientError, SalonApi, TokenPair};
use salon_core::sale::SaleDraft;
use salon_core::{
    DiscountType, Money, NewCoupon, NewCustomer, NewExpense, PaymentMethod, ServiceLineItem,
};

fn logged_in(server: &MockServer) -> (common::Fixture, SalonApi) {
    let fx = fixture(
        &server.base_url(),
        Some(TokenPair::new("access", jwt_expiring_in("owner", 30))),
    );
    let api = SalonApi::new(fx.gateway.clone());
    (fx, api)
}

#[tokio::test]
async fn test_register_sale_from_draft() {
    let server = MockServer::start();

    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/sales")
            .header("authorization", "Bearer access")
            .json_body(json!({
                "customerId": null,
                "services": [
                    { "id": 1, "name": "커트", "unitPrice": 20000 },
                    { "id": 2, "name": "염색", "unitPrice": 80000 }
                ],
                "couponId": null,
                "usedPoints": 0,
                "paymentMethod": "cash",
                "subtotal": 100000,
                "discount": 0,
                "finalAmount": 100000,
                "saleDate": "2024-01-01",
                "memo": null
            }));
        then.status(201).json_body(envelope(json!({
            "id": 99,
            "services": [],
            "paymentMethod": "cash",
            "subtotal": 100000,
            "finalAmount": 100000,
            "saleDate": "2024-01-01"
        })));
    });

    let (_fx, api) = logged_in(&server);

    let mut draft = SaleDraft::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    draft.add_service(ServiceLineItem::new(1, "커트", 20_000)).unwrap();
    draft.add_service(ServiceLineItem::new(2, "염색", 80_000)).unwrap();
    let payload = draft.finalize(PaymentMethod::Cash).unwrap();

    let sale = api.sales.create(&payload).await.unwrap();
    assert_eq!(sale.id, 99);
    assert_eq!(sale.final_amount, Money::from_won(100_000));
    create.assert_calls(1);
}

#[tokio::test]
async fn test_delete_accepts_empty_envelope() {
    let server = MockServer::start();

    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/customer/5");
        then.status(200).json_body(json!({ "success": true, "data": null }));
    });
    let delete_sale = server.mock(|when, then| {
        when.method(DELETE).path("/sales/9");
        then.status(204);
    });

    let (_fx, api) = logged_in(&server);

    api.customers.delete(5).await.unwrap();
    api.sales.delete(9).await.unwrap();
    delete.assert_calls(1);
    delete_sale.assert_calls(1);
}

#[tokio::test]
async fn test_invalid_payloads_are_never_sent() {
    let server = MockServer::start();

    let any = server.mock(|when, then| {
        when.any_request();
        then.status(200).json_body(envelope(json!({})));
    });

    let (fx, api) = logged_in(&server);

    let bad_customer = NewCustomer {
        name: "김민지".into(),
        phone: "123".into(),
        memo: None,
    };
    assert!(matches!(
        api.customers.create(&bad_customer).await,
        Err(ClientError::Validation(_))
    ));

    let bad_expense = NewExpense {
        category: "재료비".into(),
        amount: Money::zero(),
        expense_date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        memo: None,
    };
    assert!(api.expenses.create(&bad_expense).await.is_err());
    assert!(api.expenses.by_month(2024, 13).await.is_err());

    let bad_coupon = NewCoupon {
        customer_id: 1,
        name: "할인".into(),
        discount_type: DiscountType::Percent,
        discount_value: 150,
        expiry_date: None,
    };
    assert!(api.coupons.issue(&bad_coupon).await.is_err());

    assert_eq!(any.calls(), 0);
    assert!(fx.host.notices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_expenses_and_coupons_queries() {
    let server = MockServer::start();

    let expenses = server.mock(|when, then| {
        when.method(GET)
            .path("/expense")
            .query_param("year", "2024")
            .query_param("month", "1");
        then.status(200).json_body(envelope(json!([
            { "id": 1, "category": "재료비", "amount": 30000, "expenseDate": "2024-01-03" },
            { "id": 2, "category": "임대료", "amount": 1000000, "expenseDate": "2024-01-05" }
        ])));
    });
    let coupons = server.mock(|when, then| {
        when.method(GET)
            .path("/benefit/coupon")
            .query_param("customerId", "1");
        then.status(200).json_body(envelope(json!([
            { "id": 7, "name": "첫 방문 10%", "discountType": "percent", "discountValue": 10 }
        ])));
    });

    let (_fx, api) = logged_in(&server);

    let list = api.expenses.by_month(2024, 1).await.unwrap();
    let summary = salon_core::expense::summarize_by_category(&list);
    assert_eq!(summary[0].category, "임대료");

    let customer_coupons = api.coupons.for_customer(1).await.unwrap();
    assert_eq!(customer_coupons[0].discount_type, DiscountType::Percent);

    expenses.assert_calls(1);
    coupons.assert_calls(1);
}

#[tokio::test]
async fn test_logout_clears_session_but_keeps_remembered_id() {
    let server = MockServer::start();
    let (fx, api) = logged_in(&server);
    fx.gateway
        .store()
        .remember_login_id(Some("owner"))
        .await
        .unwrap();

    api.auth.logout().await.unwrap();

    assert!(!api.auth.is_logged_in().await.unwrap());
    assert!(api.auth.current_user().await.unwrap().is_none());
    assert_eq!(api.auth.remembered_login_id().await.unwrap().as_deref(), Some("owner"));
    // Voluntary logout is not a forced one.
    assert_eq!(fx.host.logout_count(), 0);
}
