//! Shared fixtures for the gateway integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use salon_client::{
    ClientConfig, ErrorKind, Gateway, LoadingIndicator, MemoryTokenStore, Notice, Notifier,
    SessionOwner, TokenPair, TokenStore,
};

/// Records everything the gateway tells the host.
#[derive(Default)]
pub struct TestHost {
    pub logouts: AtomicUsize,
    pub notices: Mutex<Vec<Notice>>,
    pub loading: Mutex<Vec<bool>>,
}

impl TestHost {
    pub fn logout_count(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }

    pub fn notice_kinds(&self) -> Vec<ErrorKind> {
        self.notices.lock().unwrap().iter().map(|n| n.kind).collect()
    }

    /// Every request turned the spinner on and back off.
    pub fn loading_balanced(&self) -> bool {
        let events = self.loading.lock().unwrap();
        let on = events.iter().filter(|v| **v).count();
        on > 0 && on * 2 == events.len() && events.last() == Some(&false)
    }
}

#[async_trait]
impl SessionOwner for TestHost {
    async fn on_forced_logout(&self) {
        self.logouts.fetch_add(1, Ordering::SeqCst);
    }
}

impl Notifier for TestHost {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

impl LoadingIndicator for TestHost {
    fn set_loading(&self, loading: bool) {
        self.loading.lock().unwrap().push(loading);
    }
}

/// A signed JWT expiring `days` from now. The client never checks the
/// signature.
pub fn jwt_expiring_in(subject: &str, days: i64) -> String {
    let claims = json!({
        "sub": subject,
        "exp": (Utc::now() + Duration::days(days)).timestamp(),
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-secret")).unwrap()
}

pub struct Fixture {
    pub gateway: Gateway,
    pub store: Arc<MemoryTokenStore>,
    pub host: Arc<TestHost>,
}

impl Fixture {
    pub async fn tokens(&self) -> Option<TokenPair> {
        self.store.tokens().await.unwrap()
    }
}

/// Gateway against `base_url` with an optional existing session.
pub fn fixture(base_url: &str, tokens: Option<TokenPair>) -> Fixture {
    let store = Arc::new(match tokens {
        Some(tokens) => MemoryTokenStore::with_tokens(tokens),
        None => MemoryTokenStore::new(),
    });
    let host = Arc::new(TestHost::default());

    let gateway = Gateway::builder(ClientConfig::with_base_url(base_url), store.clone())
        .session_owner(host.clone())
        .notifier(host.clone())
        .loading_indicator(host.clone())
        .build()
        .unwrap();

    Fixture { gateway, store, host }
}

pub fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "success": true, "data": data, "message": "OK", "code": "200" })
}

pub fn customers_json() -> serde_json::Value {
    json!([
        { "id": 1, "name": "김민지", "phone": "010-1234-5678", "points": 3000, "coupons": [] },
        { "id": 2, "name": "이서연", "phone": "010-9876-5432", "points": 0, "coupons": [] }
    ])
}
