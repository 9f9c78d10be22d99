//! # Authenticated Request Gateway
//!
//! Every backend call goes through [`Gateway`]. It attaches the access
//! token, keeps the session alive across token expiry and turns failures
//! into notifications.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gateway Request Flow                             │
//! │                                                                         │
//! │  send(req)                                                              │
//! │    │  LoadingGuard (spinner on, off on every exit)                     │
//! │    ▼                                                                    │
//! │  refresh token exp within 3 days? ──yes──► POST .../refresh-token-     │
//! │    │ no                                     renewal ──fail──► LOGOUT   │
//! │    ▼                                                                    │
//! │  Authorization: Bearer <access> ──► backend                            │
//! │    │                                                                    │
//! │    ├── 2xx ───────────► unwrap envelope ──► caller                     │
//! │    ├── 401, first try ─► RefreshCoordinator                            │
//! │    │                      leader: POST /auth/user/refresh-token        │
//! │    │                      waiter: queue until leader settles           │
//! │    │                      ──ok──► replay once (retried = true)         │
//! │    │                      ──fail─► LOGOUT                              │
//! │    ├── 401, retried ───► Unauthorized (no second refresh)              │
//! │    ├── 403 ────────────► LOGOUT, Forbidden                             │
//! │    └── other / none ───► Status / Network, notified, never retried     │
//! │                                                                         │
//! │  LOGOUT = clear tokens + user info, "session expired" notice,          │
//! │           SessionOwner::on_forced_logout()                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use reqwest::{Method, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, warn, Instrument};
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::envelope::{error_message, ApiEnvelope};
use crate::error::{AuthFailure, ClientError, ClientResult};
use crate::refresh::{RefreshCoordinator, RefreshTicket};
use crate::session::{LoadingGuard, LoadingIndicator, NoopHost, Notice, Notifier, SessionOwner};
use crate::store::TokenStore;
use crate::token::{expires_within, TokenPair};

pub const REFRESH_TOKEN_PATH: &str = "/auth/user/refresh-token";
pub const REFRESH_RENEWAL_PATH: &str = "/auth/user/refresh-token-renewal";

// =============================================================================
// Request
// =============================================================================

/// One backend call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path appended to the base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Set on the replay after a refresh; a retried request never refreshes
    /// again.
    pub retried: bool,
    /// `false` for calls made before a session exists (login).
    pub authenticated: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            retried: false,
            authenticated: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

// =============================================================================
// Token Exchange Payloads
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshTokenRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenewedRefreshToken {
    refresh_token: String,
}

// Token endpoints answer either enveloped or bare.
fn decode_token_payload<T: DeserializeOwned>(body: &str) -> Result<T, AuthFailure> {
    if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<T>>(body) {
        if !envelope.success {
            return Err(AuthFailure::new(
                None,
                envelope.message.unwrap_or_else(|| "token exchange rejected".to_string()),
            ));
        }
        if let Some(data) = envelope.data {
            return Ok(data);
        }
    }
    serde_json::from_str::<T>(body)
        .map_err(|e| AuthFailure::new(None, format!("invalid token response: {}", e)))
}

// =============================================================================
// Gateway
// =============================================================================

struct GatewayInner {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    session: Arc<dyn SessionOwner>,
    notifier: Arc<dyn Notifier>,
    loading: Arc<dyn LoadingIndicator>,
    refresh: RefreshCoordinator,
    // Serializes proactive renewal.
    renewal: tokio::sync::Mutex<()>,
    // Held while session state is written and the generation checked.
    session_lock: tokio::sync::Mutex<()>,
    renewal_window: chrono::Duration,
}

/// The single entry point for backend calls. Cheap to clone.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.inner.base_url)
            .field("refreshing", &self.inner.refresh.is_refreshing())
            .finish()
    }
}

/// Builder for [`Gateway`]. Host seams default to no-ops.
pub struct GatewayBuilder {
    config: ClientConfig,
    store: Arc<dyn TokenStore>,
    session: Arc<dyn SessionOwner>,
    notifier: Arc<dyn Notifier>,
    loading: Arc<dyn LoadingIndicator>,
    http: Option<reqwest::Client>,
}

impl GatewayBuilder {
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Self {
        GatewayBuilder {
            config,
            store,
            session: Arc::new(NoopHost),
            notifier: Arc::new(NoopHost),
            loading: Arc::new(NoopHost),
            http: None,
        }
    }

    pub fn session_owner(mut self, session: Arc<dyn SessionOwner>) -> Self {
        self.session = session;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn loading_indicator(mut self, loading: Arc<dyn LoadingIndicator>) -> Self {
        self.loading = loading;
        self
    }

    /// Uses a preconfigured HTTP client instead of one built from the config.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> ClientResult<Gateway> {
        self.config.validate()?;

        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .timeout(self.config.timeout())
                .connect_timeout(self.config.connect_timeout())
                .build()?,
        };

        info!(base_url = %self.config.base_url, "Gateway ready");

        Ok(Gateway {
            inner: Arc::new(GatewayInner {
                http,
                base_url: self.config.base_url.trim_end_matches('/').to_string(),
                store: self.store,
                session: self.session,
                notifier: self.notifier,
                loading: self.loading,
                refresh: RefreshCoordinator::new(),
                renewal: tokio::sync::Mutex::new(()),
                session_lock: tokio::sync::Mutex::new(()),
                renewal_window: self.config.renewal_window(),
            }),
        })
    }
}

impl Gateway {
    pub fn builder(config: ClientConfig, store: Arc<dyn TokenStore>) -> GatewayBuilder {
        GatewayBuilder::new(config, store)
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    pub fn refresh_coordinator(&self) -> &RefreshCoordinator {
        &self.inner.refresh
    }

    // =========================================================================
    // Public Send API
    // =========================================================================

    /// Sends a request and returns the envelope's `data`.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        self.run(request, |body| {
            serde_json::from_str::<ApiEnvelope<T>>(&body)
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?
                .into_data()
        })
        .await
    }

    /// Sends a request whose response carries no payload worth decoding.
    pub async fn send_empty(&self, request: ApiRequest) -> ClientResult<()> {
        self.run(request, |body| {
            if body.trim().is_empty() {
                return Ok(());
            }
            serde_json::from_str::<ApiEnvelope<IgnoredAny>>(&body)
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?
                .into_unit()
        })
        .await
    }

    async fn run<T, F>(&self, request: ApiRequest, decode: F) -> ClientResult<T>
    where
        F: FnOnce(String) -> ClientResult<T>,
    {
        let span = info_span!(
            "api_request",
            request_id = %Uuid::new_v4(),
            method = %request.method,
            path = %request.path,
        );

        async move {
            let _loading = LoadingGuard::new(self.inner.loading.clone());
            let result = self.execute(request).await.and_then(decode);
            if let Err(err) = &result {
                self.report(err);
            }
            result
        }
        .instrument(span)
        .await
    }

    // =========================================================================
    // Session State
    // =========================================================================

    /// Stores a freshly issued session (after login).
    pub async fn start_session(
        &self,
        tokens: &TokenPair,
        user_info: Option<&serde_json::Value>,
    ) -> ClientResult<()> {
        let _session = self.inner.session_lock.lock().await;
        self.inner.store.save_tokens(tokens).await?;
        match user_info {
            Some(info) => self.inner.store.save_user_info(info).await?,
            None => self.inner.store.clear_user_info().await?,
        }
        self.inner.refresh.reset();
        info!("Session started");
        Ok(())
    }

    /// Clears the local session without contacting the backend.
    pub async fn logout(&self) -> ClientResult<()> {
        let _session = self.inner.session_lock.lock().await;
        self.inner.store.clear_tokens().await?;
        self.inner.store.clear_user_info().await?;
        self.inner.refresh.reset();
        info!("Logged out");
        Ok(())
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    async fn execute(&self, mut request: ApiRequest) -> ClientResult<String> {
        // Session this request was issued under.
        let generation = self.inner.refresh.generation();

        if request.authenticated {
            self.renew_if_needed(generation).await?;
        }

        let mut token = if request.authenticated {
            self.inner.store.access_token().await?
        } else {
            None
        };

        loop {
            let response = self.dispatch(&request, token.as_deref()).await?;
            let status = response.status();

            if status.is_success() {
                debug!(status = status.as_u16(), "Request succeeded");
                return Ok(response.text().await?);
            }

            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body).unwrap_or_else(|| {
                status.canonical_reason().unwrap_or_default().to_string()
            });
            warn!(status = status.as_u16(), retried = request.retried, %message, "Request failed");

            match status {
                StatusCode::UNAUTHORIZED
                    if request.authenticated && !request.retried && token.is_some() =>
                {
                    token = Some(self.recover_access_token(token.as_deref(), generation).await?);
                    request.retried = true;
                }
                StatusCode::UNAUTHORIZED => return Err(ClientError::Unauthorized(message)),
                StatusCode::FORBIDDEN if request.authenticated => {
                    self.force_logout("forbidden", generation).await;
                    return Err(ClientError::Forbidden(message));
                }
                StatusCode::FORBIDDEN => return Err(ClientError::Forbidden(message)),
                _ => {
                    return Err(ClientError::Status {
                        status: status.as_u16(),
                        message,
                    })
                }
            }
        }
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> ClientResult<reqwest::Response> {
        let url = self.url(&request.path)?;
        let mut builder = self.inner.http.request(request.method.clone(), url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(retried = request.retried, has_token = token.is_some(), "Sending request");
        Ok(builder.send().await?)
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(Url::parse(&format!("{}{}", self.inner.base_url, path))?)
    }

    /// Obtains a usable access token after a 401 on `used`.
    async fn recover_access_token(&self, used: Option<&str>, generation: u64) -> ClientResult<String> {
        // Another request may already have rotated the token.
        let current = self.inner.store.access_token().await?;
        if let Some(current) = &current {
            if Some(current.as_str()) != used {
                debug!("Access token already rotated; replaying");
                return Ok(current.clone());
            }
        }

        // The session was torn down while this request was in flight, and
        // the user was already sent to login.
        if current.is_none() || self.inner.refresh.generation() != generation {
            debug!("Session ended while request was in flight");
            return Err(ClientError::SessionExpired(AuthFailure::new(
                None,
                "session already ended",
            )));
        }

        match self.inner.refresh.acquire(used) {
            RefreshTicket::Fresh(token) => {
                debug!("Refresh already completed; replaying");
                Ok(token)
            }
            RefreshTicket::Waiter(rx) => match rx.await {
                Ok(Ok(token)) => Ok(token),
                Ok(Err(failure)) => Err(ClientError::SessionExpired(failure)),
                Err(_) => Err(ClientError::SessionExpired(AuthFailure::new(
                    None,
                    "token refresh was abandoned",
                ))),
            },
            RefreshTicket::Leader(guard) => {
                info!("Access token expired; refreshing");
                let leader_generation = guard.generation();
                let exchanged = match self.exchange_refresh_token().await {
                    Ok(tokens) => match self.commit_tokens(&tokens, leader_generation).await {
                        Ok(()) => Ok(tokens),
                        Err(failure) => Err(failure),
                    },
                    Err(failure) => Err(failure),
                };

                match exchanged {
                    Ok(tokens) => {
                        info!("Token refresh succeeded");
                        guard.settle(Ok(tokens.access_token.clone()));
                        Ok(tokens.access_token)
                    }
                    Err(failure) => {
                        error!(%failure, "Token refresh failed");
                        guard.settle(Err(failure.clone()));
                        self.force_logout("refresh failed", leader_generation).await;
                        Err(ClientError::SessionExpired(failure))
                    }
                }
            }
        }
    }

    /// Saves refreshed tokens unless their session has ended meanwhile.
    async fn commit_tokens(&self, tokens: &TokenPair, generation: u64) -> Result<(), AuthFailure> {
        let _session = self.inner.session_lock.lock().await;
        if self.inner.refresh.generation() != generation {
            warn!("Session ended during token refresh; discarding new tokens");
            return Err(AuthFailure::new(None, "session ended during token refresh"));
        }
        self.inner
            .store
            .save_tokens(tokens)
            .await
            .map_err(|e| AuthFailure::new(None, e.to_string()))
    }

    async fn exchange_refresh_token(&self) -> Result<TokenPair, AuthFailure> {
        let refresh_token = self.stored_refresh_token().await?;
        let body = self.post_token_endpoint(REFRESH_TOKEN_PATH, &refresh_token).await?;
        decode_token_payload::<TokenPair>(&body)
    }

    async fn stored_refresh_token(&self) -> Result<String, AuthFailure> {
        match self.inner.store.tokens().await {
            Ok(Some(tokens)) => Ok(tokens.refresh_token),
            Ok(None) => Err(AuthFailure::new(None, "no refresh token stored")),
            Err(e) => Err(AuthFailure::new(None, e.to_string())),
        }
    }

    async fn post_token_endpoint(&self, path: &str, refresh_token: &str) -> Result<String, AuthFailure> {
        let url = self
            .url(path)
            .map_err(|e| AuthFailure::new(None, e.to_string()))?;

        let response = self
            .inner
            .http
            .post(url)
            .json(&RefreshTokenRequest { refresh_token })
            .send()
            .await
            .map_err(|e| AuthFailure::new(None, e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| "token exchange rejected".to_string());
            return Err(AuthFailure::new(Some(status.as_u16()), message));
        }
        Ok(body)
    }

    /// Renews the refresh token before sending if it is close to expiry.
    async fn renew_if_needed(&self, generation: u64) -> ClientResult<()> {
        if !self.refresh_token_expiring().await? {
            return Ok(());
        }

        let _renewal = self.inner.renewal.lock().await;
        if self.inner.refresh.generation() != generation {
            return Err(ClientError::SessionExpired(AuthFailure::new(
                None,
                "session already ended",
            )));
        }
        // Another request may have renewed while we waited.
        if !self.refresh_token_expiring().await? {
            return Ok(());
        }

        info!("Refresh token near expiry; renewing");
        let renewed = match self.stored_refresh_token().await {
            Ok(current) => match self.post_token_endpoint(REFRESH_RENEWAL_PATH, &current).await {
                Ok(body) => decode_token_payload::<RenewedRefreshToken>(&body),
                Err(failure) => Err(failure),
            },
            Err(failure) => Err(failure),
        };

        match renewed {
            Ok(renewed) => {
                let _session = self.inner.session_lock.lock().await;
                if self.inner.refresh.generation() != generation {
                    warn!("Session ended during renewal; discarding renewed token");
                    return Err(ClientError::SessionExpired(AuthFailure::new(
                        None,
                        "session ended during renewal",
                    )));
                }
                self.inner.store.save_refresh_token(&renewed.refresh_token).await?;
                info!("Refresh token renewed");
                Ok(())
            }
            Err(failure) => {
                error!(%failure, "Refresh token renewal failed");
                self.force_logout("renewal failed", generation).await;
                Err(ClientError::SessionExpired(failure))
            }
        }
    }

    async fn refresh_token_expiring(&self) -> ClientResult<bool> {
        let Some(tokens) = self.inner.store.tokens().await? else {
            return Ok(false);
        };
        Ok(expires_within(&tokens.refresh_token, self.inner.renewal_window, Utc::now()) == Some(true))
    }

    /// Tears the session down and sends the user back to login. A session
    /// that already ended is left alone, so the user is sent back once.
    async fn force_logout(&self, reason: &str, generation: u64) {
        {
            let _session = self.inner.session_lock.lock().await;
            if self.inner.refresh.generation() != generation {
                debug!(reason, "Session already ended; skipping forced logout");
                return;
            }
            warn!(reason, "Forcing logout");
            self.inner.refresh.reset();

            if let Err(e) = self.inner.store.clear_tokens().await {
                error!(error = %e, "Failed to clear tokens during forced logout");
            }
            if let Err(e) = self.inner.store.clear_user_info().await {
                error!(error = %e, "Failed to clear user info during forced logout");
            }
        }

        self.inner.notifier.notify(&Notice::session_expired());
        self.inner.session.on_forced_logout().await;
    }

    /// Notifies the host of a failure. Session expiry was already announced
    /// by the forced logout.
    fn report(&self, err: &ClientError) {
        if matches!(err, ClientError::SessionExpired(_)) {
            return;
        }
        self.inner
            .notifier
            .notify(&Notice::new(err.kind(), err.user_message()));
    }
}
