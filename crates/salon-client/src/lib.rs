//! # salon-client: Authenticated REST Client for Salon POS
//!
//! Every backend call the app makes goes through this crate. It owns the
//! session (token pair, cached user info), keeps it alive across token
//! expiry, and turns failures into user-facing notifications.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        salon-client Architecture                        │
//! │                                                                         │
//! │   screens                                                               │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  api::{AuthApi, CustomerApi, SalesApi, ExpenseApi, CouponApi}   │   │
//! │  │  validate payloads with salon-core, then call the gateway       │   │
//! │  └──────────────────────────────┬──────────────────────────────────┘   │
//! │                                 ▼                                       │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Gateway                                                        │   │
//! │  │  proactive renewal • bearer token • 401 refresh (single-flight) │   │
//! │  │  403 forced logout • envelope decoding • notifications          │   │
//! │  └───────┬──────────────────┬───────────────────────┬──────────────┘   │
//! │          ▼                  ▼                       ▼                   │
//! │   RefreshCoordinator    TokenStore        SessionOwner / Notifier /    │
//! │   (leader + FIFO        (file, memory)     LoadingIndicator             │
//! │    waiters)                               (host app)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use salon_client::{ClientConfig, FileTokenStore, Gateway, SalonApi};
//!
//! # async fn run() -> salon_client::ClientResult<()> {
//! let config = ClientConfig::load(None)?;
//! let store = Arc::new(FileTokenStore::from_config(&config)?);
//! let gateway = Gateway::builder(config, store).build()?;
//! let api = SalonApi::new(gateway);
//!
//! api.auth.login("owner", "secret", true).await?;
//! let customers = api.customers.all().await?;
//! println!("{} customers", customers.len());
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod refresh;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod token;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use api::SalonApi;
pub use config::ClientConfig;
pub use envelope::ApiEnvelope;
pub use error::{AuthFailure, ClientError, ClientResult, ErrorKind};
pub use gateway::{ApiRequest, Gateway, GatewayBuilder};
pub use refresh::{RefreshCoordinator, RefreshTicket};
pub use session::{LoadingGuard, LoadingIndicator, NoopHost, Notice, Notifier, SessionOwner};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::TokenPair;
