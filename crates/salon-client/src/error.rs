//! # Client Error Types
//!
//! Error types for everything that talks to the backend.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Auth expiry    │  │  Authorization  │  │  Client / validation    │ │
//! │  │  (401)          │  │  (403)          │  │  (400/404/409/422)      │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  refresh once,  │  │  fatal: forced  │  │  message, no retry,     │ │
//! │  │  then fail      │  │  logout         │  │  no state change        │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Server/network │  │ Refresh failure │  │  Local                  │ │
//! │  │  (5xx / none)   │  │                 │  │                         │ │
//! │  │  message, no    │  │  fatal: forced  │  │  config, token store,   │ │
//! │  │  retry          │  │  logout, all    │  │  validation, decoding   │ │
//! │  │                 │  │  waiters reject │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use salon_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Why a token exchange failed.
///
/// Cloneable so one refresh failure can be handed to every queued waiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    /// HTTP status of the exchange, `None` if no response was received.
    pub status: Option<u16>,
    pub message: String,
}

impl AuthFailure {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        AuthFailure {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Client error type covering every failure a caller can see.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Auth
    // =========================================================================
    /// 401 that survived the single refresh-and-retry, or a 401 on an
    /// unauthenticated call such as login.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 403. The session has been torn down.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Token refresh or refresh-token renewal failed; the session has been
    /// torn down.
    #[error("Session expired: {0}")]
    SessionExpired(AuthFailure),

    // =========================================================================
    // Backend
    // =========================================================================
    /// Any other non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The backend answered 2xx but the envelope says `success: false`.
    #[error("Request rejected ({code}): {message}")]
    Rejected { code: String, message: String },

    /// No response was received (connect failure, timeout, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // =========================================================================
    // Local
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid base URL or path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Reading or writing the token store failed.
    #[error("Token store error: {0}")]
    Store(String),

    /// Failed to serialize a request or stored value.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Form input rejected before sending.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Business rule violated before sending.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else if err.is_builder() {
            ClientError::InvalidUrl(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Store(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::InvalidConfig(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

// =============================================================================
// Classification
// =============================================================================

/// User-facing failure category, one per fixed notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Unprocessable,
    Server,
    Network,
    SessionExpired,
    Rejected,
    Local,
}

impl ErrorKind {
    /// Maps an HTTP status to its category.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::BadRequest,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            422 => ErrorKind::Unprocessable,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::BadRequest,
        }
    }

    /// The fixed notification text for this category.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "잘못된 요청입니다. 입력 내용을 확인해 주세요.",
            ErrorKind::Unauthorized => "인증에 실패했습니다. 다시 로그인해 주세요.",
            ErrorKind::Forbidden => "접근 권한이 없습니다.",
            ErrorKind::NotFound => "요청한 정보를 찾을 수 없습니다.",
            ErrorKind::Conflict => "이미 처리되었거나 중복된 요청입니다.",
            ErrorKind::Unprocessable => "처리할 수 없는 요청입니다. 입력 내용을 확인해 주세요.",
            ErrorKind::Server => "서버에 문제가 발생했습니다. 잠시 후 다시 시도해 주세요.",
            ErrorKind::Network => "네트워크 연결을 확인해 주세요.",
            ErrorKind::SessionExpired => "세션이 만료되었습니다. 다시 로그인해 주세요.",
            ErrorKind::Rejected => "요청을 처리하지 못했습니다.",
            ErrorKind::Local => "요청을 보낼 수 없습니다.",
        }
    }
}

impl ClientError {
    /// Category used to pick the notification message.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Unauthorized(_) => ErrorKind::Unauthorized,
            ClientError::Forbidden(_) => ErrorKind::Forbidden,
            ClientError::SessionExpired(_) => ErrorKind::SessionExpired,
            ClientError::Status { status, .. } => ErrorKind::from_status(*status),
            ClientError::Rejected { .. } => ErrorKind::Rejected,
            ClientError::Network(_) => ErrorKind::Network,
            ClientError::InvalidResponse(_) => ErrorKind::Server,
            ClientError::InvalidConfig(_)
            | ClientError::InvalidUrl(_)
            | ClientError::Store(_)
            | ClientError::Serialization(_)
            | ClientError::Validation(_)
            | ClientError::Core(_) => ErrorKind::Local,
        }
    }

    /// Text shown in the notification dialog. Backend and validation
    /// messages are preferred over the generic category text when present.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Rejected { message, .. } if !message.is_empty() => message.clone(),
            ClientError::Status { status, message }
                if !message.is_empty() && matches!(status, 400 | 409 | 422) =>
            {
                message.clone()
            }
            ClientError::Validation(err) => err.to_string(),
            ClientError::Core(err) => err.to_string(),
            other => other.kind().user_message().to_string(),
        }
    }

    /// Returns true if the session was torn down as part of this failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthorized(_) | ClientError::Forbidden(_) | ClientError::SessionExpired(_)
        )
    }

    /// Returns true if the caller may safely resubmit later.
    ///
    /// The gateway itself never retries these; the screen decides.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Status { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// Returns true if the failure happened before anything was sent.
    pub fn is_local(&self) -> bool {
        self.kind() == ErrorKind::Local
    }
}
