//! # Token Store
//!
//! Persistence seam for the session: the token pair, cached user info and
//! the remembered login id.
//!
//! ## Stored Keys
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Session Storage                                 │
//! │                                                                         │
//! │   accessToken        JWT attached as "Authorization: Bearer ..."       │
//! │   refreshToken       JWT exchanged on 401 / renewed near expiry        │
//! │   userInfo           JSON from the login response                      │
//! │   rememberedLoginId  pre-fills the login form (survives logout)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are stored as plain JSON. [`FileTokenStore`] restricts the file to
//! its owner on Unix; hosts that need encryption at rest implement
//! [`TokenStore`] over the platform keychain instead.
//!
//! Only the gateway and the auth API should write tokens.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::token::TokenPair;

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// The stored pair, if both tokens are present.
    async fn tokens(&self) -> ClientResult<Option<TokenPair>>;

    async fn save_tokens(&self, tokens: &TokenPair) -> ClientResult<()>;

    /// Replaces only the refresh token (renewal keeps the access token).
    async fn save_refresh_token(&self, refresh_token: &str) -> ClientResult<()>;

    async fn clear_tokens(&self) -> ClientResult<()>;

    async fn user_info(&self) -> ClientResult<Option<serde_json::Value>>;

    async fn save_user_info(&self, info: &serde_json::Value) -> ClientResult<()>;

    async fn clear_user_info(&self) -> ClientResult<()>;

    async fn remembered_login_id(&self) -> ClientResult<Option<String>>;

    /// `None` forgets the remembered id.
    async fn remember_login_id(&self, login_id: Option<&str>) -> ClientResult<()>;

    /// The stored access token alone.
    async fn access_token(&self) -> ClientResult<Option<String>> {
        Ok(self.tokens().await?.map(|pair| pair.access_token))
    }
}

// =============================================================================
// Stored Record
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_info: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remembered_login_id: Option<String>,
}

impl SessionRecord {
    fn tokens(&self) -> Option<TokenPair> {
        match (&self.access_token, &self.refresh_token) {
            (Some(access), Some(refresh)) => Some(TokenPair::new(access.clone(), refresh.clone())),
            _ => None,
        }
    }

    fn set_tokens(&mut self, tokens: &TokenPair) {
        self.access_token = Some(tokens.access_token.clone());
        self.refresh_token = Some(tokens.refresh_token.clone());
    }

    fn clear_tokens(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Ephemeral store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    record: Mutex<SessionRecord>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a session.
    pub fn with_tokens(tokens: TokenPair) -> Self {
        let mut record = SessionRecord::default();
        record.set_tokens(&tokens);
        MemoryTokenStore {
            record: Mutex::new(record),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn tokens(&self) -> ClientResult<Option<TokenPair>> {
        Ok(self.record.lock().await.tokens())
    }

    async fn save_tokens(&self, tokens: &TokenPair) -> ClientResult<()> {
        self.record.lock().await.set_tokens(tokens);
        Ok(())
    }

    async fn save_refresh_token(&self, refresh_token: &str) -> ClientResult<()> {
        self.record.lock().await.refresh_token = Some(refresh_token.to_string());
        Ok(())
    }

    async fn clear_tokens(&self) -> ClientResult<()> {
        self.record.lock().await.clear_tokens();
        Ok(())
    }

    async fn user_info(&self) -> ClientResult<Option<serde_json::Value>> {
        Ok(self.record.lock().await.user_info.clone())
    }

    async fn save_user_info(&self, info: &serde_json::Value) -> ClientResult<()> {
        self.record.lock().await.user_info = Some(info.clone());
        Ok(())
    }

    async fn clear_user_info(&self) -> ClientResult<()> {
        self.record.lock().await.user_info = None;
        Ok(())
    }

    async fn remembered_login_id(&self) -> ClientResult<Option<String>> {
        Ok(self.record.lock().await.remembered_login_id.clone())
    }

    async fn remember_login_id(&self, login_id: Option<&str>) -> ClientResult<()> {
        self.record.lock().await.remembered_login_id = login_id.map(str::to_string);
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

/// JSON session file, rewritten atomically on every change.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Opens the store at the path from the client config.
    pub fn from_config(config: &crate::config::ClientConfig) -> ClientResult<Self> {
        config
            .resolved_token_path()
            .map(Self::new)
            .ok_or_else(|| ClientError::InvalidConfig("No token path available".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> ClientResult<SessionRecord> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ClientError::Store(format!("corrupt session file {}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionRecord::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, record: &SessionRecord) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(record)?;
        let tmp = self.path.with_extension("json.tmp");

        // A leftover temp file would keep its old permissions.
        match tokio::fs::remove_file(&tmp).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&tmp).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = ?self.path, "Session file written");
        Ok(())
    }

    async fn update<F>(&self, change: F) -> ClientResult<()>
    where
        F: FnOnce(&mut SessionRecord) + Send,
    {
        let _guard = self.lock.lock().await;
        let mut record = self.read().await?;
        change(&mut record);
        self.write(&record).await
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn tokens(&self) -> ClientResult<Option<TokenPair>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.tokens())
    }

    async fn save_tokens(&self, tokens: &TokenPair) -> ClientResult<()> {
        self.update(|record| record.set_tokens(tokens)).await
    }

    async fn save_refresh_token(&self, refresh_token: &str) -> ClientResult<()> {
        self.update(|record| record.refresh_token = Some(refresh_token.to_string()))
            .await
    }

    async fn clear_tokens(&self) -> ClientResult<()> {
        self.update(SessionRecord::clear_tokens).await
    }

    async fn user_info(&self) -> ClientResult<Option<serde_json::Value>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.user_info)
    }

    async fn save_user_info(&self, info: &serde_json::Value) -> ClientResult<()> {
        self.update(|record| record.user_info = Some(info.clone())).await
    }

    async fn clear_user_info(&self) -> ClientResult<()> {
        self.update(|record| record.user_info = None).await
    }

    async fn remembered_login_id(&self) -> ClientResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.remembered_login_id)
    }

    async fn remember_login_id(&self, login_id: Option<&str>) -> ClientResult<()> {
        self.update(|record| record.remembered_login_id = login_id.map(str::to_string))
            .await
    }
}
