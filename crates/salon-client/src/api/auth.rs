//! Login and logout.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use salon_core::validation::{validate_login_id, validate_password};

use crate::error::ClientResult;
use crate::gateway::{ApiRequest, Gateway};
use crate::token::TokenPair;

pub const LOGIN_PATH: &str = "/auth/user/login";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    login_id: &'a str,
    password: &'a str,
}

/// Login response: the token pair plus whatever user fields the backend
/// sends alongside it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(flatten)]
    pub user_info: serde_json::Map<String, serde_json::Value>,
}

/// The user fields the app reads. Unknown fields are kept in the store but
/// ignored here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub login_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub shop_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthApi {
    gateway: Gateway,
}

impl AuthApi {
    pub fn new(gateway: Gateway) -> Self {
        AuthApi { gateway }
    }

    /// Logs in and stores the session. With `remember`, the login id is kept
    /// to pre-fill the form next time; without it any remembered id is
    /// forgotten.
    pub async fn login(&self, login_id: &str, password: &str, remember: bool) -> ClientResult<UserInfo> {
        let login_id = login_id.trim();
        validate_login_id(login_id)?;
        validate_password(password)?;

        let request = ApiRequest::post(LOGIN_PATH)
            .unauthenticated()
            .json(&LoginRequest { login_id, password })?;
        let response: LoginResponse = self.gateway.send(request).await?;

        let tokens = TokenPair::new(response.access_token, response.refresh_token);
        let user_info = serde_json::Value::Object(response.user_info);
        self.gateway.start_session(&tokens, Some(&user_info)).await?;
        self.gateway
            .store()
            .remember_login_id(remember.then_some(login_id))
            .await?;

        info!(remember, "Logged in");
        Ok(parse_user_info(user_info).unwrap_or_default())
    }

    /// Clears the local session.
    pub async fn logout(&self) -> ClientResult<()> {
        self.gateway.logout().await
    }

    /// The logged-in user, if any.
    pub async fn current_user(&self) -> ClientResult<Option<UserInfo>> {
        let info = self.gateway.store().user_info().await?;
        Ok(info.and_then(parse_user_info))
    }

    pub async fn is_logged_in(&self) -> ClientResult<bool> {
        Ok(self.gateway.store().tokens().await?.is_some())
    }

    pub async fn remembered_login_id(&self) -> ClientResult<Option<String>> {
        self.gateway.store().remembered_login_id().await
    }
}

/// The session stays valid when the backend's user fields change shape;
/// only the typed view is lost.
fn parse_user_info(value: serde_json::Value) -> Option<UserInfo> {
    match serde_json::from_value(value) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(error = %e, "Unexpected user info shape");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_keeps_user_fields() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"accessToken":"a","refreshToken":"r","userId":3,"name":"김원장","shopName":"헤어살롱"}"#,
        )
        .unwrap();
        assert_eq!(response.access_token, "a");
        assert!(!response.user_info.contains_key("accessToken"));

        let user: UserInfo = serde_json::from_value(serde_json::Value::Object(response.user_info)).unwrap();
        assert_eq!(user.user_id, Some(3));
        assert_eq!(user.shop_name.as_deref(), Some("헤어살롱"));
    }

    #[test]
    fn test_mismatched_user_info_is_dropped() {
        assert!(parse_user_info(serde_json::json!({ "userId": "not-a-number" })).is_none());
        assert!(parse_user_info(serde_json::json!("plain string")).is_none());

        let user = parse_user_info(serde_json::json!({ "userId": 7, "extra": true })).unwrap();
        assert_eq!(user.user_id, Some(7));
    }
}
