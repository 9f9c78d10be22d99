//! # Response Envelope
//!
//! Every backend response is wrapped as
//! `{ "success": bool, "data": T, "message": string, "code": string|number }`.
//! The envelope is decoded here, at the boundary, and callers only ever see
//! the typed `data`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ClientError, ClientResult};

/// The backend response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "code_as_string")]
    pub code: Option<String>,
}

fn default_success() -> bool {
    true
}

// Some endpoints send numeric codes, others strings.
fn code_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

impl<T> ApiEnvelope<T> {
    /// Returns the payload, or the matching error.
    pub fn into_data(self) -> ClientResult<T> {
        self.check()?;
        self.data.ok_or_else(|| {
            ClientError::InvalidResponse("response envelope has no data".to_string())
        })
    }

    /// Succeeds if the backend reported success; any payload is ignored.
    pub fn into_unit(self) -> ClientResult<()> {
        self.check()
    }

    fn check(&self) -> ClientResult<()> {
        if self.success {
            return Ok(());
        }
        Err(ClientError::Rejected {
            code: self.code.clone().unwrap_or_default(),
            message: self.message.clone().unwrap_or_default(),
        })
    }
}

/// Pulls the `message` field out of an error body, if it is an envelope.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiEnvelope<serde::de::IgnoredAny>>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_data() {
        let envelope: ApiEnvelope<Vec<i64>> =
            serde_json::from_str(r#"{"success":true,"data":[1,2,3],"message":"ok","code":"200"}"#).unwrap();
        assert_eq!(envelope.into_data().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_failure_becomes_rejected() {
        let envelope: ApiEnvelope<Vec<i64>> =
            serde_json::from_str(r#"{"success":false,"message":"중복된 고객입니다.","code":4091}"#).unwrap();
        match envelope.into_data() {
            Err(ClientError::Rejected { code, message }) => {
                assert_eq!(code, "4091");
                assert_eq!(message, "중복된 고객입니다.");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_missing_data() {
        let envelope: ApiEnvelope<Vec<i64>> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(envelope.into_data(), Err(ClientError::InvalidResponse(_))));

        let envelope: ApiEnvelope<serde::de::IgnoredAny> =
            serde_json::from_str(r#"{"success":true,"data":null}"#).unwrap();
        assert!(envelope.into_unit().is_ok());
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"success":false,"message":"없는 고객입니다."}"#).as_deref(),
            Some("없는 고객입니다.")
        );
        assert_eq!(error_message("<html>502 Bad Gateway</html>"), None);
        assert_eq!(error_message(r#"{"message":"  "}"#), None);
    }
}
