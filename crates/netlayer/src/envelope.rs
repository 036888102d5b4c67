//! Response envelope
//!
//! Some servers report application failures inside an otherwise successful
//! response body, as `{"errorCode": "...", "errorMsg": "..."}`. The
//! envelope is decoded alongside the caller's type only to detect those
//! errors.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::NetworkError;

/// Known application error codes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Session expired
    SessionExpired,
    /// Session expired, legacy code
    SessionExpiredLegacy,
    /// Any other code
    Other(String),
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::SessionExpired => "0000252",
            ErrorCode::SessionExpiredLegacy => "101",
            ErrorCode::Other(code) => code,
        }
    }

    /// Check if the code signals an expired session
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            ErrorCode::SessionExpired | ErrorCode::SessionExpiredLegacy
        )
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "0000252" => ErrorCode::SessionExpired,
            "101" => ErrorCode::SessionExpiredLegacy,
            other => ErrorCode::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generic body shape carrying an optional application error
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    /// Application error code, numeric codes are kept as their decimal text
    /// and codes of any other JSON type are dropped
    #[serde(default, deserialize_with = "deserialize_code")]
    pub error_code: Option<String>,
    /// Application error message
    #[serde(default)]
    pub error_msg: Option<String>,
}

impl ResponseEnvelope {
    /// Decode an envelope from a raw JSON body
    ///
    /// Only JSON objects are accepted; arrays and scalars are rejected even
    /// when serde could map them positionally onto the fields.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(body)?;

        if !value.is_object() {
            return Err(de::Error::custom("envelope must be a JSON object"));
        }

        serde_json::from_value(value)
    }

    /// Application error embedded in the envelope
    ///
    /// Only a non-empty `errorMsg` counts as an error. A missing code is
    /// reported as an empty string.
    pub fn application_error(&self) -> Option<NetworkError> {
        let message = self.error_msg.as_deref().filter(|msg| !msg.is_empty())?;

        Some(NetworkError::ApplicationError {
            code: self.error_code.clone().unwrap_or_default(),
            message: message.to_string(),
        })
    }

    /// Parsed error code, if any
    pub fn code(&self) -> Option<ErrorCode> {
        self.error_code.as_deref().map(ErrorCode::from)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CodeRepr {
    Text(String),
    Number(serde_json::Number),
    Other(de::IgnoredAny),
}

fn deserialize_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let code = Option::<CodeRepr>::deserialize(deserializer)?;

    Ok(code.and_then(|code| match code {
        CodeRepr::Text(text) => Some(text),
        CodeRepr::Number(number) => Some(number.to_string()),
        CodeRepr::Other(_) => None,
    }))
}
