//! Error types for the SixFinger WASM client
//!
//! Collectors never surface these: a probe failure is caught and turned into
//! the `"error"` sentinel. The typed errors below travel through the host
//! capability layer (so collectors can log what went wrong) and through the
//! reporting client, where the caller decides what to show the user.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, FingerprintError>;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Host probe errors (1xx)
    HostFailure = 100,
    ProbeTimeout = 101,

    // Network errors (2xx)
    NetworkFailure = 200,

    // Data errors (3xx)
    ParseFailure = 300,
    InvalidHash = 301,

    // Configuration errors (8xx)
    ConfigError = 800,

    // Internal errors (9xx)
    InternalError = 900,
}

/// Main error type for the fingerprint client
#[derive(Error, Debug, Clone)]
pub enum FingerprintError {
    // ===== Host Errors =====
    #[error("Host error: {0}")]
    Host(String),

    #[error("Probe timed out after {millis}ms: {probe}")]
    Timeout { probe: String, millis: u32 },

    // ===== Network Errors =====
    #[error("Network error: {0}")]
    Network(String),

    // ===== Data Errors =====
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid fingerprint hash: {0:?}")]
    InvalidHash(String),

    // ===== Configuration Errors =====
    #[error("Configuration error: {0}")]
    Config(String),

    // ===== Internal Errors =====
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FingerprintError {
    /// Wrap a thrown JS value as a host error.
    pub fn js(context: &str, value: &JsValue) -> Self {
        let detail = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        FingerprintError::Host(format!("{}: {}", context, detail))
    }

    /// Get the error code for programmatic handling
    pub fn code(&self) -> ErrorCode {
        match self {
            FingerprintError::Host(_) => ErrorCode::HostFailure,
            FingerprintError::Timeout { .. } => ErrorCode::ProbeTimeout,
            FingerprintError::Network(_) => ErrorCode::NetworkFailure,
            FingerprintError::Parse(_) => ErrorCode::ParseFailure,
            FingerprintError::InvalidHash(_) => ErrorCode::InvalidHash,
            FingerprintError::Config(_) => ErrorCode::ConfigError,
            FingerprintError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Whether trying again later could succeed.
    ///
    /// The client itself never retries; this is advice for the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FingerprintError::Network(_) | FingerprintError::Timeout { .. }
        )
    }

    /// Get a user-friendly message for display
    pub fn user_message(&self) -> String {
        match self {
            FingerprintError::Host(_) => {
                "The browser refused one of the fingerprint probes.".into()
            }
            FingerprintError::Timeout { .. } => {
                "A browser probe took too long to answer.".into()
            }
            FingerprintError::Network(_) => {
                "Could not reach the risk scoring service. Risk assessment is unavailable.".into()
            }
            FingerprintError::Parse(_) => {
                "The risk scoring service sent an unexpected response.".into()
            }
            FingerprintError::InvalidHash(_) => {
                "Fingerprint hashes are 32 lowercase hexadecimal characters.".into()
            }
            FingerprintError::Config(_) => {
                "Invalid configuration. Please check your settings.".into()
            }
            FingerprintError::Internal(_) => {
                "An internal error occurred. Please report this bug.".into()
            }
        }
    }
}

/// Rejections reach JavaScript as a plain `ErrorInfo` object.
impl From<FingerprintError> for JsValue {
    fn from(err: FingerprintError) -> Self {
        let info = ErrorInfo::from(&err);
        info.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .unwrap_or_else(|_| JsValue::from_str(&info.message))
    }
}

impl From<serde_json::Error> for FingerprintError {
    fn from(err: serde_json::Error) -> Self {
        FingerprintError::Parse(err.to_string())
    }
}

/// Error information for JavaScript consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: u32,
    pub message: String,
    pub user_message: String,
    pub is_retryable: bool,
}

impl From<&FingerprintError> for ErrorInfo {
    fn from(err: &FingerprintError) -> Self {
        ErrorInfo {
            code: err.code() as u32,
            message: err.to_string(),
            user_message: err.user_message(),
            is_retryable: err.is_retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(FingerprintError::Network("offline".into()).is_retryable());
        assert!(FingerprintError::Timeout {
            probe: "battery".into(),
            millis: 5000
        }
        .is_retryable());

        assert!(!FingerprintError::Parse("bad json".into()).is_retryable());
        assert!(!FingerprintError::InvalidHash("xyz".into()).is_retryable());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            FingerprintError::Host("test".into()).code(),
            ErrorCode::HostFailure
        );
        assert_eq!(
            FingerprintError::Network("test".into()).code(),
            ErrorCode::NetworkFailure
        );
        assert_eq!(
            FingerprintError::InvalidHash("test".into()).code() as u32,
            301
        );
    }

    #[test]
    fn test_error_info() {
        let err = FingerprintError::Timeout {
            probe: "media".into(),
            millis: 250,
        };
        let info = ErrorInfo::from(&err);
        assert_eq!(info.code, 101);
        assert_eq!(info.message, "Probe timed out after 250ms: media");
        assert!(info.is_retryable);
        assert!(!info.user_message.is_empty());
    }

    #[test]
    fn test_error_info_wire_shape() {
        let info = ErrorInfo::from(&FingerprintError::InvalidHash("../admin".into()));
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["code"], 301);
        assert_eq!(json["message"], "Invalid fingerprint hash: \"../admin\"");
        assert_eq!(
            json["user_message"],
            "Fingerprint hashes are 32 lowercase hexadecimal characters."
        );
        assert_eq!(json["is_retryable"], false);
    }

    #[test]
    fn test_serde_json_error_is_parse() {
        let err: FingerprintError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.code(), ErrorCode::ParseFailure);
    }
}
