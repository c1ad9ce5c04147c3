// ============================================================================
// QIWI-PAYMENTS - Error Types
// ============================================================================

use serde_json::Value;
use thiserror::Error;

/// Classified failure kinds reported by the request executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// HTTP 401: the credential was rejected
    AuthInvalid,
    /// HTTP 403: the credential lacks the required scope
    PermissionDenied,
    /// Structured error payload or undecodable body
    ApiError,
    /// Caller input failed a precondition
    ValidationError,
}

#[derive(Error, Debug)]
pub enum QiwiError {
    // ==================== Caller Errors ====================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ==================== Remote Errors ====================
    #[error("Invalid token: the remote service rejected the credential")]
    AuthInvalid,

    #[error("Permission denied: the credential is not allowed to call this method")]
    PermissionDenied,

    #[error("QIWI API error: {0}")]
    Api(Value),

    #[error("Invalid invoice payload: {0}")]
    InvalidInvoice(String),

    // ==================== Transport Errors ====================
    #[error("Network request failed: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QiwiError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        QiwiError::Configuration(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        QiwiError::Validation(msg.into())
    }

    /// Create an invalid invoice error
    pub fn invalid_invoice(msg: impl Into<String>) -> Self {
        QiwiError::InvalidInvoice(msg.into())
    }

    /// The classified kind, for errors that belong to the classified set
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            QiwiError::AuthInvalid => Some(ErrorKind::AuthInvalid),
            QiwiError::PermissionDenied => Some(ErrorKind::PermissionDenied),
            QiwiError::Api(_) => Some(ErrorKind::ApiError),
            QiwiError::Validation(_) => Some(ErrorKind::ValidationError),
            _ => None,
        }
    }

    /// Raw payload or message attached to the error
    pub fn detail(&self) -> Value {
        match self {
            QiwiError::Api(payload) => payload.clone(),
            other => Value::String(other.to_string()),
        }
    }

    /// Remote error code (`errorCode` or `code`) when the payload carries one
    pub fn api_code(&self) -> Option<String> {
        let QiwiError::Api(payload) = self else {
            return None;
        };
        ["errorCode", "code"]
            .iter()
            .filter_map(|key| payload.get(*key))
            .find_map(|code| match code {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
    }

    /// Whether the caller can fix this by changing input or configuration
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            QiwiError::Validation(_) | QiwiError::NotFound(_) | QiwiError::Network(_)
        )
    }

    /// Stable error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            QiwiError::Configuration(_) => "QIWI_CONFIGURATION",
            QiwiError::Validation(_) => "QIWI_VALIDATION",
            QiwiError::NotFound(_) => "QIWI_NOT_FOUND",
            QiwiError::AuthInvalid => "QIWI_AUTH_INVALID",
            QiwiError::PermissionDenied => "QIWI_PERMISSION_DENIED",
            QiwiError::Api(_) => "QIWI_API_ERROR",
            QiwiError::InvalidInvoice(_) => "QIWI_INVALID_INVOICE",
            QiwiError::Network(_) => "QIWI_NETWORK",
            QiwiError::Serialization(_) => "QIWI_SERIALIZATION",
        }
    }
}

impl From<reqwest::Error> for QiwiError {
    fn from(err: reqwest::Error) -> Self {
        QiwiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for QiwiError {
    fn from(err: serde_json::Error) -> Self {
        QiwiError::Serialization(err.to_string())
    }
}
