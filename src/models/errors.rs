//! Centralized Error Handling Module
//!
//! Every failure carries a unique code so it can be grepped in logs.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - RPC_xxx: transport to the realm
//! - REALM_xxx: realm answered, but not with what we asked for
//! - API_xxx: HTTP surface
//! - CFG_xxx: configuration

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// Re-label this error as a 404, keeping its message
    pub fn into_not_found(self) -> Self {
        Self {
            code: ErrorCode::ApiNotFound,
            ..self
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // RPC Errors
    // ============================================
    /// Could not reach the RPC node
    RpcConnectionFailed,
    /// RPC request timed out
    RpcTimeout,
    /// Node or realm returned an error (bad expression, panic, ...)
    RpcError,
    /// Reply did not have the JSON-RPC / ABCI shape we expect
    RpcInvalidResponse,

    // ============================================
    // Realm Errors
    // ============================================
    /// Realm returned its nil sentinel
    RealmNotFound,

    // ============================================
    // API Errors
    // ============================================
    ApiNotFound,
    ApiInternalError,

    // ============================================
    // Configuration Errors
    // ============================================
    ConfigInvalidValue,

    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RpcConnectionFailed => "RPC_CONNECTION_FAILED",
            Self::RpcTimeout => "RPC_TIMEOUT",
            Self::RpcError => "RPC_ERROR",
            Self::RpcInvalidResponse => "RPC_INVALID_RESPONSE",
            Self::RealmNotFound => "REALM_NOT_FOUND",
            Self::ApiNotFound => "API_NOT_FOUND",
            Self::ApiInternalError => "API_INTERNAL_ERROR",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ConfigInvalidValue => 400,
            Self::ApiNotFound | Self::RealmNotFound => 404,
            _ => 500,
        }
    }

    /// Worth a second attempt at the transport layer
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RpcTimeout | Self::RpcConnectionFailed)
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    pub fn rpc_connection_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RpcConnectionFailed, msg)
    }

    pub fn rpc_timeout(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RpcTimeout, msg)
    }

    pub fn rpc_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RpcError, msg)
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RpcInvalidResponse, msg)
    }

    pub fn realm_not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RealmNotFound, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiNotFound, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }

    pub fn invalid_config(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", key, value),
        )
    }
}

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// HTTP mapping
// ============================================

/// Plain-text body, status taken from the error code
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, self.message).into_response()
    }
}

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::RpcTimeout, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::RpcConnectionFailed, "Connection failed")
        } else if err.is_decode() {
            Self::new(ErrorCode::RpcInvalidResponse, err.to_string())
        } else {
            Self::new(ErrorCode::RpcError, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::RpcInvalidResponse, "JSON parse error", err)
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(err: base64::DecodeError) -> Self {
        Self::with_source(ErrorCode::RpcInvalidResponse, "Invalid base64 in ABCI data", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::rpc_timeout("Connection timed out");
        assert_eq!(err.code, ErrorCode::RpcTimeout);
        assert_eq!(err.code_str(), "RPC_TIMEOUT");
        assert_eq!(err.to_string(), "[RPC_TIMEOUT] Connection timed out");
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorCode::RpcTimeout.is_retryable());
        assert!(ErrorCode::RpcConnectionFailed.is_retryable());
        assert!(!ErrorCode::RpcError.is_retryable());
        assert!(!ErrorCode::RealmNotFound.is_retryable());
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::ConfigInvalidValue.http_status(), 400);
        assert_eq!(ErrorCode::RealmNotFound.http_status(), 404);
        assert_eq!(ErrorCode::RpcError.http_status(), 500);
    }

    #[test]
    fn test_into_not_found_keeps_message() {
        let err = AppError::rpc_error("boom").into_not_found();
        assert_eq!(err.code.http_status(), 404);
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn test_response_is_plain_text() {
        let response = AppError::internal("count failed").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let content_type = response.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
    }
}
