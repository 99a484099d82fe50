//! Error types surfaced by the hook layer and the REST client.
//!
//! None of these are fatal: controllers store them in their state and, where
//! the contract says so, hand them back to the awaiting caller.

use std::time::Duration;

use serde_json::Value;

/// Errors stored in hook state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HookError<E> {
    /// The operation demands an authenticated session and the auth signal is false.
    /// Raised locally, the wrapped operation is never invoked.
    #[error("operation `{operation}` requires an authenticated session")]
    AuthRequired { operation: &'static str },

    /// The wrapped operation rejected.
    #[error("{0}")]
    Operation(E),
}

impl<E> HookError<E> {
    pub fn is_auth_required(&self) -> bool {
        matches!(self, HookError::AuthRequired { .. })
    }

    /// The underlying operation error, if this is one.
    pub fn operation_error(&self) -> Option<&E> {
        match self {
            HookError::Operation(error) => Some(error),
            HookError::AuthRequired { .. } => None,
        }
    }
}

/// Result alias for hook calls
pub type HookResult<T, E> = Result<T, HookError<E>>;

/// Errors produced by [`ApiClient`](crate::api::ApiClient) and REST-backed operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// HTTP 401. The stored session token has been cleared.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// HTTP 403
    #[error("forbidden: {message}")]
    Forbidden { message: String },

    /// HTTP 404
    #[error("not found: {message}")]
    NotFound { message: String },

    /// HTTP 429
    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    /// Any other non-2xx response.
    #[error("request failed with status {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    /// Network-level failure, no response was received.
    #[error("network error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status code, `None` for failures without a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::RateLimited { .. } => Some(429),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(_)
            | ApiError::Decode(_)
            | ApiError::Timeout(_)
            | ApiError::Config(_) => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout(_))
    }

    /// Human-readable message without the status prefix.
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::Forbidden { message }
            | ApiError::NotFound { message }
            | ApiError::RateLimited { message, .. }
            | ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Decode(error.to_string())
    }
}

impl From<crate::operation::OperationTimeout> for ApiError {
    fn from(timeout: crate::operation::OperationTimeout) -> Self {
        ApiError::Timeout(timeout.after)
    }
}

/// Result alias for REST calls
pub type ApiResult<T> = Result<T, ApiError>;
