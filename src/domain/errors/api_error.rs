//! Backend API error types.

use thiserror::Error;

/// Errors raised while talking to the wellness backend or resolving its token.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    #[error("no backend token available; pass --token or set BHAVYA_TOKEN")]
    NoToken,

    #[error("token rejected by backend: {message}")]
    Unauthorized { message: String },

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("rate limited by backend, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("backend unavailable (HTTP {status})")]
    Unavailable { status: u16 },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("failed to decode response: {message}")]
    Decode { message: String },

    #[error("token storage error: {message}")]
    TokenStorage { message: String },

    #[error("unexpected backend error: {message}")]
    Unexpected { message: String },
}

impl ApiError {
    /// Creates unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates token storage error.
    #[must_use]
    pub fn token_storage(message: impl Into<String>) -> Self {
        Self::TokenStorage {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether retrying later may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::RateLimited { .. } | Self::Unavailable { .. }
        )
    }

    /// Returns whether the token is missing or was refused.
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::NoToken | Self::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_variants() {
        assert!(ApiError::network("reset").is_recoverable());
        assert!(ApiError::Unavailable { status: 503 }.is_recoverable());
        assert!(!ApiError::unauthorized("expired").is_recoverable());
        assert!(!ApiError::decode("eof").is_recoverable());
    }

    #[test]
    fn test_auth_variants() {
        assert!(ApiError::NoToken.is_auth_error());
        assert!(ApiError::unauthorized("expired").is_auth_error());
        assert!(!ApiError::network("reset").is_auth_error());
    }

    #[test]
    fn test_messages_mention_token_source() {
        assert!(ApiError::NoToken.to_string().contains("BHAVYA_TOKEN"));
    }
}
