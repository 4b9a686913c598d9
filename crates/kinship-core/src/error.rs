use thiserror::Error;

/// Result type alias for Kinship operations
pub type Result<T> = std::result::Result<T, KinshipError>;

/// Errors that can occur while fetching social-graph data or scoring it
#[derive(Error, Debug)]
pub enum KinshipError {
    /// Authentication failed - invalid or missing API key
    #[error("authentication failed: invalid API key")]
    Unauthorized,

    /// Rate limit exceeded at the graph provider
    #[error("rate limit exceeded, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after: Option<u64>,
    },

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// Provider returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wallet address has no social profile
    #[error("no social identity for address {0}")]
    UnresolvableIdentity(String),

    /// Caller passed an argument outside its documented domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl KinshipError {
    /// Returns true if the error came from reaching the graph provider
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized
                | Self::RateLimited { .. }
                | Self::NotFound { .. }
                | Self::Api { .. }
                | Self::Http(_)
                | Self::Timeout(_)
                | Self::Connection(_)
                | Self::Json(_)
        )
    }

    /// Returns true if the error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout(_) | Self::Connection(_)
        )
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::NotFound { .. } => Some(404),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_classification() {
        assert!(KinshipError::Http("reset".into()).is_transport());
        assert!(KinshipError::RateLimited { retry_after: None }.is_transport());
        assert!(!KinshipError::InvalidArgument("quality".into()).is_transport());
        assert!(!KinshipError::UnresolvableIdentity("0xabc".into()).is_transport());
    }

    #[test]
    fn status_codes() {
        assert_eq!(KinshipError::Unauthorized.status_code(), Some(401));
        assert_eq!(
            KinshipError::Api {
                code: 503,
                message: "down".into()
            }
            .status_code(),
            Some(503)
        );
        assert_eq!(KinshipError::Timeout(30).status_code(), None);
    }
}
