//! Type definitions for the proxy module

use nutype::nutype;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ========== Size Types ==========

/// Maximum size for inbound auction requests in bytes
#[nutype(
    derive(Clone, Copy, Debug, Display, Deserialize, Serialize, TryFrom, AsRef, PartialEq),
    validate(predicate = |size: &usize| *size > 0),
)]
pub struct RequestSizeLimit(usize);

/// Size of HTTP body in bytes
#[nutype(derive(Clone, Copy, Debug, Display, Deserialize, Serialize, From, AsRef))]
pub struct BodySize(usize);

// ========== Constants ==========

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Default inbound request limit
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 10 * 1024 * 1024;

/// Proxy configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Maximum request size in bytes
    pub max_request_size: RequestSizeLimit,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            max_request_size: RequestSizeLimit::try_new(DEFAULT_MAX_REQUEST_SIZE)
                .expect("10MB is valid"),
        }
    }
}

/// Downstream endpoint for a demand source
#[nutype(
    derive(Clone, Debug, Display, PartialEq, Deserialize, Serialize, TryFrom, AsRef),
    validate(predicate = |s: &str| s.starts_with("http://") || s.starts_with("https://")),
)]
pub struct TargetUrl(String);

/// Errors that end an auction request
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Malformed auction request: {0}")]
    MalformedRequest(serde_json::Error),

    #[error("Request too large: {size} bytes (max: {max_size} bytes)")]
    RequestTooLarge {
        size: BodySize,
        max_size: RequestSizeLimit,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for proxy operations
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Failure of a single downstream call; never ends the auction
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Destination answered with status {0}")]
    Status(u16),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_url_validation() {
        assert!(
            TargetUrl::try_new("https://mercury-dsp.jio.com/jiodsp/?spid=51".to_string()).is_ok()
        );
        assert!(TargetUrl::try_new("http://localhost:8000/openrtb2/auction".to_string()).is_ok());

        assert!(TargetUrl::try_new("not-a-url".to_string()).is_err());
        assert!(TargetUrl::try_new("ftp://example.com".to_string()).is_err());
        assert!(TargetUrl::try_new("".to_string()).is_err());
    }

    #[test]
    fn test_request_size_limit_validation() {
        assert!(RequestSizeLimit::try_new(1).is_ok());
        assert!(RequestSizeLimit::try_new(0).is_err());
    }

    #[test]
    fn test_proxy_config_default() {
        let config = ProxyConfig::default();
        assert_eq!(
            *config.max_request_size.as_ref(),
            DEFAULT_MAX_REQUEST_SIZE
        );
    }
}
