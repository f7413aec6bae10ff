//! Crate-wide error hierarchy for trafik-feed.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type FeedResult<T> = Result<T, FeedError>;

/// Root error type for the trafik-feed crate.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Upstream (HTTP transport / status / response shape) failure.
    ///
    /// These are transient by nature and safe to retry.
    #[error(transparent)]
    Upstream(#[from] FeedUpstreamError),

    /// Record normalization failure. Not retried: a record that cannot be
    /// normalized would corrupt ordering invariants downstream.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Upstream-specific error used inside the client layer.
#[derive(Debug, Error)]
pub enum FeedUpstreamError {
    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited {
        /// Optional `Retry-After` hint in seconds when available.
        retry_after_secs: Option<u64>,
    },

    /// Gateway / server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (non-2xx) not covered by specific variants.
    #[error("http status error: status {0}")]
    HttpStatus(u16),

    /// Network/transport failure without HTTP status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected/invalid shape of the feed response (malformed JSON).
    #[error("invalid feed response: {0}")]
    InvalidResponse(String),
}

/// Normalizer errors raised at the wire-to-canonical boundary.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A record time field could not be parsed as an offset-carrying
    /// RFC 3339 timestamp. Naive timestamps are rejected, not guessed at.
    #[error("malformed timestamp in {field}: {value:?}")]
    MalformedTimestamp {
        /// Wire field name the value came from.
        field: &'static str,
        /// The offending raw value.
        value: String,
    },
}

// ===== Conversions for `?` ergonomics at the crate root =====

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::Upstream(FeedUpstreamError::from(e))
    }
}

// ===== Mapping from reqwest::Error into FeedUpstreamError =====

impl From<reqwest::Error> for FeedUpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return FeedUpstreamError::Timeout;
        }

        if let Some(status) = e.status() {
            let code = status.as_u16();
            return match code {
                429 => FeedUpstreamError::RateLimited {
                    retry_after_secs: None,
                },
                500..=599 => FeedUpstreamError::Server(code),
                _ => FeedUpstreamError::HttpStatus(code),
            };
        }

        if e.is_decode() {
            return FeedUpstreamError::InvalidResponse(e.to_string());
        }

        FeedUpstreamError::Network(e.to_string())
    }
}
