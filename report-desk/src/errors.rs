//! Crate-wide error hierarchy for report-desk.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type DeskResult<T> = Result<T, DeskError>;

/// Root error type for the report-desk crate.
#[derive(Debug, Error)]
pub enum DeskError {
    /// Feed failure that escaped the retry policy. Transient upstream
    /// errors never reach this; only normalization failures do.
    #[error(transparent)]
    Feed(#[from] trafik_feed::FeedError),

    /// Settings store (file I/O / JSON) failure.
    #[error(transparent)]
    Store(#[from] DeskStoreError),

    /// Configuration problems (bad filters, timezone, sort key).
    #[error(transparent)]
    Config(#[from] DeskConfigError),

    /// Event sink could not be built.
    #[error("event sink: {0}")]
    Sink(String),
}

/// Settings store related errors.
#[derive(Debug, Error)]
pub enum DeskStoreError {
    /// I/O error while reading or writing state files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error in state payloads.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Configuration and setup errors.
#[derive(Debug, Error)]
pub enum DeskConfigError {
    /// Unknown IANA timezone name.
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Sort key was neither `updated` nor `created`.
    #[error("invalid sort key: {0}")]
    InvalidSortKey(String),

    /// Region filter contained a value outside the known vocabulary.
    #[error("unknown region in filter: {0}")]
    UnknownRegion(String),

    /// Transport filter contained a value outside the known vocabulary.
    #[error("unknown transport type in filter: {0}")]
    UnknownTransportType(String),
}

// ===== Conversions for `?` ergonomics at the crate root =====

impl From<std::io::Error> for DeskError {
    fn from(e: std::io::Error) -> Self {
        DeskError::Store(DeskStoreError::Io(e))
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(e: serde_json::Error) -> Self {
        DeskError::Store(DeskStoreError::Serde(e))
    }
}
