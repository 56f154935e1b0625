//! Error types for Quarry

use thiserror::Error;

/// Core error type for Quarry operations
///
/// Pool exhaustion (`PoolTimeout`) is deliberately distinct from
/// `Connection` so that callers can tell "too busy" apart from
/// "cannot connect at all".
#[derive(Error, Debug)]
pub enum QuarryError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Pool exhausted: {0}")]
    PoolTimeout(String),

    #[error("Pool is closed")]
    PoolClosed,

    #[error("Query error: {0}")]
    Query(String),

    #[error("Parameter bind error: {0}")]
    Bind(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timeout: {0}")]
    Timeout(String),
}

/// Result type alias for Quarry operations
pub type Result<T> = std::result::Result<T, QuarryError>;
