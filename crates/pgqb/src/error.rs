//! Error types for pgqb

use thiserror::Error;

/// Result type alias for pgqb operations
pub type QbResult<T> = Result<T, QbError>;

/// Error types for the fallible edges of the builder.
///
/// Almost every defect pgqb can detect is a programming error in the query
/// definition itself (an unknown column, a builder driven into an invalid
/// state) and panics at construction time instead of surfacing here. The
/// variants below cover the few paths where failure depends on runtime
/// input rather than on code shape.
#[derive(Debug, Error)]
pub enum QbError {
    /// Audit subject could not be serialized to JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Connection config names a driver pgqb cannot build a DSN for
    #[error("Unsupported driver: {0}")]
    UnsupportedDriver(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl QbError {
    /// Create an unsupported-driver error
    pub fn unsupported_driver(driver: impl Into<String>) -> Self {
        Self::UnsupportedDriver(driver.into())
    }

    /// Check if this is an unsupported-driver error
    pub fn is_unsupported_driver(&self) -> bool {
        matches!(self, Self::UnsupportedDriver(_))
    }
}
