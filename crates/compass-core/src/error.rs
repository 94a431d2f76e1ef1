use thiserror::Error;

/// Top-level error type for the Compass core.
///
/// Only the host binary sees these directly. The knowledge-base loader
/// degrades to an empty table instead of surfacing `DataSource` errors to
/// the matching code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompassError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data source unavailable: {0}")]
    DataSource(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for CompassError {
    fn from(err: toml::de::Error) -> Self {
        CompassError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CompassError {
    fn from(err: toml::ser::Error) -> Self {
        CompassError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CompassError {
    fn from(err: serde_json::Error) -> Self {
        CompassError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for CompassError {
    fn from(err: csv::Error) -> Self {
        CompassError::DataSource(err.to_string())
    }
}

/// A specialized `Result` type for Compass operations.
pub type Result<T> = std::result::Result<T, CompassError>;
