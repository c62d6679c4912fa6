use thiserror::Error;

/// Core error type for doctype-ts operations.
#[derive(Error, Debug)]
pub enum DoctypeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<serde_json::Error> for DoctypeError {
    fn from(e: serde_json::Error) -> Self {
        DoctypeError::Serialization(e.to_string())
    }
}

/// Result type alias using DoctypeError.
pub type Result<T> = std::result::Result<T, DoctypeError>;
