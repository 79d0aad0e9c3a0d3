//! Error types for tenantkv Core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Required section '{section}' missing from document '{key}'")]
    MissingSection { key: String, section: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    // Backing store errors
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the "document does not exist" outcome of a lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
