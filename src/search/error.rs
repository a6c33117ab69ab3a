use thiserror::Error;

/// Errors related to search store operations
#[derive(Error, Debug)]
pub enum SearchStoreError {
    /// Connection error to the search store
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error while creating the index or applying its settings
    #[error("Index error: {0}")]
    Index(String),

    /// Error during document operations
    #[error("Operation error: {0}")]
    Operation(String),

    /// Other unspecified errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
