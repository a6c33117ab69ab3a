use thiserror::Error;

/// Errors that can occur when fetching auctions from the auction service
#[derive(Error, Debug)]
pub enum FetchError {
    /// The service could not be reached or answered with a server error
    #[error("Auction service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The endpoint answered 404, taken as the service not serving yet
    #[error("Auction endpoint not found: {0}")]
    ResourceNotFound(String),

    /// The service rejected the request outright
    #[error("Auction service rejected the request with status {status}")]
    Rejected { status: u16 },

    /// The response body could not be decoded
    #[error("Invalid auction response body: {0}")]
    InvalidBody(String),

    /// A bounded retry policy ran out of attempts
    #[error("Gave up after {attempts} attempts: {source}")]
    AttemptsExhausted {
        attempts: u32,
        #[source]
        source: Box<FetchError>,
    },

    /// Client-side configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl FetchError {
    /// Whether the retry policy treats this failure as retryable
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::ServiceUnavailable(_) | FetchError::ResourceNotFound(_)
        )
    }
}
