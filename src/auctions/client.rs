use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use tracing::debug;

use crate::auctions::error::FetchError;
use crate::auctions::models::Auction;
use crate::auctions::source::AuctionSource;
use crate::config::AuctionApiConfig;

/// HTTP client for the auction service's query endpoint
///
/// Performs a single GET per call and classifies the outcome; retrying is
/// the job of the wrapping RetryingClient.
pub struct AuctionApiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl AuctionApiClient {
    /// Create a new client from configuration
    pub fn new(config: &AuctionApiConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                FetchError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        let endpoint = format!("{}/api/auctions", config.base_url.trim_end_matches('/'));

        Ok(AuctionApiClient { client, endpoint })
    }

    /// Build the GET request for the given lower-bound timestamp
    pub(crate) fn build_request(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<reqwest::Request, FetchError> {
        let mut builder = self.client.get(&self.endpoint);
        if let Some(ts) = since {
            builder = builder.query(&[("date", ts.to_rfc3339())]);
        }
        builder
            .build()
            .map_err(|e| FetchError::Configuration(format!("Invalid request: {}", e)))
    }
}

/// Map a response status to the fetch outcome it represents
///
/// Returns None for success statuses. 404 is kept distinct from server
/// errors so callers can tell "not serving yet" from "falling over".
pub(crate) fn classify_status(status: StatusCode) -> Option<FetchError> {
    if status.is_success() {
        None
    } else if status == StatusCode::NOT_FOUND {
        Some(FetchError::ResourceNotFound(
            "auction service returned 404 Not Found".to_string(),
        ))
    } else if status.is_server_error() {
        Some(FetchError::ServiceUnavailable(format!(
            "auction service returned {}",
            status
        )))
    } else {
        Some(FetchError::Rejected {
            status: status.as_u16(),
        })
    }
}

fn map_transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::ServiceUnavailable(format!("Request timed out: {}", e))
    } else {
        FetchError::ServiceUnavailable(format!("Transport error: {}", e))
    }
}

#[async_trait]
impl AuctionSource for AuctionApiClient {
    async fn fetch_auctions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Auction>, FetchError> {
        let request = self.build_request(since)?;
        debug!("Requesting auctions from {}", request.url());

        let response = self
            .client
            .execute(request)
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if let Some(err) = classify_status(status) {
            debug!("Auction request answered with status {}", status);
            return Err(err);
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        let auctions: Vec<Auction> = serde_json::from_slice(&body)
            .map_err(|e| FetchError::InvalidBody(format!("Failed to decode auction list: {}", e)))?;

        debug!("Fetched {} auctions", auctions.len());
        Ok(auctions)
    }
}
