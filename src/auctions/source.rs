use crate::auctions::error::FetchError;
use crate::auctions::models::Auction;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Source trait defining the interface for reading auction records
#[async_trait]
pub trait AuctionSource: Send + Sync + 'static {
    /// Fetch the current set of auction records
    ///
    /// * `since` - Only return records updated strictly after this timestamp
    ///
    /// An empty result is a valid success, distinct from failure.
    async fn fetch_auctions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Auction>, FetchError>;
}

/// Implementation of AuctionSource for Arc<T> where T implements AuctionSource
///
/// This allows sharing source instances across components efficiently. The
/// Arc wrapper provides thread-safe reference counting, enabling multiple
/// parts of the application to share the same source instance.
#[async_trait]
impl<T: AuctionSource + ?Sized> AuctionSource for Arc<T> {
    async fn fetch_auctions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Auction>, FetchError> {
        (**self).fetch_auctions(since).await
    }
}
