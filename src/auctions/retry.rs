use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::auctions::error::FetchError;
use crate::auctions::models::Auction;
use crate::auctions::source::AuctionSource;

/// Retry behavior for the fetch client
///
/// A `max_attempts` of None retries forever, which is only appropriate for
/// one-time startup synchronization where the auction service may simply not
/// be serving yet. Request-path callers should always use a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Retry forever on the given fixed interval
    pub fn fixed(interval: Duration) -> Self {
        RetryPolicy {
            interval,
            max_attempts: None,
        }
    }

    /// Retry on the given fixed interval, giving up after `max_attempts`
    /// attempts. At least one attempt is always made.
    pub fn bounded(interval: Duration, max_attempts: u32) -> Self {
        RetryPolicy {
            interval,
            max_attempts: Some(max_attempts),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::fixed(Duration::from_secs(3))
    }
}

/// Decorator that applies a RetryPolicy to any auction source
///
/// Transient failures are retried on the fixed interval; everything else is
/// returned to the caller after the first attempt. Attempts never run in
/// parallel, so the call logically blocks until a non-retryable outcome.
pub struct RetryingClient<S: AuctionSource> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: AuctionSource> RetryingClient<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        RetryingClient { inner, policy }
    }
}

#[async_trait]
impl<S: AuctionSource> AuctionSource for RetryingClient<S> {
    async fn fetch_auctions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Auction>, FetchError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.inner.fetch_auctions(since).await {
                Ok(auctions) => {
                    if attempt > 1 {
                        debug!("Fetch succeeded on attempt {}", attempt);
                    }
                    return Ok(auctions);
                }
                Err(e) if e.is_transient() => {
                    if let Some(max) = self.policy.max_attempts {
                        if attempt >= max {
                            return Err(FetchError::AttemptsExhausted {
                                attempts: attempt,
                                source: Box::new(e),
                            });
                        }
                    }
                    warn!(
                        "Fetch attempt {} failed: {}. Retrying in {:?}",
                        attempt, e, self.policy.interval
                    );
                    sleep(self.policy.interval).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
