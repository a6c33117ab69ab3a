use crate::auctions::error::FetchError;
use crate::auctions::models::Auction;
use crate::auctions::source::AuctionSource;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

/// A fake in-memory implementation of the AuctionSource trait for testing
///
/// Outcomes can be scripted per attempt; once the script is exhausted the
/// fake serves its stored auctions, filtered by the `since` argument the way
/// the real service filters on the update timestamp.
pub struct FakeAuctionApi {
    auctions: Arc<RwLock<HashMap<uuid::Uuid, Auction>>>,
    script: Arc<Mutex<VecDeque<Result<Vec<Auction>, FetchError>>>>,
    always_unavailable: Arc<Mutex<bool>>,
    attempts: Arc<Mutex<u32>>,
    seen_since: Arc<Mutex<Vec<Option<DateTime<Utc>>>>>,
}

#[allow(dead_code)]
impl FakeAuctionApi {
    /// Create a new empty FakeAuctionApi instance
    pub fn new() -> Self {
        FakeAuctionApi {
            auctions: Arc::new(RwLock::new(HashMap::new())),
            script: Arc::new(Mutex::new(VecDeque::new())),
            always_unavailable: Arc::new(Mutex::new(false)),
            attempts: Arc::new(Mutex::new(0)),
            seen_since: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add an auction to the fake service's data set, replacing any auction
    /// with the same id
    pub fn fake_add_auction(&self, auction: Auction) {
        let mut auctions = self.auctions.write().unwrap();
        auctions.insert(auction.id, auction);
    }

    /// Queue an outcome for the next fetch attempt
    pub fn fake_push_response(&self, response: Result<Vec<Auction>, FetchError>) {
        let mut script = self.script.lock().unwrap();
        script.push_back(response);
    }

    /// Make every attempt fail as unavailable once the script is exhausted
    pub fn fake_always_unavailable(&self, unavailable: bool) {
        *self.always_unavailable.lock().unwrap() = unavailable;
    }

    /// Number of fetch attempts made against this fake
    pub fn fake_attempt_count(&self) -> u32 {
        *self.attempts.lock().unwrap()
    }

    /// The `since` argument of every fetch attempt, in order
    pub fn fake_seen_since(&self) -> Vec<Option<DateTime<Utc>>> {
        self.seen_since.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuctionSource for FakeAuctionApi {
    async fn fetch_auctions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Auction>, FetchError> {
        *self.attempts.lock().unwrap() += 1;
        self.seen_since.lock().unwrap().push(since);

        if let Some(scripted) = self.script.lock().unwrap().pop_front() {
            return scripted;
        }

        if *self.always_unavailable.lock().unwrap() {
            return Err(FetchError::ServiceUnavailable(
                "Simulated unavailable service".to_string(),
            ));
        }

        let auctions = self.auctions.read().unwrap();
        let mut filtered: Vec<Auction> = auctions
            .values()
            .filter(|auction| match since {
                Some(ts) => auction.updated_at > ts,
                None => true,
            })
            .cloned()
            .collect();

        // Sort by update time to ensure consistent results
        filtered.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));

        Ok(filtered)
    }
}

#[cfg(test)]
impl Default for FakeAuctionApi {
    fn default() -> Self {
        Self::new()
    }
}
