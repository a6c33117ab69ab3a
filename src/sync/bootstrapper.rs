use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::auctions::AuctionSource;
use crate::search::{SearchDocument, SearchStore};

/// Orchestrates the flow from the auction service into the search index
pub struct Bootstrapper<A: AuctionSource, S: SearchStore> {
    source: Arc<A>,
    store: Arc<S>,
}

/// Summary of a completed synchronization pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Documents already present in the index before the pass
    pub existing_documents: u64,
    /// Auctions returned by the auction service
    pub fetched_records: usize,
    /// Documents written to the index
    pub indexed_documents: usize,
}

impl<A: AuctionSource, S: SearchStore> Bootstrapper<A, S> {
    /// Creates a new bootstrapper over the provided source and store
    pub fn new(source: A, store: S) -> Self {
        Bootstrapper {
            source: Arc::new(source),
            store: Arc::new(store),
        }
    }

    /// Runs the startup synchronization pass
    ///
    /// Prepares the text index, then fetches the complete auction list and
    /// writes it to the index. Existing documents are counted up front and
    /// overwritten in place, so repeated runs do not grow the index.
    pub async fn run(&self) -> Result<SyncReport> {
        info!("Starting search index bootstrap");

        self.store
            .ensure_text_index()
            .await
            .context("Failed to prepare the text index")?;

        let existing = self
            .store
            .count_documents()
            .await
            .context("Failed to count indexed documents")?;
        info!("Search index currently holds {} documents", existing);

        self.fetch_and_index(None, existing).await
    }

    /// Runs an incremental pass, fetching only auctions updated after `since`
    ///
    /// When no lower bound is given, the newest update time already in the
    /// index is used. An empty index falls back to a full fetch.
    pub async fn refresh(&self, since: Option<DateTime<Utc>>) -> Result<SyncReport> {
        info!("Starting incremental refresh");

        self.store
            .ensure_text_index()
            .await
            .context("Failed to prepare the text index")?;

        let existing = self
            .store
            .count_documents()
            .await
            .context("Failed to count indexed documents")?;

        let since = match since {
            Some(ts) => Some(ts),
            None => self
                .store
                .latest_update_time()
                .await
                .context("Failed to determine the newest indexed update time")?,
        };

        match &since {
            Some(ts) => info!("Refreshing auctions updated after {}", ts),
            None => info!("Search index is empty, performing a full fetch"),
        }

        self.fetch_and_index(since, existing).await
    }

    async fn fetch_and_index(
        &self,
        since: Option<DateTime<Utc>>,
        existing: u64,
    ) -> Result<SyncReport> {
        let auctions = self
            .source
            .fetch_auctions(since)
            .await
            .context("Failed to fetch auctions from the auction service")?;

        info!("{} auctions returned from the auction service", auctions.len());

        if auctions.is_empty() {
            info!("No auctions to index");
            return Ok(SyncReport {
                existing_documents: existing,
                fetched_records: 0,
                indexed_documents: 0,
            });
        }

        let documents: Vec<SearchDocument> =
            auctions.into_iter().map(SearchDocument::from).collect();

        self.store
            .upsert_documents(&documents)
            .await
            .context("Failed to write documents to the search index")?;
        debug!("Indexed {} documents", documents.len());

        Ok(SyncReport {
            existing_documents: existing,
            fetched_records: documents.len(),
            indexed_documents: documents.len(),
        })
    }
}
