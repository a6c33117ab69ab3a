use crate::search::document::SearchDocument;
use crate::search::error::SearchStoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
#[cfg(test)]
use uuid::Uuid;

/// Store trait defining the interface for the search index sink
#[async_trait]
pub trait SearchStore: Send + Sync + 'static {
    /// Ensure the index and its text-search settings exist
    ///
    /// Idempotent: safe to invoke on every startup regardless of whether
    /// the index already exists.
    async fn ensure_text_index(&self) -> Result<(), SearchStoreError>;

    /// Count the documents currently in the index
    async fn count_documents(&self) -> Result<u64, SearchStoreError>;

    /// Bulk add-or-update documents keyed by their id
    ///
    /// Re-writing a document with an id already present replaces it, so
    /// repeated synchronization runs never duplicate documents.
    async fn upsert_documents(&self, documents: &[SearchDocument]) -> Result<(), SearchStoreError>;

    /// Update time of the most recently updated document, None when empty
    async fn latest_update_time(&self) -> Result<Option<DateTime<Utc>>, SearchStoreError>;

    /// Run a text query over the searchable fields
    async fn search(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<SearchDocument>, SearchStoreError>;

    /// Delete all documents, leaving the index definition in place
    async fn clear_documents(&self) -> Result<(), SearchStoreError>;

    /// Look up a single document by id (test-only)
    #[cfg(test)]
    async fn get_document(&self, id: Uuid) -> Result<Option<SearchDocument>, SearchStoreError>;
}

/// Implementation of SearchStore for Arc<T> where T implements SearchStore
///
/// This allows sharing store instances across components efficiently.
#[async_trait]
impl<T: SearchStore + ?Sized> SearchStore for Arc<T> {
    async fn ensure_text_index(&self) -> Result<(), SearchStoreError> {
        (**self).ensure_text_index().await
    }

    async fn count_documents(&self) -> Result<u64, SearchStoreError> {
        (**self).count_documents().await
    }

    async fn upsert_documents(&self, documents: &[SearchDocument]) -> Result<(), SearchStoreError> {
        (**self).upsert_documents(documents).await
    }

    async fn latest_update_time(&self) -> Result<Option<DateTime<Utc>>, SearchStoreError> {
        (**self).latest_update_time().await
    }

    async fn search(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<SearchDocument>, SearchStoreError> {
        (**self).search(term, limit).await
    }

    async fn clear_documents(&self) -> Result<(), SearchStoreError> {
        (**self).clear_documents().await
    }

    #[cfg(test)]
    async fn get_document(&self, id: Uuid) -> Result<Option<SearchDocument>, SearchStoreError> {
        (**self).get_document(id).await
    }
}
