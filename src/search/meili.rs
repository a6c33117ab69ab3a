use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meilisearch_sdk::client::Client;
use meilisearch_sdk::errors::{Error as MeiliError, ErrorCode, MeilisearchError};
use meilisearch_sdk::indexes::Index;
use meilisearch_sdk::search::SearchResults;
use meilisearch_sdk::settings::Settings;
use meilisearch_sdk::task_info::TaskInfo;
use meilisearch_sdk::tasks::Task;
use tracing::{debug, info};
#[cfg(test)]
use uuid::Uuid;

use crate::config::SearchConfig;
use crate::search::document::{SearchDocument, SORT_FIELD, TEXT_SEARCH_FIELDS};
use crate::search::error::SearchStoreError;
use crate::search::store::SearchStore;

/// Meilisearch implementation of the SearchStore trait
pub struct MeiliSearchStore {
    client: Client,
    index_name: String,
}

impl MeiliSearchStore {
    /// Create a new store instance and verify the server is reachable
    pub async fn new(config: &SearchConfig) -> Result<Self, SearchStoreError> {
        let client = Client::new(&config.url, config.api_key.as_deref()).map_err(|e| {
            SearchStoreError::Configuration(format!("Invalid search store settings: {}", e))
        })?;

        let health = client.health().await.map_err(|e| {
            SearchStoreError::Connection(format!(
                "Failed to reach search store at {}: {}",
                config.url, e
            ))
        })?;

        info!(
            "Connected to search store at {} (status: {})",
            config.url, health.status
        );

        Ok(MeiliSearchStore {
            client,
            index_name: config.index.clone(),
        })
    }

    fn index(&self) -> Index {
        self.client.index(&self.index_name)
    }

    /// Wait for an enqueued task to settle, surfacing task-level failures
    async fn wait_for(&self, task: TaskInfo, action: &str) -> Result<(), SearchStoreError> {
        let task = task
            .wait_for_completion(&self.client, None, None)
            .await
            .map_err(|e| SearchStoreError::Operation(format!("Failed to {}: {}", action, e)))?;

        match task {
            Task::Failed { content } => Err(SearchStoreError::Operation(format!(
                "Failed to {}: {}",
                action, content.error
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SearchStore for MeiliSearchStore {
    async fn ensure_text_index(&self) -> Result<(), SearchStoreError> {
        match self.client.get_index(&self.index_name).await {
            Ok(_) => {
                debug!("Index {} already exists", self.index_name);
            }
            Err(MeiliError::Meilisearch(MeilisearchError {
                error_code: ErrorCode::IndexNotFound,
                ..
            })) => {
                info!("Creating search index {}", self.index_name);
                let task = self
                    .client
                    .create_index(&self.index_name, Some("id"))
                    .await
                    .map_err(|e| {
                        SearchStoreError::Index(format!(
                            "Failed to create index {}: {}",
                            self.index_name, e
                        ))
                    })?;
                self.wait_for(task, "create the index").await?;
            }
            Err(e) => {
                return Err(SearchStoreError::Index(format!(
                    "Failed to look up index {}: {}",
                    self.index_name, e
                )));
            }
        }

        let settings = Settings::new()
            .with_searchable_attributes(TEXT_SEARCH_FIELDS)
            .with_sortable_attributes([SORT_FIELD]);

        let index = self.index();
        let task = index.set_settings(&settings).await.map_err(|e| {
            SearchStoreError::Index(format!("Failed to apply index settings: {}", e))
        })?;
        self.wait_for(task, "apply the index settings").await
    }

    async fn count_documents(&self) -> Result<u64, SearchStoreError> {
        let index = self.index();
        let stats = match index.get_stats().await {
            Ok(stats) => stats,
            // An absent index holds no documents
            Err(MeiliError::Meilisearch(MeilisearchError {
                error_code: ErrorCode::IndexNotFound,
                ..
            })) => return Ok(0),
            Err(e) => {
                return Err(SearchStoreError::Operation(format!(
                    "Failed to read index stats: {}",
                    e
                )));
            }
        };

        Ok(stats.number_of_documents as u64)
    }

    async fn upsert_documents(&self, documents: &[SearchDocument]) -> Result<(), SearchStoreError> {
        if documents.is_empty() {
            return Ok(());
        }

        debug!(
            "Writing {} documents to index {}",
            documents.len(),
            self.index_name
        );

        let index = self.index();
        let task = index
            .add_or_update(documents, Some("id"))
            .await
            .map_err(|e| SearchStoreError::Operation(format!("Failed to write documents: {}", e)))?;
        self.wait_for(task, "write documents").await
    }

    async fn latest_update_time(&self) -> Result<Option<DateTime<Utc>>, SearchStoreError> {
        let index = match self.client.get_index(&self.index_name).await {
            Ok(index) => index,
            Err(MeiliError::Meilisearch(MeilisearchError {
                error_code: ErrorCode::IndexNotFound,
                ..
            })) => return Ok(None),
            Err(e) => {
                return Err(SearchStoreError::Operation(format!(
                    "Failed to look up index {}: {}",
                    self.index_name, e
                )));
            }
        };

        let sort = format!("{}:desc", SORT_FIELD);
        let results: SearchResults<SearchDocument> = index
            .search()
            .with_sort(&[sort.as_str()])
            .with_limit(1)
            .execute()
            .await
            .map_err(|e| {
                SearchStoreError::Operation(format!("Failed to query the newest document: {}", e))
            })?;

        Ok(results.hits.into_iter().next().map(|hit| hit.result.updated_at))
    }

    async fn search(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<SearchDocument>, SearchStoreError> {
        let index = self.index();
        let results: SearchResults<SearchDocument> = index
            .search()
            .with_query(term)
            .with_limit(limit)
            .execute()
            .await
            .map_err(|e| SearchStoreError::Operation(format!("Search query failed: {}", e)))?;

        Ok(results.hits.into_iter().map(|hit| hit.result).collect())
    }

    async fn clear_documents(&self) -> Result<(), SearchStoreError> {
        let index = match self.client.get_index(&self.index_name).await {
            Ok(index) => index,
            Err(MeiliError::Meilisearch(MeilisearchError {
                error_code: ErrorCode::IndexNotFound,
                ..
            })) => {
                debug!("Index {} does not exist, nothing to clear", self.index_name);
                return Ok(());
            }
            Err(e) => {
                return Err(SearchStoreError::Operation(format!(
                    "Failed to look up index {}: {}",
                    self.index_name, e
                )));
            }
        };

        info!("Clearing all documents from index {}", self.index_name);
        let task = index.delete_all_documents().await.map_err(|e| {
            SearchStoreError::Operation(format!("Failed to clear the index: {}", e))
        })?;
        self.wait_for(task, "clear the index").await
    }

    #[cfg(test)]
    async fn get_document(&self, id: Uuid) -> Result<Option<SearchDocument>, SearchStoreError> {
        let index = self.index();
        match index.get_document::<SearchDocument>(&id.to_string()).await {
            Ok(document) => Ok(Some(document)),
            Err(MeiliError::Meilisearch(MeilisearchError {
                error_code: ErrorCode::DocumentNotFound,
                ..
            })) => Ok(None),
            Err(e) => Err(SearchStoreError::Operation(format!(
                "Failed to get document {}: {}",
                id, e
            ))),
        }
    }
}
