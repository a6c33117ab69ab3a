use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use uuid::Uuid;

use crate::search::document::{SearchDocument, TEXT_SEARCH_FIELDS};
use crate::search::error::SearchStoreError;
use crate::search::store::SearchStore;

/// In-memory implementation of SearchStore for testing
pub struct FakeSearchStore {
    documents: Arc<RwLock<HashMap<Uuid, SearchDocument>>>,
    index_definitions: Arc<Mutex<Vec<Vec<String>>>>,
    upsert_calls: Arc<Mutex<u32>>,
    fail_index: Arc<Mutex<bool>>,
    fail_writes: Arc<Mutex<bool>>,
}

#[allow(dead_code)]
impl FakeSearchStore {
    pub fn new() -> Self {
        FakeSearchStore {
            documents: Arc::new(RwLock::new(HashMap::new())),
            index_definitions: Arc::new(Mutex::new(Vec::new())),
            upsert_calls: Arc::new(Mutex::new(0)),
            fail_index: Arc::new(Mutex::new(false)),
            fail_writes: Arc::new(Mutex::new(false)),
        }
    }

    /// Make ensure_text_index fail until reset
    pub fn fake_fail_index_creation(&self, fail: bool) {
        *self.fail_index.lock().unwrap() = fail;
    }

    /// Make upsert_documents fail until reset
    pub fn fake_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    /// Get the searchable field sets recorded by ensure_text_index
    pub fn fake_index_definitions(&self) -> Vec<Vec<String>> {
        self.index_definitions.lock().unwrap().clone()
    }

    /// Get the number of upsert_documents calls made so far
    pub fn fake_upsert_calls(&self) -> u32 {
        *self.upsert_calls.lock().unwrap()
    }

    /// Seed a document directly, bypassing the upsert counters
    pub fn fake_add_document(&self, document: SearchDocument) {
        self.documents
            .write()
            .unwrap()
            .insert(document.id, document);
    }
}

#[async_trait]
impl SearchStore for FakeSearchStore {
    async fn ensure_text_index(&self) -> Result<(), SearchStoreError> {
        if *self.fail_index.lock().unwrap() {
            return Err(SearchStoreError::Index(
                "Simulated index failure".to_string(),
            ));
        }

        let definition: Vec<String> = TEXT_SEARCH_FIELDS
            .iter()
            .map(|field| field.to_string())
            .collect();

        let mut definitions = self.index_definitions.lock().unwrap();
        if !definitions.contains(&definition) {
            definitions.push(definition);
        }
        Ok(())
    }

    async fn count_documents(&self) -> Result<u64, SearchStoreError> {
        Ok(self.documents.read().unwrap().len() as u64)
    }

    async fn upsert_documents(&self, documents: &[SearchDocument]) -> Result<(), SearchStoreError> {
        *self.upsert_calls.lock().unwrap() += 1;

        if *self.fail_writes.lock().unwrap() {
            return Err(SearchStoreError::Operation(
                "Simulated write failure".to_string(),
            ));
        }

        let mut stored = self.documents.write().unwrap();
        for document in documents {
            stored.insert(document.id, document.clone());
        }
        Ok(())
    }

    async fn latest_update_time(&self) -> Result<Option<DateTime<Utc>>, SearchStoreError> {
        let documents = self.documents.read().unwrap();
        Ok(documents.values().map(|doc| doc.updated_at).max())
    }

    async fn search(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<SearchDocument>, SearchStoreError> {
        let needle = term.to_lowercase();
        let documents = self.documents.read().unwrap();

        let mut matches: Vec<SearchDocument> = documents
            .values()
            .filter(|doc| {
                doc.make.to_lowercase().contains(&needle)
                    || doc.model.to_lowercase().contains(&needle)
                    || doc.color.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        // Newest first to keep results deterministic
        matches.sort_by(|a, b| b.updated_at_ts.cmp(&a.updated_at_ts));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn clear_documents(&self) -> Result<(), SearchStoreError> {
        self.documents.write().unwrap().clear();
        Ok(())
    }

    #[cfg(test)]
    async fn get_document(&self, id: Uuid) -> Result<Option<SearchDocument>, SearchStoreError> {
        Ok(self.documents.read().unwrap().get(&id).cloned())
    }
}

#[cfg(test)]
impl Default for FakeSearchStore {
    fn default() -> Self {
        Self::new()
    }
}
