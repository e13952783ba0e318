//! In-memory document store.
//!
//! Thread-safe implementation of [`ParentLookup`] and [`ParentPersistence`]
//! using a nested `HashMap` behind tokio's `RwLock`. Intended for tests,
//! development and embedding in services that don't need durability.
//!
//! # Example Usage
//!
//! ```rust
//! use nonrel_resources::storage::{Filters, InMemoryDocumentStore, ParentLookup};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryDocumentStore::new();
//! store.insert("blog", "1", json!({"slug": "hello", "comments": []})).await;
//!
//! // Look up by attribute instead of primary key
//! let filters = Filters::from([("slug".to_string(), "hello".to_string())]);
//! let post = store.fetch("blog", &filters).await?.expect("post exists");
//! assert_eq!(post.pk(), "1");
//! # Ok(())
//! # }
//! ```

use crate::storage::{
    Filters, PK_FILTER, ParentDocument, ParentLookup, ParentPersistence, StorageError,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Thread-safe in-memory document store.
///
/// Structure: `resource_name` → `pk` → document data. Clones share the same
/// underlying map.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    data: Arc<RwLock<HashMap<String, HashMap<String, Value>>>>,
    saves: Arc<AtomicU64>,
}

/// Counters for debugging and tests. `saves` counts successful
/// [`ParentPersistence::save`] calls, not direct inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InMemoryStoreStats {
    pub resource_count: usize,
    pub document_count: usize,
    pub saves: u64,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document directly.
    pub async fn insert(&self, resource_name: &str, pk: &str, data: Value) {
        let mut guard = self.data.write().await;
        guard
            .entry(resource_name.to_string())
            .or_default()
            .insert(pk.to_string(), data);
    }

    /// Read a document by primary key.
    pub async fn get(&self, resource_name: &str, pk: &str) -> Option<Value> {
        let guard = self.data.read().await;
        guard
            .get(resource_name)
            .and_then(|documents| documents.get(pk))
            .cloned()
    }

    /// Get store statistics.
    pub async fn stats(&self) -> InMemoryStoreStats {
        let guard = self.data.read().await;
        InMemoryStoreStats {
            resource_count: guard.len(),
            document_count: guard.values().map(HashMap::len).sum(),
            saves: self.saves.load(Ordering::Relaxed),
        }
    }

    /// Remove everything (useful for testing).
    pub async fn clear(&self) {
        self.data.write().await.clear();
    }

    /// Extract a nested attribute value from JSON data using dot notation.
    fn extract_attribute_value(data: &Value, attribute_path: &str) -> Option<String> {
        let mut current = data;

        for part in attribute_path.split('.') {
            current = match part.parse::<usize>() {
                Ok(index) => current.get(index)?,
                Err(_) => current.get(part)?,
            };
        }

        match current {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn matches(pk: &str, data: &Value, filters: &Filters) -> bool {
        filters.iter().all(|(key, expected)| {
            if key == PK_FILTER {
                pk == expected
            } else {
                Self::extract_attribute_value(data, key).as_deref() == Some(expected.as_str())
            }
        })
    }
}

impl ParentLookup for InMemoryDocumentStore {
    async fn fetch(
        &self,
        resource_name: &str,
        filters: &Filters,
    ) -> Result<Option<ParentDocument>, StorageError> {
        let guard = self.data.read().await;
        let Some(documents) = guard.get(resource_name) else {
            return Ok(None);
        };

        // Primary key lookups don't need a scan
        if let Some(pk) = filters.get(PK_FILTER) {
            return Ok(documents
                .get(pk)
                .filter(|data| Self::matches(pk, data, filters))
                .map(|data| ParentDocument::new(pk.clone(), data.clone())));
        }

        let mut found: Vec<(&String, &Value)> = documents
            .iter()
            .filter(|(pk, data)| Self::matches(pk, data, filters))
            .collect();

        match found.len() {
            0 => Ok(None),
            1 => {
                let (pk, data) = found.remove(0);
                Ok(Some(ParentDocument::new(pk.clone(), data.clone())))
            }
            n => Err(StorageError::ambiguous_lookup(resource_name, n)),
        }
    }
}

impl ParentPersistence for InMemoryDocumentStore {
    async fn save(&self, resource_name: &str, document: &ParentDocument) -> Result<(), StorageError> {
        if !document.data().is_object() {
            return Err(StorageError::invalid_data(format!(
                "document {} is not a JSON object",
                document.pk()
            )));
        }

        let mut guard = self.data.write().await;
        guard
            .entry(resource_name.to_string())
            .or_default()
            .insert(document.pk().to_string(), document.data().clone());
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
