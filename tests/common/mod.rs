//! Shared fixtures for the integration tests.

#![allow(dead_code)]

pub mod fixtures;

use nonrel_resources::storage::{
    Filters, InMemoryDocumentStore, ParentDocument, ParentLookup, ParentPersistence, StorageError,
};
use std::sync::Once;

static INIT: Once = Once::new();

/// Install `env_logger` once so `RUST_LOG=debug` shows library logs.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Store that loads documents normally and fails every save.
#[derive(Clone, Default)]
pub struct FailingSaveStore {
    pub inner: InMemoryDocumentStore,
}

impl ParentLookup for FailingSaveStore {
    async fn fetch(
        &self,
        resource_name: &str,
        filters: &Filters,
    ) -> Result<Option<ParentDocument>, StorageError> {
        self.inner.fetch(resource_name, filters).await
    }
}

impl ParentPersistence for FailingSaveStore {
    async fn save(
        &self,
        _resource_name: &str,
        _document: &ParentDocument,
    ) -> Result<(), StorageError> {
        Err(StorageError::unavailable("backend offline"))
    }
}
