//! Parent document storage collaborators.
//!
//! The resource layer never talks to a database directly. It loads a parent
//! document once per request through [`ParentLookup`] and writes the whole
//! document back through [`ParentPersistence`] after every mutation. There is
//! no partial update: the unit of persistence is the parent document.
//!
//! # Example Usage
//!
//! ```rust
//! use nonrel_resources::storage::{
//!     Filters, InMemoryDocumentStore, ParentDocument, ParentLookup, ParentPersistence,
//! };
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryDocumentStore::new();
//! let post = ParentDocument::new("1", json!({"title": "Hello", "comments": []}));
//! store.save("blog", &post).await?;
//!
//! let filters = Filters::from([("pk".to_string(), "1".to_string())]);
//! let loaded = store.fetch("blog", &filters).await?;
//! assert_eq!(loaded, Some(post));
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod in_memory;

pub use errors::StorageError;
pub use in_memory::{InMemoryDocumentStore, InMemoryStoreStats};

use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;

/// Lookup filters taken from the request path, e.g. `{"pk": "42"}`.
///
/// The `pk` key matches the document's primary key; every other key matches a
/// (dotted) attribute of the document by its string form.
pub type Filters = BTreeMap<String, String>;

/// Filter key that addresses the primary key.
pub const PK_FILTER: &str = "pk";

/// A parent document: a primary key plus a JSON object holding its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentDocument {
    pk: String,
    data: Value,
}

impl ParentDocument {
    /// Create a document from its primary key and attribute object.
    pub fn new(pk: impl Into<String>, data: Value) -> Self {
        Self {
            pk: pk.into(),
            data,
        }
    }

    /// The stable primary key.
    pub fn pk(&self) -> &str {
        &self.pk
    }

    /// The attribute object.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Consume the document and return its attribute object.
    pub fn into_data(self) -> Value {
        self.data
    }

    /// Read an embedded sequence. A missing attribute reads as empty.
    pub fn sequence(&self, attribute: &str) -> Result<&[Value], StorageError> {
        match self.data.get(attribute) {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(Self::not_a_sequence(attribute, other)),
        }
    }

    /// Mutable access to an embedded sequence, creating it when absent.
    pub fn sequence_mut(&mut self, attribute: &str) -> Result<&mut Vec<Value>, StorageError> {
        let object = self.data.as_object_mut().ok_or_else(|| {
            StorageError::invalid_data(format!("document {} is not a JSON object", self.pk))
        })?;

        let slot = object
            .entry(attribute.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if slot.is_null() {
            *slot = Value::Array(Vec::new());
        }

        match slot {
            Value::Array(items) => Ok(items),
            other => Err(Self::not_a_sequence(attribute, other)),
        }
    }

    /// Replace an embedded sequence wholesale.
    pub fn replace_sequence(
        &mut self,
        attribute: &str,
        items: Vec<Value>,
    ) -> Result<(), StorageError> {
        let object = self.data.as_object_mut().ok_or_else(|| {
            StorageError::invalid_data(format!("document {} is not a JSON object", self.pk))
        })?;
        object.insert(attribute.to_string(), Value::Array(items));
        Ok(())
    }

    fn not_a_sequence(attribute: &str, value: &Value) -> StorageError {
        StorageError::invalid_data_with_cause(
            format!("attribute '{}' is not an embedded sequence", attribute),
            format!("found {}", json_type_name(value)),
        )
    }
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Loads a parent document for the current request.
///
/// # Behavior
/// - `Ok(None)` means no document matches the filters
/// - More than one match is [`StorageError::AmbiguousLookup`]
/// - Implementations must return a fresh copy; nothing is cached between requests
pub trait ParentLookup: Send + Sync {
    fn fetch(
        &self,
        resource_name: &str,
        filters: &Filters,
    ) -> impl Future<Output = Result<Option<ParentDocument>, StorageError>> + Send;
}

/// Persists a whole parent document, replacing whatever was stored under its key.
pub trait ParentPersistence: Send + Sync {
    fn save(
        &self,
        resource_name: &str,
        document: &ParentDocument,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// A store usable by the resource layer: both lookup and persistence.
pub trait DocumentStore: ParentLookup + ParentPersistence {}

impl<T: ParentLookup + ParentPersistence> DocumentStore for T {}
