//! Embedded collections of non-relational documents as REST subresources.
//!
//! A parent document (a blog post, say) often stores an ordered list of
//! sub-documents (its comments) as one attribute. This crate exposes such a
//! list under the parent's URI as its own collection:
//!
//! - `GET /blog/{pk}/comments/` lists the items
//! - `POST /blog/{pk}/comments/` appends one
//! - `GET|PUT|DELETE /blog/{pk}/comments/{index}/` address one item by position
//!
//! Items are identified by their current index only. Every mutation loads the
//! parent, changes the list and saves the whole parent back.
//!
//! # Core Components
//!
//! - [`schema`] - Field descriptors derived from model definitions, and hydration
//! - [`resource`] - Resource definitions and the embedded collection resource
//! - [`routing`] - Subresource route tables
//! - [`dispatcher`] - Request dispatch and response rendering
//! - [`storage`] - Parent lookup and persistence collaborators
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nonrel_resources::dispatcher::{ApiRequest, DispatcherBuilder};
//! use nonrel_resources::resource::ResourceDefinition;
//! use nonrel_resources::schema::{FieldKind, ModelDefinition, ModelField, ResourceSchemaBuilder};
//! use nonrel_resources::storage::InMemoryDocumentStore;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let comment = ModelDefinition::new("Comment").field(ModelField::new("text", FieldKind::Text));
//! let post = ModelDefinition::new("Post")
//!     .field(ModelField::new("title", FieldKind::Char))
//!     .field(ModelField::new("comments", FieldKind::List).items(
//!         ModelField::new("comment", FieldKind::EmbeddedModel).embedded(comment),
//!     ));
//!
//! let blog = ResourceDefinition::builder("blog")
//!     .schema(ResourceSchemaBuilder::new(&post).build())
//!     .embedded_collections_from_schema()
//!     .build()?;
//!
//! let dispatcher = DispatcherBuilder::new(InMemoryDocumentStore::new())
//!     .register(blog)
//!     .build()?;
//! let response = dispatcher.handle(ApiRequest::get("/blog/1/comments/")).await;
//! println!("{} {:?}", response.status, response.body);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod resource;
pub mod routing;
pub mod schema;
pub mod storage;

// Re-export commonly used types for convenience
pub use config::ApiConfig;
pub use dispatcher::{ApiRequest, ApiResponse, Dispatcher, DispatcherBuilder, Method};
pub use error::{
    BuildError, BuildResult, HttpStatus, ResourceError, ResourceResult, ValidationError,
    ValidationResult,
};
pub use resource::{
    BoundCollection, CollectionItem, EmbeddedCollectionResource, RequestContext,
    ResourceDefinition, UpdateOutcome, UpsertOutcome,
};
pub use routing::{RequestType, RouteTable, SubresourceRouter};
pub use storage::{DocumentStore, InMemoryDocumentStore, ParentDocument, StorageError};
