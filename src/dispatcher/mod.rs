//! Transport-neutral request dispatch for embedded collections.
//!
//! The dispatcher strips the API prefix from a request path, matches it
//! against the route tables of the registered resources and forwards
//! subresource matches to a freshly built collection resource. Failures are
//! rendered into the response with the status of their error kind.
//!
//! # Key Types
//!
//! - [`Dispatcher`] - Routes requests and renders responses
//! - [`DispatcherBuilder`] - Registers resources and collaborators
//! - [`ApiRequest`] / [`ApiResponse`] - Request and response values
//!
//! # Examples
//!
//! ```rust
//! use nonrel_resources::dispatcher::{ApiRequest, DispatcherBuilder};
//! use nonrel_resources::resource::ResourceDefinition;
//! use nonrel_resources::schema::{FieldDescriptor, FieldType, NestedSchema, ResourceSchema};
//! use nonrel_resources::storage::InMemoryDocumentStore;
//! use nonrel_resources::HttpStatus;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let comment = ResourceSchema::new()
//!     .with_field(FieldDescriptor::new("text", FieldType::String));
//! let blog = ResourceDefinition::builder("blog")
//!     .schema(ResourceSchema::new().with_field(
//!         FieldDescriptor::new("comments", FieldType::EmbeddedList)
//!             .with_nested(NestedSchema::Of(comment)),
//!     ))
//!     .embedded_collection("comments")
//!     .build()?;
//!
//! let store = InMemoryDocumentStore::new();
//! store.insert("blog", "1", json!({"comments": []})).await;
//!
//! let dispatcher = DispatcherBuilder::new(store).register(blog).build()?;
//! let response = dispatcher
//!     .handle(ApiRequest::post("/blog/1/comments/", json!({"text": "hi"})))
//!     .await;
//! assert_eq!(response.status, HttpStatus::Created);
//! assert_eq!(response.location.as_deref(), Some("/blog/1/comments/0/"));
//! # Ok(())
//! # }
//! ```

mod builder;
mod core;
mod errors;
mod handlers;
mod requests;

pub use builder::DispatcherBuilder;
pub use core::{ApiRequest, ApiResponse, Dispatcher, Method};
pub use errors::create_error_response;
