//! Resources backed by non-relational parent documents.
//!
//! # Key Components
//!
//! * [`ResourceDefinition`] - A parent resource and its declared embedded collections
//! * [`EmbeddedCollectionResource`] - One embedded collection, before the parent is loaded
//! * [`BoundCollection`] - The same collection bound to a loaded parent document
//! * [`RequestContext`] - Request id used to correlate log lines

pub mod collection;
pub mod context;
pub mod definition;

pub use collection::{
    BoundCollection, CollectionItem, EmbeddedCollectionResource, IDENTITY_FIELD,
    RESOURCE_URI_FIELD, ROUTING_KEYS, UpdateOutcome, UpsertOutcome, parse_index,
};
pub use context::RequestContext;
pub use definition::{EmbeddedCollectionField, ResourceDefinition, ResourceDefinitionBuilder};
