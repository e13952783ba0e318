//! Field schemas for resources.
//!
//! A resource's descriptor set is derived once at startup from a statically
//! declared [`ModelDefinition`], then used to hydrate inbound payloads.
//!
//! # Key Types
//!
//! - [`FieldTypeResolver`] - Injectable mapping from backing field kinds to type tags
//! - [`ResourceSchemaBuilder`] - Derives a [`ResourceSchema`] from a model definition
//! - [`FieldDescriptor`] - Metadata for one exposed field
//! - [`Hydrator`] - Turns raw payloads into stored items
//!
//! # Examples
//!
//! ```rust
//! use nonrel_resources::schema::{
//!     FieldKind, Hydrator, ModelDefinition, ModelField, ResourceSchemaBuilder, SchemaHydrator,
//! };
//! use serde_json::json;
//!
//! let model = ModelDefinition::new("Comment")
//!     .field(ModelField::new("author", FieldKind::Char))
//!     .field(ModelField::new("text", FieldKind::Text));
//! let schema = ResourceSchemaBuilder::new(&model).build();
//!
//! let item = SchemaHydrator.hydrate(&json!({"author": "ann"}), &schema, None).unwrap();
//! assert_eq!(item, json!({"author": "ann", "text": ""}));
//! ```

pub mod builder;
pub mod hydration;
pub mod model;
pub mod resolver;
pub mod types;

pub use builder::ResourceSchemaBuilder;
pub use hydration::{Hydrator, SchemaHydrator};
pub use model::{ModelDefinition, ModelField};
pub use resolver::{FieldKind, FieldTypeResolver};
pub use types::{DefaultValue, FieldDescriptor, FieldType, NestedSchema, ResourceSchema};
