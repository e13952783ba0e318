//! Parent resource definitions and their embedded collection bindings.

use crate::error::{BuildError, BuildResult};
use crate::schema::{FieldDescriptor, FieldType, ResourceSchema};

/// One embedded-list field exposed as a subresource.
#[derive(Debug, Clone)]
pub struct EmbeddedCollectionField {
    name: String,
    attribute: String,
    item_schema: ResourceSchema,
}

impl EmbeddedCollectionField {
    /// Bind a field directly to an item schema.
    pub fn new(name: impl Into<String>, item_schema: ResourceSchema) -> Self {
        let name = name.into();
        Self {
            attribute: name.clone(),
            name,
            item_schema,
        }
    }

    /// Bind an embedded-list descriptor. Returns `None` for any other descriptor.
    pub fn from_descriptor(descriptor: &FieldDescriptor) -> Option<Self> {
        descriptor.item_schema().map(|schema| Self {
            name: descriptor.name.clone(),
            attribute: descriptor.attribute.clone(),
            item_schema: schema.clone(),
        })
    }

    /// Name used in URIs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute of the parent document holding the sequence.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn item_schema(&self) -> &ResourceSchema {
        &self.item_schema
    }
}

/// A parent resource: its name, field schema and embedded collection bindings.
///
/// Bindings are declared explicitly when the definition is built; the router
/// and dispatcher never discover them from stored data.
///
/// ```rust
/// use nonrel_resources::resource::ResourceDefinition;
/// use nonrel_resources::schema::{FieldDescriptor, FieldType, NestedSchema, ResourceSchema};
///
/// let comment = ResourceSchema::new()
///     .with_field(FieldDescriptor::new("text", FieldType::String));
/// let schema = ResourceSchema::new()
///     .with_field(FieldDescriptor::new("title", FieldType::String))
///     .with_field(
///         FieldDescriptor::new("comments", FieldType::EmbeddedList)
///             .with_nested(NestedSchema::Of(comment)),
///     );
///
/// let blog = ResourceDefinition::builder("blog")
///     .schema(schema)
///     .embedded_collection("comments")
///     .build()
///     .unwrap();
/// assert!(blog.collection("comments").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ResourceDefinition {
    name: String,
    schema: ResourceSchema,
    collections: Vec<EmbeddedCollectionField>,
}

impl ResourceDefinition {
    pub fn builder(name: impl Into<String>) -> ResourceDefinitionBuilder {
        ResourceDefinitionBuilder {
            name: name.into(),
            schema: ResourceSchema::new(),
            collection_names: Vec::new(),
            all_embedded_lists: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    pub fn collections(&self) -> &[EmbeddedCollectionField] {
        &self.collections
    }

    /// Look up a collection binding by its URI name.
    pub fn collection(&self, name: &str) -> Option<&EmbeddedCollectionField> {
        self.collections.iter().find(|field| field.name() == name)
    }
}

/// Builder for [`ResourceDefinition`].
#[derive(Debug, Clone)]
pub struct ResourceDefinitionBuilder {
    name: String,
    schema: ResourceSchema,
    collection_names: Vec<String>,
    all_embedded_lists: bool,
}

impl ResourceDefinitionBuilder {
    pub fn schema(mut self, schema: ResourceSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Expose the named embedded-list field as a subresource.
    pub fn embedded_collection(mut self, field: impl Into<String>) -> Self {
        self.collection_names.push(field.into());
        self
    }

    /// Expose every embedded-list field of the schema as a subresource.
    pub fn embedded_collections_from_schema(mut self) -> Self {
        self.all_embedded_lists = true;
        self
    }

    /// Validate the bindings against the schema and build the definition.
    pub fn build(self) -> BuildResult<ResourceDefinition> {
        let mut names = self.collection_names.clone();
        if self.all_embedded_lists {
            let embedded = self
                .schema
                .iter()
                .filter(|descriptor| descriptor.field_type == FieldType::EmbeddedList)
                .map(|descriptor| descriptor.name.clone());
            for name in embedded {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }

        let mut collections = Vec::with_capacity(names.len());
        for name in names {
            let descriptor = self
                .schema
                .get(&name)
                .ok_or_else(|| BuildError::UnknownField {
                    resource: self.name.clone(),
                    field: name.clone(),
                })?;
            let field = EmbeddedCollectionField::from_descriptor(descriptor).ok_or_else(|| {
                BuildError::NotAnEmbeddedList {
                    resource: self.name.clone(),
                    field: name.clone(),
                }
            })?;
            if collections
                .iter()
                .all(|existing: &EmbeddedCollectionField| existing.name() != field.name())
            {
                collections.push(field);
            }
        }

        Ok(ResourceDefinition {
            name: self.name,
            schema: self.schema,
            collections,
        })
    }
}
