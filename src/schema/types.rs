//! Field descriptors and resource schemas.
//!
//! A [`ResourceSchema`] is the descriptor set of one resource: built once at
//! startup, immutable afterwards, and used both for hydration and for
//! discovering embedded collections.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// API-facing field type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    String,
    DateTime,
    Boolean,
    Float,
    Integer,
    File,
    Dict,
    List,
    /// A single embedded document
    Embedded,
    /// A list of embedded documents, exposable as a subresource
    EmbeddedList,
}

impl FieldType {
    /// Tag name as it appears in descriptors and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::DateTime => "datetime",
            Self::Boolean => "boolean",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::File => "file",
            Self::Dict => "dict",
            Self::List => "list",
            Self::Embedded => "embedded",
            Self::EmbeddedList => "embedded_list",
        }
    }
}

/// What a field hydrates to when the payload omits it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    /// No default; the field is required unless nullable
    #[default]
    None,
    /// Blank-but-not-null and free-text fields default to `""`
    EmptyString,
    /// Explicit default declared on the backing field
    Value(Value),
}

impl DefaultValue {
    /// The value to use, if any.
    pub fn resolve(&self) -> Option<Value> {
        match self {
            Self::None => None,
            Self::EmptyString => Some(Value::String(String::new())),
            Self::Value(value) => Some(value.clone()),
        }
    }
}

/// Schema of the documents embedded under a field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NestedSchema {
    /// Single embedded document
    To(ResourceSchema),
    /// List of embedded documents
    Of(ResourceSchema),
}

impl NestedSchema {
    pub fn schema(&self) -> &ResourceSchema {
        match self {
            Self::To(schema) | Self::Of(schema) => schema,
        }
    }
}

/// Static metadata describing one exposed field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    /// Name in payloads
    pub name: String,
    /// Attribute on the stored document
    pub attribute: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub help_text: String,
    pub nullable: bool,
    pub unique: bool,
    pub default: DefaultValue,
    #[serde(flatten)]
    pub nested: Option<NestedSchema>,
}

impl FieldDescriptor {
    /// Create a descriptor whose attribute equals its name.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            attribute: name.clone(),
            name,
            field_type,
            help_text: String::new(),
            nullable: false,
            unique: false,
            default: DefaultValue::None,
            nested: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = default;
        self
    }

    pub fn with_nested(mut self, nested: NestedSchema) -> Self {
        self.nested = Some(nested);
        self
    }

    /// Schema of the list items, when this is an embedded list.
    pub fn item_schema(&self) -> Option<&ResourceSchema> {
        match (&self.field_type, &self.nested) {
            (FieldType::EmbeddedList, Some(NestedSchema::Of(schema))) => Some(schema),
            _ => None,
        }
    }
}

/// Name-to-descriptor mapping for one resource.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ResourceSchema {
    fields: BTreeMap<String, FieldDescriptor>,
}

impl ResourceSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor, replacing any with the same name.
    pub fn insert(&mut self, descriptor: FieldDescriptor) {
        self.fields.insert(descriptor.name.clone(), descriptor);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_field(mut self, descriptor: FieldDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldDescriptor> for ResourceSchema {
    fn from_iter<I: IntoIterator<Item = FieldDescriptor>>(iter: I) -> Self {
        let mut schema = Self::new();
        for descriptor in iter {
            schema.insert(descriptor);
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_value_resolution() {
        assert_eq!(DefaultValue::None.resolve(), None);
        assert_eq!(DefaultValue::EmptyString.resolve(), Some(json!("")));
        assert_eq!(DefaultValue::Value(json!(3)).resolve(), Some(json!(3)));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(FieldType::default(), FieldType::String);
        assert_eq!(DefaultValue::default(), DefaultValue::None);
    }

    #[test]
    fn test_item_schema_only_for_embedded_lists() {
        let items = ResourceSchema::new().with_field(FieldDescriptor::new("text", FieldType::String));

        let list = FieldDescriptor::new("comments", FieldType::EmbeddedList)
            .with_nested(NestedSchema::Of(items.clone()));
        assert!(list.item_schema().unwrap().contains("text"));

        let single = FieldDescriptor::new("author", FieldType::Embedded)
            .with_nested(NestedSchema::To(items));
        assert!(single.item_schema().is_none());
    }

    #[test]
    fn test_descriptor_serialization() {
        let descriptor = FieldDescriptor::new("title", FieldType::String)
            .unique()
            .with_default(DefaultValue::EmptyString);
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["type"], "string");
        assert_eq!(value["unique"], true);
        assert_eq!(value["default"], "empty_string");
        assert!(value.get("to").is_none());
    }
}
