//! Statically declared backing model definitions.
//!
//! A [`ModelDefinition`] lists a document model's fields in declaration order.
//! It is written by hand (or loaded from JSON) at startup and consumed by
//! [`ResourceSchemaBuilder`](super::ResourceSchemaBuilder); nothing inspects
//! live model objects.
//!
//! ```rust
//! use nonrel_resources::schema::{FieldKind, ModelDefinition, ModelField};
//!
//! let comment = ModelDefinition::new("Comment")
//!     .field(ModelField::new("author", FieldKind::Char))
//!     .field(ModelField::new("text", FieldKind::Text));
//!
//! let post = ModelDefinition::new("Post")
//!     .field(ModelField::new("title", FieldKind::Char).unique())
//!     .field(ModelField::new("comments", FieldKind::List).items(
//!         ModelField::new("item", FieldKind::EmbeddedModel).embedded(comment),
//!     ));
//!
//! assert_eq!(post.fields.len(), 2);
//! ```

use super::resolver::FieldKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A backing model and its ordered field declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<ModelField>,
}

impl ModelDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field declaration.
    pub fn field(mut self, field: ModelField) -> Self {
        self.fields.push(field);
        self
    }

    /// Load a definition from JSON.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

/// One declared field of a backing model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelField {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub help_text: String,
    #[serde(default)]
    pub null: bool,
    #[serde(default)]
    pub blank: bool,
    #[serde(default)]
    pub unique: bool,
    /// Explicit default. A JSON `null` here means "no default".
    #[serde(default)]
    pub default: Option<Value>,
    /// Reverse side of a relation
    #[serde(default)]
    pub reverse: bool,
    /// Model stored inline, for `EmbeddedModelField`
    #[serde(default)]
    pub embedded_model: Option<Box<ModelDefinition>>,
    /// Element declaration, for list kinds
    #[serde(default)]
    pub item_field: Option<Box<ModelField>>,
}

impl ModelField {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            help_text: String::new(),
            null: false,
            blank: false,
            unique: false,
            default: None,
            reverse: false,
            embedded_model: None,
            item_field: None,
        }
    }

    pub fn help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    pub fn null(mut self) -> Self {
        self.null = true;
        self
    }

    pub fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Store `model` inline under this field.
    pub fn embedded(mut self, model: ModelDefinition) -> Self {
        self.embedded_model = Some(Box::new(model));
        self
    }

    /// Declare the element field of a list kind.
    pub fn items(mut self, item: ModelField) -> Self {
        self.item_field = Some(Box::new(item));
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Kind of the list elements, if declared.
    pub fn element_kind(&self) -> Option<&FieldKind> {
        self.item_field.as_ref().map(|item| &item.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_from_json() {
        let model = ModelDefinition::from_json_str(
            r#"{
                "name": "Post",
                "fields": [
                    {"name": "title", "kind": "CharField", "unique": true},
                    {"name": "views", "kind": "PositiveIntegerField", "default": 0},
                    {"name": "comments", "kind": "ListField", "item_field": {
                        "name": "item",
                        "kind": "EmbeddedModelField",
                        "embedded_model": {"name": "Comment", "fields": [
                            {"name": "text", "kind": "TextField"}
                        ]}
                    }}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(model.fields[0].kind, FieldKind::Char);
        assert!(model.fields[0].unique);
        assert_eq!(model.fields[1].default, Some(json!(0)));
        assert_eq!(
            model.fields[2].element_kind(),
            Some(&FieldKind::EmbeddedModel)
        );
    }

    #[test]
    fn test_null_default_means_none() {
        let model = ModelDefinition::from_json_str(
            r#"{"name": "M", "fields": [{"name": "a", "kind": "CharField", "default": null}]}"#,
        )
        .unwrap();
        assert!(!model.fields[0].has_default());
    }
}
