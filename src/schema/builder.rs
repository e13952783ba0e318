//! Derives a resource's descriptor set from a backing model definition.

use super::model::{ModelDefinition, ModelField};
use super::resolver::{FieldKind, FieldTypeResolver};
use super::types::{DefaultValue, FieldDescriptor, NestedSchema, ResourceSchema};
use log::debug;

/// Builds a [`ResourceSchema`] from a [`ModelDefinition`].
///
/// Fields are visited in declaration order. A field is skipped when it is
/// already declared, when an include list is given and doesn't name it, when
/// the exclude list names it, or when it is a relation. Already-declared
/// descriptors are carried into the output unchanged.
///
/// ```rust
/// use nonrel_resources::schema::{
///     FieldKind, FieldType, ModelDefinition, ModelField, ResourceSchemaBuilder,
/// };
///
/// let model = ModelDefinition::new("Post")
///     .field(ModelField::new("title", FieldKind::Char))
///     .field(ModelField::new("body", FieldKind::Text))
///     .field(ModelField::new("secret", FieldKind::Char));
///
/// let schema = ResourceSchemaBuilder::new(&model).excludes(["secret"]).build();
///
/// assert_eq!(schema.get("title").unwrap().field_type, FieldType::String);
/// assert!(!schema.contains("secret"));
/// ```
#[derive(Debug, Clone)]
pub struct ResourceSchemaBuilder<'a> {
    model: &'a ModelDefinition,
    include: Vec<String>,
    exclude: Vec<String>,
    declared: ResourceSchema,
    resolver: FieldTypeResolver,
}

impl<'a> ResourceSchemaBuilder<'a> {
    pub fn new(model: &'a ModelDefinition) -> Self {
        Self {
            model,
            include: Vec::new(),
            exclude: Vec::new(),
            declared: ResourceSchema::new(),
            resolver: FieldTypeResolver::default(),
        }
    }

    /// Only derive these fields. An empty list means all fields.
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = names.into_iter().map(Into::into).collect();
        self
    }

    /// Never derive these fields.
    pub fn excludes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    /// Descriptors declared explicitly on the resource; they win over derived ones.
    pub fn declared(mut self, declared: ResourceSchema) -> Self {
        self.declared = declared;
        self
    }

    pub fn resolver(mut self, resolver: FieldTypeResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn build(self) -> ResourceSchema {
        let mut schema = self.declared.clone();

        for field in &self.model.fields {
            if self.declared.contains(&field.name) {
                continue;
            }
            if !self.include.is_empty() && !self.include.contains(&field.name) {
                continue;
            }
            if self.exclude.contains(&field.name) {
                continue;
            }
            if Self::should_skip_field(field) {
                debug!(
                    "Skipping relation field {}.{} ({})",
                    self.model.name, field.name, field.kind
                );
                continue;
            }

            schema.insert(self.derive_descriptor(field));
        }

        schema
    }

    fn should_skip_field(field: &ModelField) -> bool {
        field.reverse || field.kind.is_relation()
    }

    fn derive_descriptor(&self, field: &ModelField) -> FieldDescriptor {
        let field_type = self.resolver.resolve(&field.kind, Self::element_kind(field));

        let mut descriptor = FieldDescriptor::new(&field.name, field_type)
            .with_help_text(&field.help_text)
            .with_default(Self::default_rule(field));
        descriptor.nullable = field.null;
        descriptor.unique = field.unique;

        if let Some(model) = &field.embedded_model {
            descriptor.nested = Some(NestedSchema::To(self.nested_schema(model)));
        } else if let Some(model) = field
            .item_field
            .as_ref()
            .and_then(|item| item.embedded_model.as_ref())
        {
            descriptor.nested = Some(NestedSchema::Of(self.nested_schema(model)));
        }

        descriptor
    }

    /// Element kind as seen by the resolver. An embedded element without a
    /// model has no item schema, so it resolves as a plain list.
    fn element_kind(field: &ModelField) -> Option<&FieldKind> {
        let item = field.item_field.as_deref()?;
        match item.kind {
            FieldKind::EmbeddedModel if item.embedded_model.is_none() => None,
            _ => Some(&item.kind),
        }
    }

    /// Explicit default, else `""` for blank-but-not-null or free-text fields.
    fn default_rule(field: &ModelField) -> DefaultValue {
        match &field.default {
            Some(value) => DefaultValue::Value(value.clone()),
            None if (!field.null && field.blank) || field.kind == FieldKind::Text => {
                DefaultValue::EmptyString
            }
            None => DefaultValue::None,
        }
    }

    fn nested_schema(&self, model: &ModelDefinition) -> ResourceSchema {
        ResourceSchemaBuilder::new(model)
            .resolver(self.resolver.clone())
            .build()
    }
}
