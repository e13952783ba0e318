//! Mapping from backing field kinds to API field type tags.

use super::types::FieldType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Declared kind of a backing model field.
///
/// Serialized as its internal type name (`"DateTimeField"`, `"ListField"`, ...);
/// unknown names round-trip through [`FieldKind::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Char,
    Text,
    Slug,
    Email,
    Url,
    Date,
    DateTime,
    Time,
    Boolean,
    NullBoolean,
    Decimal,
    Float,
    Integer,
    PositiveInteger,
    PositiveSmallInteger,
    SmallInteger,
    BigInteger,
    File,
    Image,
    Dict,
    List,
    Set,
    EmbeddedModel,
    ForeignKey,
    OneToOne,
    ManyToMany,
    Custom(String),
}

impl FieldKind {
    const NAMED: [FieldKind; 26] = [
        Self::Char,
        Self::Text,
        Self::Slug,
        Self::Email,
        Self::Url,
        Self::Date,
        Self::DateTime,
        Self::Time,
        Self::Boolean,
        Self::NullBoolean,
        Self::Decimal,
        Self::Float,
        Self::Integer,
        Self::PositiveInteger,
        Self::PositiveSmallInteger,
        Self::SmallInteger,
        Self::BigInteger,
        Self::File,
        Self::Image,
        Self::Dict,
        Self::List,
        Self::Set,
        Self::EmbeddedModel,
        Self::ForeignKey,
        Self::OneToOne,
        Self::ManyToMany,
    ];

    /// The internal type name used as the resolver key.
    pub fn internal_type(&self) -> &str {
        match self {
            Self::Char => "CharField",
            Self::Text => "TextField",
            Self::Slug => "SlugField",
            Self::Email => "EmailField",
            Self::Url => "URLField",
            Self::Date => "DateField",
            Self::DateTime => "DateTimeField",
            Self::Time => "TimeField",
            Self::Boolean => "BooleanField",
            Self::NullBoolean => "NullBooleanField",
            Self::Decimal => "DecimalField",
            Self::Float => "FloatField",
            Self::Integer => "IntegerField",
            Self::PositiveInteger => "PositiveIntegerField",
            Self::PositiveSmallInteger => "PositiveSmallIntegerField",
            Self::SmallInteger => "SmallIntegerField",
            Self::BigInteger => "BigIntegerField",
            Self::File => "FileField",
            Self::Image => "ImageField",
            Self::Dict => "DictField",
            Self::List => "ListField",
            Self::Set => "SetField",
            Self::EmbeddedModel => "EmbeddedModelField",
            Self::ForeignKey => "ForeignKey",
            Self::OneToOne => "OneToOneField",
            Self::ManyToMany => "ManyToManyField",
            Self::Custom(name) => name,
        }
    }

    /// Parse an internal type name.
    pub fn from_internal_type(name: &str) -> Self {
        Self::NAMED
            .iter()
            .find(|kind| kind.internal_type() == name)
            .cloned()
            .unwrap_or_else(|| Self::Custom(name.to_string()))
    }

    /// Kinds holding a sequence of element values.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List | Self::Set)
    }

    /// Relation kinds, which are never exposed as plain fields.
    pub fn is_relation(&self) -> bool {
        matches!(self, Self::ForeignKey | Self::OneToOne | Self::ManyToMany)
    }
}

impl From<String> for FieldKind {
    fn from(name: String) -> Self {
        Self::from_internal_type(&name)
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.internal_type().to_string()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.internal_type())
    }
}

/// Pure mapping table from field kind to type tag.
///
/// Kinds missing from the table resolve to the fallback tag. The table is
/// injectable: start from [`FieldTypeResolver::default`] and override or add
/// entries with [`with_mapping`](Self::with_mapping).
///
/// ```rust
/// use nonrel_resources::schema::{FieldKind, FieldType, FieldTypeResolver};
///
/// let resolver = FieldTypeResolver::default()
///     .with_mapping(FieldKind::Custom("UuidField".into()), FieldType::String)
///     .with_mapping(FieldKind::Time, FieldType::DateTime);
///
/// assert_eq!(resolver.resolve(&FieldKind::Time, None), FieldType::DateTime);
/// assert_eq!(
///     resolver.resolve(&FieldKind::List, Some(&FieldKind::EmbeddedModel)),
///     FieldType::EmbeddedList
/// );
/// ```
#[derive(Debug, Clone)]
pub struct FieldTypeResolver {
    table: HashMap<String, FieldType>,
    fallback: FieldType,
}

impl FieldTypeResolver {
    /// A resolver with an empty table.
    pub fn empty(fallback: FieldType) -> Self {
        Self {
            table: HashMap::new(),
            fallback,
        }
    }

    /// Add or replace a table entry.
    pub fn with_mapping(mut self, kind: FieldKind, field_type: FieldType) -> Self {
        self.table.insert(kind.internal_type().to_string(), field_type);
        self
    }

    /// The tag used for kinds absent from the table.
    pub fn fallback(&self) -> FieldType {
        self.fallback
    }

    /// Resolve a kind, inspecting the element kind of list kinds.
    pub fn resolve(&self, kind: &FieldKind, element: Option<&FieldKind>) -> FieldType {
        if kind.is_list() && element == Some(&FieldKind::EmbeddedModel) {
            return FieldType::EmbeddedList;
        }

        self.table
            .get(kind.internal_type())
            .copied()
            .unwrap_or(self.fallback)
    }
}

impl Default for FieldTypeResolver {
    fn default() -> Self {
        use FieldKind as K;
        use FieldType as T;

        let standard = [
            (K::Date, T::DateTime),
            (K::DateTime, T::DateTime),
            (K::Boolean, T::Boolean),
            (K::NullBoolean, T::Boolean),
            (K::Decimal, T::Float),
            (K::Float, T::Float),
            (K::Integer, T::Integer),
            (K::PositiveInteger, T::Integer),
            (K::PositiveSmallInteger, T::Integer),
            (K::SmallInteger, T::Integer),
            (K::BigInteger, T::Integer),
            (K::File, T::File),
            (K::Image, T::File),
            (K::Dict, T::Dict),
            (K::List, T::List),
            (K::Set, T::List),
            (K::EmbeddedModel, T::Embedded),
        ];

        standard
            .into_iter()
            .fold(Self::empty(T::String), |resolver, (kind, field_type)| {
                resolver.with_mapping(kind, field_type)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let resolver = FieldTypeResolver::default();
        let cases = [
            (FieldKind::Date, FieldType::DateTime),
            (FieldKind::DateTime, FieldType::DateTime),
            (FieldKind::NullBoolean, FieldType::Boolean),
            (FieldKind::Decimal, FieldType::Float),
            (FieldKind::PositiveSmallInteger, FieldType::Integer),
            (FieldKind::Image, FieldType::File),
            (FieldKind::Dict, FieldType::Dict),
            (FieldKind::EmbeddedModel, FieldType::Embedded),
        ];
        for (kind, expected) in cases {
            assert_eq!(resolver.resolve(&kind, None), expected, "{}", kind);
        }
    }

    #[test]
    fn test_fallback_for_unmapped_kinds() {
        let resolver = FieldTypeResolver::default();
        assert_eq!(resolver.resolve(&FieldKind::Char, None), FieldType::String);
        assert_eq!(resolver.resolve(&FieldKind::Text, None), FieldType::String);
        assert_eq!(
            resolver.resolve(&FieldKind::Custom("GeoPtField".into()), None),
            FieldType::String
        );
    }

    #[test]
    fn test_list_element_kind() {
        let resolver = FieldTypeResolver::default();
        assert_eq!(
            resolver.resolve(&FieldKind::List, Some(&FieldKind::EmbeddedModel)),
            FieldType::EmbeddedList
        );
        assert_eq!(
            resolver.resolve(&FieldKind::List, Some(&FieldKind::Char)),
            FieldType::List
        );
        assert_eq!(resolver.resolve(&FieldKind::List, None), FieldType::List);
        // Element kind is ignored for non-list kinds
        assert_eq!(
            resolver.resolve(&FieldKind::Dict, Some(&FieldKind::EmbeddedModel)),
            FieldType::Dict
        );
    }

    #[test]
    fn test_injected_mapping() {
        let resolver = FieldTypeResolver::empty(FieldType::File)
            .with_mapping(FieldKind::Char, FieldType::String);
        assert_eq!(resolver.resolve(&FieldKind::Char, None), FieldType::String);
        assert_eq!(resolver.resolve(&FieldKind::Integer, None), FieldType::File);
        assert_eq!(resolver.fallback(), FieldType::File);
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in FieldKind::NAMED {
            assert_eq!(FieldKind::from_internal_type(kind.internal_type()), kind);
        }
        let kind: FieldKind = serde_json::from_str("\"URLField\"").unwrap();
        assert_eq!(kind, FieldKind::Url);
        let kind: FieldKind = serde_json::from_str("\"GeoPtField\"").unwrap();
        assert_eq!(kind, FieldKind::Custom("GeoPtField".to_string()));
    }
}
