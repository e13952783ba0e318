//! Hydration of raw payloads into stored items.
//!
//! Hydration is the only place where inbound data is checked against the
//! descriptor set. The output is the JSON object that gets stored inside the
//! parent document.

use super::types::{FieldDescriptor, FieldType, NestedSchema, ResourceSchema};
use crate::error::{ValidationError, ValidationResult};
use crate::storage::json_type_name;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

/// Converts a raw payload into an item using a descriptor set.
pub trait Hydrator: Send + Sync {
    /// Hydrate `payload` against `schema`.
    ///
    /// `existing` is the item being updated, if any. Fields the payload omits
    /// keep their existing value.
    fn hydrate(
        &self,
        payload: &Value,
        schema: &ResourceSchema,
        existing: Option<&Value>,
    ) -> ValidationResult<Value>;
}

/// Default [`Hydrator`]: type checks every described field and drops unknown keys.
///
/// For a field absent from the payload, the value is taken from the existing
/// item, then from the descriptor's default rule, then `null` when nullable;
/// otherwise hydration fails with [`ValidationError::MissingField`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaHydrator;

impl Hydrator for SchemaHydrator {
    fn hydrate(
        &self,
        payload: &Value,
        schema: &ResourceSchema,
        existing: Option<&Value>,
    ) -> ValidationResult<Value> {
        let object = payload
            .as_object()
            .ok_or_else(|| ValidationError::NotAnObject {
                actual: json_type_name(payload).to_string(),
            })?;

        let mut item = Map::new();
        for descriptor in schema.iter() {
            let value = match object.get(&descriptor.name) {
                Some(value) => self.hydrate_value(descriptor, value)?,
                None => Self::fallback_value(descriptor, existing)?,
            };
            item.insert(descriptor.attribute.clone(), value);
        }

        Ok(Value::Object(item))
    }
}

impl SchemaHydrator {
    fn fallback_value(
        descriptor: &FieldDescriptor,
        existing: Option<&Value>,
    ) -> ValidationResult<Value> {
        if let Some(current) = existing.and_then(|item| item.get(&descriptor.attribute)) {
            return Ok(current.clone());
        }
        if let Some(default) = descriptor.default.resolve() {
            return Ok(default);
        }
        if descriptor.nullable {
            return Ok(Value::Null);
        }
        Err(ValidationError::missing_field(&descriptor.name))
    }

    fn hydrate_value(&self, descriptor: &FieldDescriptor, value: &Value) -> ValidationResult<Value> {
        if value.is_null() {
            return if descriptor.nullable {
                Ok(Value::Null)
            } else {
                Err(ValidationError::NullNotAllowed {
                    field: descriptor.name.clone(),
                })
            };
        }

        let expect = |ok: bool| {
            if ok {
                Ok(value.clone())
            } else {
                Err(ValidationError::invalid_type(
                    &descriptor.name,
                    descriptor.field_type.as_str(),
                    json_type_name(value),
                ))
            }
        };

        match descriptor.field_type {
            FieldType::String | FieldType::File => expect(value.is_string()),
            FieldType::Boolean => expect(value.is_boolean()),
            FieldType::Integer => expect(value.is_i64() || value.is_u64()),
            FieldType::Float => expect(value.is_number()),
            FieldType::Dict => expect(value.is_object()),
            FieldType::List => expect(value.is_array()),
            FieldType::DateTime => {
                expect(value.is_string())?;
                Self::check_datetime(&descriptor.name, value)
            }
            FieldType::Embedded => {
                expect(value.is_object())?;
                match &descriptor.nested {
                    Some(nested) => self
                        .hydrate(value, nested.schema(), None)
                        .map_err(|e| e.nested_in(&descriptor.name)),
                    None => Ok(value.clone()),
                }
            }
            FieldType::EmbeddedList => {
                let items = expect(value.is_array())?;
                match &descriptor.nested {
                    Some(NestedSchema::Of(schema)) | Some(NestedSchema::To(schema)) => {
                        let hydrated = items
                            .as_array()
                            .into_iter()
                            .flatten()
                            .enumerate()
                            .map(|(index, item)| {
                                self.hydrate(item, schema, None).map_err(|e| {
                                    e.nested_in(&format!("{}.{}", descriptor.name, index))
                                })
                            })
                            .collect::<ValidationResult<Vec<_>>>()?;
                        Ok(Value::Array(hydrated))
                    }
                    None => Ok(items),
                }
            }
        }
    }

    /// Accepts RFC 3339 datetimes, naive `YYYY-MM-DDTHH:MM:SS[.f]` and plain dates.
    fn check_datetime(field: &str, value: &Value) -> ValidationResult<Value> {
        let raw = value.as_str().unwrap_or_default();
        let parses = DateTime::parse_from_rfc3339(raw).is_ok()
            || NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
            || NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok();

        if parses {
            Ok(value.clone())
        } else {
            Err(ValidationError::InvalidDateTime {
                field: field.to_string(),
                value: raw.to_string(),
            })
        }
    }
}
