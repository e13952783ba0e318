//! Embedded collections exposed as resources.
//!
//! An embedded collection is a list attribute of a parent document. Items have
//! no identity of their own: an item is addressed by its current position in
//! the list, and that position is re-derived on every read. Every mutation
//! loads the parent, changes the list in memory and writes the whole parent
//! back.
//!
//! The flow for one request is:
//!
//! 1. [`EmbeddedCollectionResource::for_field`] picks the collection binding
//! 2. [`EmbeddedCollectionResource::bind`] loads the parent from the route params
//! 3. One operation runs on the resulting [`BoundCollection`]
//!
//! The binding is dropped at the end of the request; nothing is cached.

use super::context::RequestContext;
use super::definition::{EmbeddedCollectionField, ResourceDefinition};
use crate::config::ApiConfig;
use crate::error::{ResourceError, ResourceResult, ValidationError};
use crate::routing::RouteParams;
use crate::schema::Hydrator;
use crate::storage::{DocumentStore, Filters, ParentDocument};
use log::{debug, info, warn};
use serde_json::{Value, json};

/// Key under which an item's index is rendered.
pub const IDENTITY_FIELD: &str = "id";

/// Key under which an item's URI is rendered.
pub const RESOURCE_URI_FIELD: &str = "resource_uri";

/// Route parameters that address the API rather than the parent document.
pub const ROUTING_KEYS: [&str; 4] = ["api_name", "resource_name", "subresource_name", "index"];

/// An item as seen by a client: its current index, URI and stored data.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionItem {
    pub index: usize,
    pub resource_uri: String,
    pub data: Value,
}

impl CollectionItem {
    /// Render the item with its transient `id` and `resource_uri`.
    pub fn to_json(&self) -> Value {
        let mut rendered = self.data.clone();
        if let Value::Object(map) = &mut rendered {
            map.insert(IDENTITY_FIELD.to_string(), json!(self.index));
            map.insert(
                RESOURCE_URI_FIELD.to_string(),
                Value::String(self.resource_uri.clone()),
            );
        }
        rendered
    }
}

/// Result of an update addressed by index.
///
/// A missing index is an outcome rather than an error so that callers can
/// fall back to creation without catching unrelated failures.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(CollectionItem),
    IndexMissing,
}

impl UpdateOutcome {
    /// Treat a missing index as a not-found error.
    pub fn into_result(self, index: usize) -> ResourceResult<CollectionItem> {
        match self {
            Self::Updated(item) => Ok(item),
            Self::IndexMissing => Err(ResourceError::not_found(format!(
                "no item at index {}",
                index
            ))),
        }
    }
}

/// Result of an upsert.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    /// An existing item was replaced.
    Updated(CollectionItem),
    /// A new item was appended; its URI is the `Location` of the response.
    Created(CollectionItem),
}

impl UpsertOutcome {
    pub fn item(&self) -> &CollectionItem {
        match self {
            Self::Updated(item) | Self::Created(item) => item,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Parse an index route segment.
pub fn parse_index(raw: &str) -> ResourceResult<usize> {
    raw.parse::<usize>()
        .map_err(|_| ResourceError::invalid_request(format!("index '{}' is not a valid position", raw)))
}

/// An embedded collection of one parent resource, not yet bound to a parent document.
///
/// Instances are built per request from the parent definition; they hold only
/// borrowed collaborators and carry no state between requests.
pub struct EmbeddedCollectionResource<'a, S> {
    parent: &'a ResourceDefinition,
    field: &'a EmbeddedCollectionField,
    store: &'a S,
    hydrator: &'a dyn Hydrator,
    config: &'a ApiConfig,
    context: RequestContext,
}

impl<'a, S: DocumentStore> EmbeddedCollectionResource<'a, S> {
    /// Build the resource for `field_name` of `parent`.
    ///
    /// Fails with [`ResourceError::NotFound`] when the parent declares no such
    /// embedded collection.
    pub fn for_field(
        parent: &'a ResourceDefinition,
        field_name: &str,
        store: &'a S,
        hydrator: &'a dyn Hydrator,
        config: &'a ApiConfig,
        context: RequestContext,
    ) -> ResourceResult<Self> {
        let field = parent.collection(field_name).ok_or_else(|| {
            ResourceError::not_found(format!(
                "resource '{}' has no embedded collection '{}'",
                parent.name(),
                field_name
            ))
        })?;

        Ok(Self {
            parent,
            field,
            store,
            hydrator,
            config,
            context,
        })
    }

    pub fn field(&self) -> &EmbeddedCollectionField {
        self.field
    }

    /// Load the parent document addressed by `params`.
    ///
    /// The routing keys are removed and what remains (normally just `pk`) is
    /// used as lookup filters. A missing parent is [`ResourceError::Gone`].
    pub async fn bind(self, params: &RouteParams) -> ResourceResult<BoundCollection<'a, S>> {
        let filters: Filters = params
            .iter()
            .filter(|(key, _)| !ROUTING_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        debug!(
            "Loading parent {} with filters {:?} for '{}' (request: '{}')",
            self.parent.name(),
            filters,
            self.field.name(),
            self.context.request_id
        );

        let document = self
            .store
            .fetch(self.parent.name(), &filters)
            .await?
            .ok_or_else(|| {
                ResourceError::gone(format!(
                    "{} matching {:?} no longer exists",
                    self.parent.name(),
                    filters
                ))
            })?;

        Ok(BoundCollection {
            resource: self,
            document,
        })
    }
}

/// An embedded collection bound to one loaded parent document.
///
/// All operations work on the in-memory copy of the parent. Mutations save the
/// whole parent before returning; if the save fails the error is returned and
/// the binding should be discarded.
///
/// There is no locking: two requests mutating the same parent concurrently
/// each save their own copy and the later save wins.
pub struct BoundCollection<'a, S> {
    resource: EmbeddedCollectionResource<'a, S>,
    document: ParentDocument,
}

impl<'a, S: DocumentStore> BoundCollection<'a, S> {
    /// The loaded parent document.
    pub fn document(&self) -> &ParentDocument {
        &self.document
    }

    pub fn len(&self) -> ResourceResult<usize> {
        Ok(self.items()?.len())
    }

    pub fn is_empty(&self) -> ResourceResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Every item, indexed by current position.
    pub fn list(&self) -> ResourceResult<Vec<CollectionItem>> {
        Ok(self
            .items()?
            .iter()
            .enumerate()
            .map(|(index, data)| self.view(index, data))
            .collect())
    }

    /// The item at `index`. Out of range is [`ResourceError::Gone`].
    pub fn get(&self, index: usize) -> ResourceResult<CollectionItem> {
        let items = self.items()?;
        items
            .get(index)
            .map(|data| self.view(index, data))
            .ok_or_else(|| self.gone(index, items.len()))
    }

    /// Hydrate `payload` and append it.
    pub async fn create(&mut self, payload: &Value) -> ResourceResult<CollectionItem> {
        let item = self.hydrate(payload, None)?;
        let attribute = self.resource.field.attribute();
        let items = self.document.sequence_mut(attribute)?;
        items.push(item);
        let index = items.len() - 1;

        self.save().await?;
        info!(
            "Created {} item {} on {} {} (request: '{}')",
            self.resource.field.name(),
            index,
            self.resource.parent.name(),
            self.document.pk(),
            self.resource.context.request_id
        );
        self.get(index)
    }

    /// Replace the item at `index`.
    ///
    /// Fields absent from the payload keep their current value. A payload `id`
    /// different from `index` moves the item: it is removed from `index` and
    /// inserted at `id`, clamped to the end of the list.
    pub async fn update(&mut self, index: usize, payload: &Value) -> ResourceResult<UpdateOutcome> {
        let attribute = self.resource.field.attribute();
        let Some(current) = self.items()?.get(index).cloned() else {
            debug!(
                "No {} item at index {} (request: '{}')",
                self.resource.field.name(),
                index,
                self.resource.context.request_id
            );
            return Ok(UpdateOutcome::IndexMissing);
        };

        let item = self.hydrate(payload, Some(&current))?;
        let requested = target_index(payload, index)?;

        let items = self.document.sequence_mut(attribute)?;
        items.remove(index);
        let target = requested.min(items.len());
        items.insert(target, item);

        self.save().await?;
        if target != index {
            debug!(
                "Moved {} item from {} to {} (request: '{}')",
                self.resource.field.name(),
                index,
                target,
                self.resource.context.request_id
            );
        }
        self.get(target).map(UpdateOutcome::Updated)
    }

    /// Update the item at `index`, or create a new one when there is none.
    ///
    /// Only a missing index falls back to creation; validation and
    /// persistence failures are returned as they are.
    pub async fn upsert(
        &mut self,
        index: Option<usize>,
        payload: &Value,
    ) -> ResourceResult<UpsertOutcome> {
        if let Some(index) = index {
            match self.update(index, payload).await? {
                UpdateOutcome::Updated(item) => return Ok(UpsertOutcome::Updated(item)),
                UpdateOutcome::IndexMissing => {
                    warn!(
                        "Index {} missing on {} {}, creating instead (request: '{}')",
                        index,
                        self.resource.field.name(),
                        self.document.pk(),
                        self.resource.context.request_id
                    );
                }
            }
        }

        self.create(payload).await.map(UpsertOutcome::Created)
    }

    /// Remove the item at `index`. Out of range is [`ResourceError::Gone`].
    pub async fn delete(&mut self, index: usize) -> ResourceResult<()> {
        let items = self.document.sequence_mut(self.resource.field.attribute())?;
        if index >= items.len() {
            let len = items.len();
            return Err(self.gone(index, len));
        }
        items.remove(index);

        self.save().await?;
        info!(
            "Deleted {} item {} on {} {} (request: '{}')",
            self.resource.field.name(),
            index,
            self.resource.parent.name(),
            self.document.pk(),
            self.resource.context.request_id
        );
        Ok(())
    }

    /// Empty the collection.
    pub async fn delete_all(&mut self) -> ResourceResult<()> {
        self.document
            .replace_sequence(self.resource.field.attribute(), Vec::new())?;
        self.save().await?;
        info!(
            "Cleared {} on {} {} (request: '{}')",
            self.resource.field.name(),
            self.resource.parent.name(),
            self.document.pk(),
            self.resource.context.request_id
        );
        Ok(())
    }

    /// Replace the whole collection with freshly hydrated payloads.
    ///
    /// Every payload is hydrated before anything changes, so a single invalid
    /// payload leaves the collection untouched.
    pub async fn replace_all(&mut self, payloads: &[Value]) -> ResourceResult<Vec<CollectionItem>> {
        let items = payloads
            .iter()
            .map(|payload| self.hydrate(payload, None))
            .collect::<ResourceResult<Vec<_>>>()?;

        self.document
            .replace_sequence(self.resource.field.attribute(), items)?;
        self.save().await?;
        info!(
            "Replaced {} on {} {} with {} items (request: '{}')",
            self.resource.field.name(),
            self.resource.parent.name(),
            self.document.pk(),
            payloads.len(),
            self.resource.context.request_id
        );
        self.list()
    }

    /// URI of the collection itself.
    pub fn collection_uri(&self) -> String {
        self.resource.config.collection_uri(
            self.resource.parent.name(),
            self.document.pk(),
            self.resource.field.name(),
        )
    }

    fn items(&self) -> ResourceResult<&[Value]> {
        Ok(self.document.sequence(self.resource.field.attribute())?)
    }

    fn view(&self, index: usize, data: &Value) -> CollectionItem {
        CollectionItem {
            index,
            resource_uri: self.resource.config.item_uri(
                self.resource.parent.name(),
                Some(self.document.pk()),
                self.resource.field.name(),
                index,
            ),
            data: data.clone(),
        }
    }

    fn hydrate(&self, payload: &Value, existing: Option<&Value>) -> ResourceResult<Value> {
        let mut item = self
            .resource
            .hydrator
            .hydrate(payload, self.resource.field.item_schema(), existing)?;
        if let Value::Object(map) = &mut item {
            map.remove(IDENTITY_FIELD);
            map.remove(RESOURCE_URI_FIELD);
        }
        Ok(item)
    }

    async fn save(&self) -> ResourceResult<()> {
        self.resource
            .store
            .save(self.resource.parent.name(), &self.document)
            .await
            .map_err(|e| {
                warn!(
                    "Saving {} {} failed: {} (request: '{}')",
                    self.resource.parent.name(),
                    self.document.pk(),
                    e,
                    self.resource.context.request_id
                );
                ResourceError::from(e)
            })
    }

    fn gone(&self, index: usize, len: usize) -> ResourceError {
        ResourceError::gone(format!(
            "{} has no item at index {} ({} items)",
            self.resource.field.name(),
            index,
            len
        ))
    }
}

/// Where an updated item should end up, read from the payload's `id`.
///
/// A missing or null `id` keeps the current position. Integers and numeric
/// strings are accepted; anything else is a validation error.
fn target_index(payload: &Value, current: usize) -> ResourceResult<usize> {
    let invalid = |value: &Value| {
        ResourceError::from(ValidationError::InvalidTargetIndex {
            value: value.to_string(),
        })
    };

    match payload.get(IDENTITY_FIELD) {
        None | Some(Value::Null) => Ok(current),
        Some(value @ Value::Number(number)) => number
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| invalid(value)),
        Some(value @ Value::String(raw)) => raw.trim().parse::<usize>().map_err(|_| invalid(value)),
        Some(other) => Err(invalid(other)),
    }
}
