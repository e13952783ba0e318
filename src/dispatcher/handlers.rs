//! Per-verb handlers for embedded collection routes.

use super::core::{ApiResponse, Method};
use crate::error::{HttpStatus, ResourceError, ResourceResult};
use crate::resource::{BoundCollection, CollectionItem, RequestContext, UpsertOutcome};
use crate::routing::RequestType;
use crate::storage::DocumentStore;
use serde_json::{Value, json};

/// Reject verbs the route type doesn't support.
pub(super) fn ensure_allowed(request_type: RequestType, method: Method) -> ResourceResult<()> {
    let allowed = match request_type {
        RequestType::List => matches!(
            method,
            Method::Get | Method::Post | Method::Put | Method::Delete
        ),
        RequestType::Detail => matches!(method, Method::Get | Method::Put | Method::Delete),
    };

    if allowed {
        Ok(())
    } else {
        Err(ResourceError::MethodNotAllowed {
            method: method.to_string(),
            request_type: request_type.to_string(),
        })
    }
}

/// Handle a request against the collection route.
pub(super) async fn handle_list<S: DocumentStore>(
    mut collection: BoundCollection<'_, S>,
    method: Method,
    body: Option<&Value>,
    context: &RequestContext,
) -> ResourceResult<ApiResponse> {
    match method {
        Method::Get => {
            let items = collection.list()?;
            Ok(ApiResponse::new(
                HttpStatus::Ok,
                Some(list_body(&items)),
                context,
            ))
        }
        Method::Post => {
            let item = collection.create(require_body(body, method)?).await?;
            Ok(created(item, context))
        }
        Method::Put => {
            let payloads = replacement_payloads(require_body(body, method)?)?;
            collection.replace_all(payloads).await?;
            Ok(ApiResponse::new(HttpStatus::NoContent, None, context))
        }
        Method::Delete => {
            collection.delete_all().await?;
            Ok(ApiResponse::new(HttpStatus::NoContent, None, context))
        }
        Method::Patch => Err(ResourceError::MethodNotAllowed {
            method: method.to_string(),
            request_type: RequestType::List.to_string(),
        }),
    }
}

/// Handle a request against the item route.
pub(super) async fn handle_detail<S: DocumentStore>(
    mut collection: BoundCollection<'_, S>,
    index: usize,
    method: Method,
    body: Option<&Value>,
    context: &RequestContext,
) -> ResourceResult<ApiResponse> {
    match method {
        Method::Get => {
            let item = collection.get(index)?;
            Ok(ApiResponse::new(
                HttpStatus::Ok,
                Some(item.to_json()),
                context,
            ))
        }
        Method::Put => {
            let payload = require_body(body, method)?;
            match collection.upsert(Some(index), payload).await? {
                UpsertOutcome::Updated(item) => Ok(ApiResponse::new(
                    HttpStatus::Accepted,
                    Some(item.to_json()),
                    context,
                )),
                UpsertOutcome::Created(item) => Ok(created(item, context)),
            }
        }
        Method::Delete => {
            collection.delete(index).await?;
            Ok(ApiResponse::new(HttpStatus::NoContent, None, context))
        }
        Method::Post | Method::Patch => Err(ResourceError::MethodNotAllowed {
            method: method.to_string(),
            request_type: RequestType::Detail.to_string(),
        }),
    }
}

fn created(item: CollectionItem, context: &RequestContext) -> ApiResponse {
    ApiResponse::new(HttpStatus::Created, Some(item.to_json()), context)
        .with_location(item.resource_uri)
}

fn list_body(items: &[CollectionItem]) -> Value {
    json!({
        "meta": {"total_count": items.len()},
        "objects": items.iter().map(CollectionItem::to_json).collect::<Vec<_>>(),
    })
}

fn require_body(body: Option<&Value>, method: Method) -> ResourceResult<&Value> {
    body.ok_or_else(|| ResourceError::invalid_request(format!("{} requires a JSON body", method)))
}

/// Accept either a bare array or `{"objects": [...]}`.
fn replacement_payloads(body: &Value) -> ResourceResult<&[Value]> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(map) => match map.get("objects") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ResourceError::invalid_request(
                "replacement body must contain an 'objects' array",
            )),
        },
        _ => Err(ResourceError::invalid_request(
            "replacement body must be an array of items",
        )),
    }
}
