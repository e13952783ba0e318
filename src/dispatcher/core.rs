//! Core dispatcher types and request routing.

use crate::config::ApiConfig;
use crate::error::{HttpStatus, ResourceError, ResourceResult};
use crate::resource::{EmbeddedCollectionResource, RequestContext, ResourceDefinition};
use crate::routing::{RequestType, Route, RouteParams, RouteTable, RouteTarget};
use crate::schema::Hydrator;
use crate::storage::DocumentStore;
use log::{debug, info, warn};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// HTTP verbs understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(ResourceError::invalid_request(format!(
                "unsupported method '{}'",
                other
            ))),
        }
    }
}

/// Transport-neutral request against the API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Full request path, including the configured prefix
    pub path: String,
    /// Parsed JSON body, if any
    pub body: Option<Value>,
    /// Request ID for tracing and correlation
    pub request_id: Option<String>,
}

/// Transport-neutral response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: HttpStatus,
    /// `Location` header value, set when an item was created
    pub location: Option<String>,
    pub body: Option<Value>,
    pub request_id: String,
}

impl ApiResponse {
    pub(super) fn new(status: HttpStatus, body: Option<Value>, context: &RequestContext) -> Self {
        Self {
            status,
            location: None,
            body,
            request_id: context.request_id.clone(),
        }
    }

    pub(super) fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

pub(super) struct RegisteredResource {
    pub(super) definition: ResourceDefinition,
    pub(super) routes: RouteTable,
}

/// Routes requests to the embedded collections of registered resources.
///
/// The dispatcher owns the registered definitions and the collaborators. It
/// keeps no per-request state: every request builds a fresh collection
/// resource, binds it to a freshly loaded parent and drops it afterwards.
pub struct Dispatcher<S> {
    pub(super) resources: Vec<RegisteredResource>,
    pub(super) store: S,
    pub(super) hydrator: Box<dyn Hydrator>,
    pub(super) config: ApiConfig,
}

impl<S: DocumentStore> Dispatcher<S> {
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registered resource definitions, in registration order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceDefinition> {
        self.resources.iter().map(|r| &r.definition)
    }

    /// Every route, in matching order per resource.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.resources.iter().flat_map(|r| r.routes.routes())
    }

    /// Handle a request. Errors are rendered into the response.
    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        let context = request
            .request_id
            .clone()
            .map(RequestContext::new)
            .unwrap_or_else(RequestContext::with_generated_id);
        let request_id = context.request_id.clone();

        info!(
            "Dispatching {} {} (request: '{}')",
            request.method, request.path, request_id
        );

        let result = self.route(&request, &context).await;

        match &result {
            Ok(response) => {
                debug!(
                    "Dispatch completed with {} (request: '{}')",
                    response.status, request_id
                );
            }
            Err(e) => {
                warn!(
                    "Dispatch of {} {} failed: {} (request: '{}')",
                    request.method, request.path, e, request_id
                );
            }
        }

        result.unwrap_or_else(|e| super::errors::create_error_response(&e, request_id))
    }

    async fn route(
        &self,
        request: &ApiRequest,
        context: &RequestContext,
    ) -> ResourceResult<ApiResponse> {
        let no_route = || ResourceError::not_found(format!("no route matches '{}'", request.path));

        let segments = self.config.strip_prefix(&request.path).ok_or_else(no_route)?;
        let (registered, matched) = self
            .resources
            .iter()
            .find_map(|r| r.routes.resolve(&segments).map(|m| (r, m)))
            .ok_or_else(no_route)?;

        let mut params = matched.params;
        if let Some(api_name) = &self.config.api_name {
            params.insert("api_name".to_string(), api_name.clone());
        }

        match matched.target {
            RouteTarget::Subresource(request_type) => {
                self.dispatch_subresource(
                    &registered.definition,
                    request_type,
                    request.method,
                    params,
                    request.body.as_ref(),
                    context,
                )
                .await
            }
            RouteTarget::Parent(_) => Err(ResourceError::not_found(format!(
                "'{}' is not an embedded collection route",
                request.path
            ))),
        }
    }

    /// Forward a matched subresource route to a fresh collection resource.
    ///
    /// `params` are the captured route parameters; `subresource_name` selects
    /// the embedded collection and the rest identify the parent document.
    pub async fn dispatch_subresource(
        &self,
        parent: &ResourceDefinition,
        request_type: RequestType,
        method: Method,
        params: RouteParams,
        body: Option<&Value>,
        context: &RequestContext,
    ) -> ResourceResult<ApiResponse> {
        let field_name = params
            .get("subresource_name")
            .ok_or_else(|| ResourceError::invalid_request("route has no subresource name"))?;

        let resource = EmbeddedCollectionResource::for_field(
            parent,
            field_name,
            &self.store,
            &*self.hydrator,
            &self.config,
            context.clone(),
        )?;

        super::handlers::ensure_allowed(request_type, method)?;

        match request_type {
            RequestType::List => {
                let collection = resource.bind(&params).await?;
                super::handlers::handle_list(collection, method, body, context).await
            }
            RequestType::Detail => {
                let index = params
                    .get("index")
                    .ok_or_else(|| ResourceError::invalid_request("detail route has no index"))
                    .and_then(|raw| crate::resource::parse_index(raw))?;
                let collection = resource.bind(&params).await?;
                super::handlers::handle_detail(collection, index, method, body, context).await
            }
        }
    }
}
