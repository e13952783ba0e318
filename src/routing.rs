//! URL routes for parent resources and their embedded collections.
//!
//! Every embedded collection of a parent contributes two routes:
//!
//! - list: `{resource}/{pk}/{field}/`
//! - detail: `{resource}/{pk}/{field}/{index}/`
//!
//! They are placed before the parent's own list and detail routes so that they
//! win when matching. Paths passed to [`RouteTable::resolve`] must already have
//! the API prefix removed (see [`crate::ApiConfig::strip_prefix`]).

use crate::resource::ResourceDefinition;
use std::collections::BTreeMap;
use std::fmt;

/// Keyword parameters captured from a matched path.
pub type RouteParams = BTreeMap<String, String>;

/// Whether a route addresses a whole collection or a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    List,
    Detail,
}

impl RequestType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Detail => "detail",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What handles a matched route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    /// An embedded collection of the parent.
    Subresource(RequestType),
    /// The parent resource itself.
    Parent(RequestType),
}

impl RouteTarget {
    pub fn request_type(self) -> RequestType {
        match self {
            Self::Subresource(request_type) | Self::Parent(request_type) => request_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Fixed text captured under a parameter name.
    Fixed { key: &'static str, value: String },
    /// A `\w[\w-]*` token captured under a parameter name.
    Token(&'static str),
}

impl Segment {
    fn capture(&self, raw: &str, params: &mut RouteParams) -> bool {
        match self {
            Self::Fixed { key, value } if value == raw => {
                params.insert(key.to_string(), raw.to_string());
                true
            }
            Self::Fixed { .. } => false,
            Self::Token(key) if is_token(raw) => {
                params.insert(key.to_string(), raw.to_string());
                true
            }
            Self::Token(_) => false,
        }
    }
}

/// A word character followed by word characters or dashes.
fn is_token(raw: &str) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) if is_word(first) => chars.all(|c| is_word(c) || c == '-'),
        _ => false,
    }
}

/// A named path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    name: &'static str,
    segments: Vec<Segment>,
    target: RouteTarget,
}

impl Route {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn target(&self) -> RouteTarget {
        self.target
    }

    /// Match already-split path segments, returning the captured parameters.
    pub fn matches(&self, path: &[&str]) -> Option<RouteParams> {
        if path.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        self.segments
            .iter()
            .zip(path)
            .all(|(segment, raw)| segment.capture(raw, &mut params))
            .then_some(params)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Fixed { value, .. } => write!(f, "{}/", value)?,
                Segment::Token(key) => write!(f, "{{{}}}/", key)?,
            }
        }
        Ok(())
    }
}

/// Builds the subresource routes of a parent definition.
pub struct SubresourceRouter;

impl SubresourceRouter {
    pub const LIST_ROUTE: &'static str = "api_dispatch_subresource_list";
    pub const DETAIL_ROUTE: &'static str = "api_dispatch_subresource_detail";

    /// List and detail routes for every embedded collection of `definition`.
    pub fn routes_for(definition: &ResourceDefinition) -> Vec<Route> {
        definition
            .collections()
            .iter()
            .flat_map(|field| {
                let prefix = vec![
                    resource_segment(definition),
                    Segment::Token("pk"),
                    Segment::Fixed {
                        key: "subresource_name",
                        value: field.name().to_string(),
                    },
                ];
                let mut detail = prefix.clone();
                detail.push(Segment::Token("index"));

                [
                    Route {
                        name: Self::LIST_ROUTE,
                        segments: prefix,
                        target: RouteTarget::Subresource(RequestType::List),
                    },
                    Route {
                        name: Self::DETAIL_ROUTE,
                        segments: detail,
                        target: RouteTarget::Subresource(RequestType::Detail),
                    },
                ]
            })
            .collect()
    }
}

fn resource_segment(definition: &ResourceDefinition) -> Segment {
    Segment::Fixed {
        key: "resource_name",
        value: definition.name().to_string(),
    }
}

/// A route that matched a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route_name: &'static str,
    pub target: RouteTarget,
    pub params: RouteParams,
}

/// Ordered routes of one parent resource; the first match wins.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub const PARENT_LIST_ROUTE: &'static str = "api_dispatch_list";
    pub const PARENT_DETAIL_ROUTE: &'static str = "api_dispatch_detail";

    /// Subresource routes followed by the parent's own list and detail routes.
    pub fn for_resource(definition: &ResourceDefinition) -> Self {
        let mut routes = SubresourceRouter::routes_for(definition);
        routes.push(Route {
            name: Self::PARENT_LIST_ROUTE,
            segments: vec![resource_segment(definition)],
            target: RouteTarget::Parent(RequestType::List),
        });
        routes.push(Route {
            name: Self::PARENT_DETAIL_ROUTE,
            segments: vec![resource_segment(definition), Segment::Token("pk")],
            target: RouteTarget::Parent(RequestType::Detail),
        });
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn resolve(&self, path: &[&str]) -> Option<RouteMatch> {
        self.routes.iter().find_map(|route| {
            route.matches(path).map(|params| RouteMatch {
                route_name: route.name,
                target: route.target,
                params,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDescriptor, FieldType, NestedSchema, ResourceSchema};

    fn blog() -> ResourceDefinition {
        let item = ResourceSchema::new().with_field(FieldDescriptor::new("text", FieldType::String));
        let schema = ResourceSchema::new()
            .with_field(
                FieldDescriptor::new("comments", FieldType::EmbeddedList)
                    .with_nested(NestedSchema::Of(item.clone())),
            )
            .with_field(
                FieldDescriptor::new("likes", FieldType::EmbeddedList)
                    .with_nested(NestedSchema::Of(item)),
            );
        ResourceDefinition::builder("blog")
            .schema(schema)
            .embedded_collections_from_schema()
            .build()
            .unwrap()
    }

    #[test]
    fn test_route_templates_and_order() {
        let table = RouteTable::for_resource(&blog());
        let templates: Vec<String> = table.routes().iter().map(|r| r.to_string()).collect();
        assert_eq!(
            templates,
            vec![
                "blog/{pk}/comments/",
                "blog/{pk}/comments/{index}/",
                "blog/{pk}/likes/",
                "blog/{pk}/likes/{index}/",
                "blog/",
                "blog/{pk}/",
            ]
        );
    }

    #[test]
    fn test_resolve_subresource_routes() {
        let table = RouteTable::for_resource(&blog());

        let matched = table.resolve(&["blog", "42", "comments"]).unwrap();
        assert_eq!(matched.route_name, SubresourceRouter::LIST_ROUTE);
        assert_eq!(matched.target, RouteTarget::Subresource(RequestType::List));
        assert_eq!(matched.params["pk"], "42");
        assert_eq!(matched.params["resource_name"], "blog");
        assert_eq!(matched.params["subresource_name"], "comments");

        let matched = table.resolve(&["blog", "a-1", "likes", "3"]).unwrap();
        assert_eq!(matched.target, RouteTarget::Subresource(RequestType::Detail));
        assert_eq!(matched.params["index"], "3");
        assert_eq!(matched.params["pk"], "a-1");
    }

    #[test]
    fn test_resolve_parent_routes() {
        let table = RouteTable::for_resource(&blog());
        assert_eq!(
            table.resolve(&["blog"]).unwrap().target,
            RouteTarget::Parent(RequestType::List)
        );
        assert_eq!(
            table.resolve(&["blog", "7"]).unwrap().target,
            RouteTarget::Parent(RequestType::Detail)
        );
    }

    #[test]
    fn test_non_matching_paths() {
        let table = RouteTable::for_resource(&blog());
        assert!(table.resolve(&["blog", "1", "tags"]).is_none());
        assert!(table.resolve(&["post", "1", "comments"]).is_none());
        assert!(table.resolve(&["blog", "-1", "comments"]).is_none());
        assert!(table.resolve(&["blog", "1", "comments", "0", "x"]).is_none());
    }

    #[test]
    fn test_token_pattern() {
        assert!(is_token("abc"));
        assert!(is_token("_a-b-1"));
        assert!(is_token("12"));
        assert!(!is_token(""));
        assert!(!is_token("-x"));
        assert!(!is_token("a.b"));
    }
}
