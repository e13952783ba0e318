//! API configuration: where resources are mounted and how URIs look.
//!
//! The configuration is used both to render item URIs (response bodies and
//! `Location` headers) and to strip the mount prefix before route matching.

use crate::error::{BuildError, BuildResult};
use serde::{Deserialize, Serialize};

/// Mount point and URI style for all resources.
///
/// URIs are rendered as `/{base_path}/{api_name}/{resource}/{pk}/{field}/{index}/`,
/// omitting empty parts.
///
/// # Examples
///
/// ```rust
/// use nonrel_resources::ApiConfig;
///
/// let config = ApiConfig::new().with_base_path("/api").with_api_name("v1");
/// assert_eq!(
///     config.item_uri("blog", Some("7"), "comments", 2),
///     "/api/v1/blog/7/comments/2/"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Path the API is mounted under, e.g. `/api`. Empty means the root.
    pub base_path: String,
    /// Optional API version segment, e.g. `v1`.
    pub api_name: Option<String>,
    /// Whether rendered URIs end with `/`. Matching accepts both forms.
    pub trailing_slash: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            api_name: None,
            trailing_slash: true,
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_api_name(mut self, api_name: impl Into<String>) -> Self {
        self.api_name = Some(api_name.into());
        self
    }

    pub fn with_trailing_slash(mut self, trailing_slash: bool) -> Self {
        self.trailing_slash = trailing_slash;
        self
    }

    /// Load and validate a configuration from JSON.
    pub fn from_json_str(content: &str) -> BuildResult<Self> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| BuildError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> BuildResult<()> {
        if self.base_path.chars().any(char::is_whitespace) {
            return Err(BuildError::InvalidConfiguration {
                message: format!("base path '{}' contains whitespace", self.base_path),
            });
        }

        if let Some(api_name) = &self.api_name {
            if api_name.is_empty() {
                return Err(BuildError::InvalidConfiguration {
                    message: "api name cannot be empty".to_string(),
                });
            }
            if api_name.contains('/') || api_name.chars().any(char::is_whitespace) {
                return Err(BuildError::InvalidConfiguration {
                    message: format!("api name '{}' must be a single path segment", api_name),
                });
            }
        }

        Ok(())
    }

    /// Path segments every resource URI starts with.
    pub fn prefix_segments(&self) -> Vec<&str> {
        self.base_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .chain(self.api_name.as_deref())
            .collect()
    }

    /// URI of the item currently at `index` of an embedded collection.
    ///
    /// `pk` is `None` only when no parent is bound, in which case the segment
    /// is omitted.
    pub fn item_uri(&self, resource_name: &str, pk: Option<&str>, field: &str, index: usize) -> String {
        let index = index.to_string();
        let mut segments = vec![resource_name];
        segments.extend(pk);
        segments.push(field);
        segments.push(&index);
        self.render_path(segments)
    }

    /// URI of an embedded collection itself.
    pub fn collection_uri(&self, resource_name: &str, pk: &str, field: &str) -> String {
        self.render_path(vec![resource_name, pk, field])
    }

    /// Strip the configured prefix from a request path and split the rest
    /// into segments. Returns `None` when the path is outside the mount point.
    pub fn strip_prefix<'p>(&self, path: &'p str) -> Option<Vec<&'p str>> {
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        for expected in self.prefix_segments() {
            if segments.next()? != expected {
                return None;
            }
        }
        Some(segments.collect())
    }

    /// Render a path from the prefix plus `segments`.
    pub fn render_path(&self, segments: Vec<&str>) -> String {
        let mut path = String::from("/");
        let joined = self
            .prefix_segments()
            .into_iter()
            .chain(segments)
            .collect::<Vec<_>>()
            .join("/");
        path.push_str(&joined);
        if self.trailing_slash {
            path.push('/');
        }
        path
    }
}
