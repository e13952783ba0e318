//! Error types for embedded-collection resource operations.
//!
//! Every public operation returns a [`ResourceError`]. Each error kind maps to
//! exactly one [`HttpStatus`], which the dispatcher uses when rendering a
//! response.

use crate::storage::StorageError;
use std::fmt;

/// HTTP status classes produced by the subresource surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpStatus {
    Ok,
    Created,
    Accepted,
    NoContent,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    Gone,
    InternalServerError,
}

impl HttpStatus {
    /// Numeric status code.
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::Accepted => 202,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::Gone => 410,
            Self::InternalServerError => 500,
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.code())
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Main error type for subresource operations.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// The parent document, or an item on the read path, no longer exists.
    #[error("Gone: {detail}")]
    Gone { detail: String },

    /// The addressed target does not exist (update path, unknown subresource, no route).
    #[error("Not found: {detail}")]
    NotFound { detail: String },

    /// The payload could not be hydrated into an item
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Loading or saving the parent document failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),

    /// Malformed request parameters
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// The verb is not supported on the matched route
    #[error("Method {method} not allowed on {request_type} route")]
    MethodNotAllowed {
        method: String,
        request_type: String,
    },
}

impl ResourceError {
    /// Create a gone error
    pub fn gone(detail: impl Into<String>) -> Self {
        Self::Gone {
            detail: detail.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// The HTTP status this error is reported with.
    pub fn status(&self) -> HttpStatus {
        match self {
            Self::Gone { .. } => HttpStatus::Gone,
            Self::NotFound { .. } => HttpStatus::NotFound,
            Self::Validation(_) | Self::InvalidRequest { .. } => HttpStatus::BadRequest,
            Self::MethodNotAllowed { .. } => HttpStatus::MethodNotAllowed,
            Self::Persistence(_) => HttpStatus::InternalServerError,
        }
    }

    /// Stable machine-readable code used in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Gone { .. } => "GONE",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
            Self::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
        }
    }
}

/// Hydration failures.
///
/// Nested failures keep the dotted path of the offending field, e.g.
/// `author.name`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Payload is not a JSON object
    #[error("Payload must be a JSON object, got {actual}")]
    NotAnObject { actual: String },

    /// Field has no value, no default and is not nullable
    #[error("Field '{field}' has no data and doesn't allow a default or null value")]
    MissingField { field: String },

    /// Null supplied for a non-nullable field
    #[error("Field '{field}' does not allow null values")]
    NullNotAllowed { field: String },

    /// Value doesn't match the field type
    #[error("Field '{field}' has invalid type, expected {expected}, got {actual}")]
    InvalidType {
        field: String,
        expected: String,
        actual: String,
    },

    /// Unparseable date or datetime string
    #[error("Field '{field}' has invalid datetime value: {value}")]
    InvalidDateTime { field: String, value: String },

    /// The item identity in an update payload is not a usable index
    #[error("Invalid target index: {value}")]
    InvalidTargetIndex { value: String },
}

impl ValidationError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid type error
    pub fn invalid_type(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidType {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Prefix the field path with the name of the enclosing field.
    pub fn nested_in(self, parent: &str) -> Self {
        let join = |field: String| format!("{}.{}", parent, field);
        match self {
            Self::MissingField { field } => Self::MissingField { field: join(field) },
            Self::NullNotAllowed { field } => Self::NullNotAllowed { field: join(field) },
            Self::InvalidType {
                field,
                expected,
                actual,
            } => Self::InvalidType {
                field: join(field),
                expected,
                actual,
            },
            Self::InvalidDateTime { field, value } => Self::InvalidDateTime {
                field: join(field),
                value,
            },
            Self::NotAnObject { actual } => Self::InvalidType {
                field: parent.to_string(),
                expected: "object".to_string(),
                actual,
            },
            other @ Self::InvalidTargetIndex { .. } => other,
        }
    }
}

/// Errors raised while assembling resources, routes or configuration.
///
/// These are programming errors and surface at startup, not per request.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Two resources registered under the same name
    #[error("Resource '{name}' is already registered")]
    DuplicateResource { name: String },

    /// Collection binding names a field the schema doesn't describe
    #[error("Resource '{resource}' has no field '{field}'")]
    UnknownField { resource: String, field: String },

    /// Collection binding names a field that isn't an embedded list
    #[error("Field '{field}' on resource '{resource}' is not an embedded list")]
    NotAnEmbeddedList { resource: String, field: String },

    /// Invalid configuration provided
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

// Result type aliases for convenience
pub type ResourceResult<T> = Result<T, ResourceError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
pub type BuildResult<T> = Result<T, BuildError>;
