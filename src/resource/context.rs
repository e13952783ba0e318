//! Per-request context carried through subresource operations.

use uuid::Uuid;

/// Request tracking for logging.
///
/// Every subresource log line carries the request id so that the fetch,
/// hydration and save of one request can be correlated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Unique identifier for this request
    pub request_id: String,
}

impl RequestContext {
    /// Create a context with a specific request id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Create a context with a generated request id.
    pub fn with_generated_id() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::with_generated_id()
    }
}
