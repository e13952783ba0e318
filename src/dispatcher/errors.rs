//! Error response rendering.

use super::core::ApiResponse;
use crate::error::ResourceError;
use serde_json::json;

/// Create an error response from a [`ResourceError`].
///
/// The body is `{"error": message, "code": CODE}` and the status comes from
/// [`ResourceError::status`].
pub fn create_error_response(error: &ResourceError, request_id: String) -> ApiResponse {
    ApiResponse {
        status: error.status(),
        location: None,
        body: Some(json!({
            "error": error.to_string(),
            "code": error.code(),
        })),
        request_id,
    }
}
