//! Failures of the backing document store.
//!
//! Whether a missing document means "gone" or "not found" is decided by the
//! resource layer, so there is no not-found variant here.

/// Errors raised while looking up or saving parent documents.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A document or one of its attributes has a shape the store can't use.
    #[error("Invalid data: {message}{}", cause.as_ref().map(|c| format!(" (cause: {})", c)).unwrap_or_default())]
    InvalidData {
        message: String,
        cause: Option<String>,
    },

    /// A filter lookup matched more than one document.
    #[error("Lookup on {resource_name} matched {matches} documents, expected one")]
    AmbiguousLookup { resource_name: String, matches: usize },

    /// The backend could not be reached
    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

impl StorageError {
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
            cause: None,
        }
    }

    pub fn invalid_data_with_cause(message: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn ambiguous_lookup(resource_name: impl Into<String>, matches: usize) -> Self {
        Self::AmbiguousLookup {
            resource_name: resource_name.into(),
            matches,
        }
    }

    /// For backends reporting a lost connection or a read-only replica.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let error = StorageError::invalid_data_with_cause("bad comments", "not an array");
        assert_eq!(
            error.to_string(),
            "Invalid data: bad comments (cause: not an array)"
        );
        assert_eq!(
            StorageError::invalid_data("doc 1 is not an object").to_string(),
            "Invalid data: doc 1 is not an object"
        );

        let error = StorageError::ambiguous_lookup("blog", 3);
        assert!(error.to_string().contains("matched 3 documents"));
        assert_eq!(
            StorageError::unavailable("offline").to_string(),
            "Storage unavailable: offline"
        );
    }
}
