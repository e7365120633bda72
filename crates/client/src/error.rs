//! Client error types.

use serde_json::Value;
use thiserror::Error;

use store_ratings_core::session::{SessionError, StorageError};

/// Errors returned by [`crate::ApiClient`] and its services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    ///
    /// `body` is the decoded JSON body, or `{}` when it was not JSON.
    #[error("API error: {status} - {}", message_of(.body).unwrap_or("no message"))]
    Api { status: u16, body: Value },

    /// A 2xx body did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// HTTP status of an [`ApiError::Api`] error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server's `message` field, if it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => message_of(body),
            _ => None,
        }
    }

    /// Per-field messages from a 422 response, in field order.
    #[must_use]
    pub fn field_errors(&self) -> Vec<(String, String)> {
        let Self::Api { body, .. } = self else {
            return Vec::new();
        };
        body.get("errors")
            .and_then(Value::as_object)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|(field, message)| {
                        message.as_str().map(|m| (field.clone(), m.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn message_of(body: &Value) -> Option<&str> {
    body.get("message").and_then(Value::as_str)
}

/// Convenient Result type for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_accessors() {
        let err = ApiError::Api {
            status: 422,
            body: json!({
                "message": "Validation failed",
                "errors": { "name": "Name must be at least 20 characters" },
            }),
        };
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.server_message(), Some("Validation failed"));
        assert_eq!(
            err.field_errors(),
            [(
                "name".to_string(),
                "Name must be at least 20 characters".to_string()
            )]
        );
        assert_eq!(err.to_string(), "API error: 422 - Validation failed");
    }

    #[test]
    fn test_api_error_without_message() {
        let err = ApiError::Api {
            status: 502,
            body: json!({}),
        };
        assert_eq!(err.server_message(), None);
        assert!(err.field_errors().is_empty());
        assert_eq!(err.to_string(), "API error: 502 - no message");
    }
}
