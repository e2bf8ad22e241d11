//! Error types for lessons-planner

use serde_json::Value;
use thiserror::Error;

/// Errors from API traffic and session operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response; `payload` is the server's error body, uninterpreted
    #[error("API error {status}: {payload}")]
    Api { status: u16, payload: Value },

    /// Response body did not match the expected representation
    #[error("Decode error: {0}")]
    Decode(String),

    /// Response was well-formed but describes a different record
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Record not present in the local session
    #[error("Not found: {0}")]
    NotFound(String),

    /// lessons-common error
    #[error("Common error: {0}")]
    Common(#[from] lessons_common::Error),
}

impl ClientError {
    /// Server error payload, for display next to the offending form
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ClientError::Api { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// HTTP status of an API rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_only_for_api_errors() {
        let rejected = ClientError::Api {
            status: 400,
            payload: json!({"name": ["tag with this name already exists."]}),
        };
        assert_eq!(rejected.status(), Some(400));
        assert_eq!(rejected.payload().unwrap()["name"][0], "tag with this name already exists.");

        let offline = ClientError::Network("connection refused".to_string());
        assert!(offline.payload().is_none());
        assert!(offline.status().is_none());
    }
}
