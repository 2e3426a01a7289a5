//! Shared error types for Signpost

use hyper::StatusCode;
use serde::Serialize;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SignpostError>;

/// Top-level error type
#[derive(Debug, thiserror::Error)]
pub enum SignpostError {
    /// Request body failed field-level validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Missing or wrong access key
    #[error("Unauthorized")]
    Unauthorized,

    /// Entity or route does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// HTTP method not supported on this route
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Notion credentials/database ids are not configured
    #[error("Notion is not configured. Set NOTION_TOKEN, GOALS_DB_ID, INITIATIVES_DB_ID and DELIVERABLES_DB_ID")]
    NotConfigured,

    /// Error reported by the upstream workspace-database service,
    /// already classified to an HTTP status
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// Malformed request (bad JSON, missing id segment)
    #[error("{0}")]
    BadRequest(String),

    /// Local store I/O failure
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One field-level validation failure, serialized into the
/// `details` array of an error response
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Wire shape of every error response: `{ error, details? }`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl SignpostError {
    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            SignpostError::Validation(_) | SignpostError::BadRequest(_) => StatusCode::BAD_REQUEST,
            SignpostError::Unauthorized => StatusCode::UNAUTHORIZED,
            SignpostError::NotFound(_) => StatusCode::NOT_FOUND,
            SignpostError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            SignpostError::Upstream { status, .. } => *status,
            SignpostError::NotConfigured
            | SignpostError::Storage(_)
            | SignpostError::Http(_)
            | SignpostError::Io(_)
            | SignpostError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Response body for this error
    pub fn body(&self) -> ErrorBody {
        match self {
            SignpostError::Validation(details) => ErrorBody {
                error: "Validation failed".into(),
                details: Some(details.clone()),
            },
            other => ErrorBody {
                error: other.to_string(),
                details: None,
            },
        }
    }
}

impl From<reqwest::Error> for SignpostError {
    fn from(e: reqwest::Error) -> Self {
        SignpostError::Http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_status_and_body() {
        let err = SignpostError::Validation(vec![FieldError::new("name", "Name is required")]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let body = err.body();
        assert_eq!(body.error, "Validation failed");
        assert_eq!(body.details.unwrap().len(), 1);
    }

    #[test]
    fn test_upstream_status_passthrough() {
        let err = SignpostError::Upstream {
            status: StatusCode::NOT_FOUND,
            message: "Resource not found".into(),
        };
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.body().details.is_none());
    }
}
