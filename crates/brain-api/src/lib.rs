//! Brain backend client
//!
//! This crate provides the records exchanged with the Brain GraphQL backend, the
//! `BrainApi` contract the session reconciler is written against, and a
//! GraphQL-over-HTTP implementation of it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod graphql;
pub mod operations;
pub mod types;

pub use api::BrainApi;
pub use graphql::{GraphqlClient, GraphqlClientConfig};
pub use types::{AuthMode, AuthParams, Course, Experience, UserDetails, UserRecord};

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// HTTP statuses that indicate the backend is unreachable rather than rejecting the request
const UNREACHABLE_STATUSES: [u16; 9] = [408, 425, 429, 500, 502, 503, 504, 522, 524];

/// A single entry of a GraphQL `errors` array
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GraphqlErrorMessage {
    /// Human-readable message
    pub message: String,
}

/// Error types for backend operations
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("HTTP error ({status}): {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The backend answered with structured GraphQL errors
    #[error("GraphQL error: {}", first_message(.0))]
    Graphql(Vec<GraphqlErrorMessage>),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A response arrived but lacked data the operation requires
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

fn first_message(errors: &[GraphqlErrorMessage]) -> &str {
    errors
        .first()
        .map(|e| e.message.as_str())
        .unwrap_or("unknown error")
}

impl ApiError {
    /// Build a GraphQL error from a single message
    pub fn graphql(message: impl Into<String>) -> Self {
        ApiError::Graphql(vec![GraphqlErrorMessage {
            message: message.into(),
        }])
    }

    /// Whether the failure means the backend could not be reached
    pub fn is_connectivity(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Http { status, .. } => UNREACHABLE_STATUSES.contains(status),
            _ => false,
        }
    }

    /// The first structured message the backend returned, if any
    pub fn first_message(&self) -> Option<&str> {
        match self {
            ApiError::Graphql(errors) => errors.first().map(|e| e.message.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ApiError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ApiError::Network(err.to_string()),
        }
    }
}
