//! Error taxonomy
//!
//! Expected protocol failures are reported as a [`FailureKind`] inside the
//! tagged outcome of each reconciler command. [`ReconcileError`] is reserved
//! for infrastructure faults that a command cannot recover from itself.

use brain_api::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use storage::KvError;
use thiserror::Error;

/// Why a reconciler command did not reach its goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The stored password credential was refused; it has been deleted
    StaleCredential,
    /// The stored social-provider token was refused; it has been deleted
    ExpiredSocialToken,
    /// The backend could not be reached; the offline route was shown
    ConnectivityFailure,
    /// An exchange succeeded but the response lacked the user id or token
    MalformedAuthResponse,
    /// The backend refused a request for a non-auth reason
    RemoteRejected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureKind::StaleCredential => "stored credential rejected",
            FailureKind::ExpiredSocialToken => "social login expired",
            FailureKind::ConnectivityFailure => "backend unreachable",
            FailureKind::MalformedAuthResponse => "malformed authentication response",
            FailureKind::RemoteRejected => "request rejected by backend",
        };
        f.write_str(text)
    }
}

/// Reconciler error types
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Local storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] KvError),

    /// Backend failure that no outcome could absorb
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for reconciler operations
pub type Result<T> = std::result::Result<T, ReconcileError>;
