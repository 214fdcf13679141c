//! Core application logic for Brain Mobile
//!
//! This crate ties persisted credentials, the remote GraphQL service and the
//! client-side course selection together through the [`Reconciler`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod connectivity;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod platform;
pub mod reconciler;

pub use config::{AppConfig, DEFAULT_DEVICE_ID};
pub use connectivity::{ConnectivityGuard, Guarded};
pub use error::{FailureKind, ReconcileError, Result};
pub use logging::init_logging;
pub use navigation::{Navigator, Route};
pub use platform::{NoSocialLogin, Notice, Notifier, SocialLoginProvider};
pub use reconciler::{
    AuthOutcome, BranchOutcome, CloseOutcome, Collaborators, Reconciler, RestoreReport,
    SelectOutcome, StartReport,
};
