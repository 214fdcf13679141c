//! Brain Mobile client core
//!
//! Re-exports the workspace crates under one name for host applications.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use app_core;
pub use app_state;
pub use brain_api;
pub use storage;

pub use app_core::{
    init_logging, AppConfig, AuthOutcome, CloseOutcome, Navigator, Notice, Notifier, Reconciler,
    Route, SelectOutcome, SocialLoginProvider,
};
