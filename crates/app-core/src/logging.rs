//! Logging setup
//!
//! Installs a `tracing` subscriber once per process. `RUST_LOG` overrides the
//! default level.

use std::sync::Once;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, registry, EnvFilter};

static INIT_LOGGING_ONCE: Once = Once::new();

/// Install the global subscriber
///
/// Safe to call more than once; only the first call has an effect. If the host
/// already installed a subscriber, that one is kept.
pub fn init_logging() {
    let already_initialized = INIT_LOGGING_ONCE.is_completed();

    INIT_LOGGING_ONCE.call_once(|| {
        if let Err(error) = do_init_logging() {
            eprintln!("logging already initialized by host: {error}");
        }
    });

    tracing::debug!(already_initialized, "init_logging");
}

fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

fn do_init_logging() -> Result<(), TryInitError> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level().into())
        .from_env_lossy();

    registry()
        .with(env_filter)
        .with(fmt::Layer::new().with_target(true))
        .try_init()
}
