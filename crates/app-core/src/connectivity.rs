//! Connectivity-aware call wrapper
//!
//! Every mutating backend call goes through [`ConnectivityGuard::run`]. When the
//! backend is unreachable the user is sent to the offline screen and the caller
//! receives [`Guarded::Offline`] instead of the raw error.

use brain_api::ApiError;
use std::future::Future;
use std::sync::Arc;

use crate::navigation::{Navigator, Route};

/// Result of a guarded call
#[derive(Debug)]
pub enum Guarded<T> {
    /// The call succeeded
    Completed(T),
    /// The backend could not be reached; the offline route was pushed
    Offline,
    /// The backend answered with an error
    Rejected(ApiError),
}

/// Routes connectivity failures to the offline screen
#[derive(Clone)]
pub struct ConnectivityGuard {
    navigator: Arc<dyn Navigator>,
}

impl ConnectivityGuard {
    /// Create a guard pushing onto `navigator`
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }

    /// Await `call`, classifying its failure
    pub async fn run<T, F>(&self, operation: &str, call: F) -> Guarded<T>
    where
        F: Future<Output = brain_api::Result<T>>,
    {
        match call.await {
            Ok(value) => Guarded::Completed(value),
            Err(error) if error.is_connectivity() => {
                tracing::warn!(operation, %error, "backend unreachable");
                self.navigator.push(Route::NoInternet);
                Guarded::Offline
            }
            Err(error) => {
                tracing::debug!(operation, %error, "backend rejected request");
                Guarded::Rejected(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingNavigator {
        pushed: Mutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn push(&self, route: Route) {
            self.pushed.lock().push(route);
        }

        fn exit_app(&self) {}
    }

    #[tokio::test]
    async fn test_completed_call_does_not_navigate() {
        let navigator = Arc::new(RecordingNavigator::default());
        let guard = ConnectivityGuard::new(navigator.clone());

        let call = async { Ok::<_, ApiError>(7) };
        let result = guard.run("closeCourse", call).await;

        assert!(matches!(result, Guarded::Completed(7)));
        assert!(navigator.pushed.lock().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_routes_offline() {
        let navigator = Arc::new(RecordingNavigator::default());
        let guard = ConnectivityGuard::new(navigator.clone());

        let call = async { Err(ApiError::Network("connection refused".into())) };
        let result: Guarded<()> = guard.run("logIn", call).await;

        assert!(matches!(result, Guarded::Offline));
        assert_eq!(*navigator.pushed.lock(), vec![Route::NoInternet]);
    }

    #[tokio::test]
    async fn test_graphql_error_is_passed_through() {
        let navigator = Arc::new(RecordingNavigator::default());
        let guard = ConnectivityGuard::new(navigator.clone());

        let call = async { Err(ApiError::graphql("Wrong password")) };
        let result: Guarded<()> = guard.run("logIn", call).await;

        match result {
            Guarded::Rejected(error) => assert_eq!(error.first_message(), Some("Wrong password")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(navigator.pushed.lock().is_empty());
    }
}
