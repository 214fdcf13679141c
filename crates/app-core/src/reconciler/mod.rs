//! Session and course-selection reconciler
//!
//! The [`Reconciler`] owns the application state and is the only writer of the
//! persisted credential. Each command awaits its backend and storage calls in
//! order and reports a tagged outcome; state changes are applied under a short
//! synchronous lock that is never held across an `.await`.

mod auth;
mod course;
mod restore;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::AuthOutcome;
pub use course::{CloseOutcome, SelectOutcome};
pub use restore::{BranchOutcome, RestoreReport};

use app_state::{AppState, BackAction, QueryCache, QueryEntry, QueryKey};
use brain_api::{BrainApi, Course, GraphqlClient, UserDetails, UserRecord};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use storage::{CredentialStore, KeyValueStore, KvStore};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::connectivity::ConnectivityGuard;
use crate::error::Result;
use crate::navigation::{Navigator, Route};
use crate::platform::{Notifier, SocialLoginProvider};

/// External services the reconciler drives
#[derive(Clone)]
pub struct Collaborators {
    /// Durable key-value storage
    pub storage: Arc<dyn KeyValueStore>,
    /// Remote authentication and query service
    pub api: Arc<dyn BrainApi>,
    /// History handle
    pub navigator: Arc<dyn Navigator>,
    /// User-visible alerts
    pub notifier: Arc<dyn Notifier>,
    /// Social login SDK
    pub social: Arc<dyn SocialLoginProvider>,
}

/// What happened during [`Reconciler::start`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartReport {
    /// Restore result, when the backend did not already know the user
    pub restore: Option<RestoreReport>,
    /// Server-driven course selection, when one was applied
    pub selection: Option<SelectOutcome>,
}

/// Controller for session, credential and course state
#[derive(Clone)]
pub struct Reconciler {
    config: AppConfig,
    credentials: CredentialStore,
    api: Arc<dyn BrainApi>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    social: Arc<dyn SocialLoginProvider>,
    connectivity: ConnectivityGuard,
    state: Arc<Mutex<AppState>>,
}

impl Reconciler {
    /// Create a reconciler over the given collaborators
    pub fn new(config: AppConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            storage,
            api,
            navigator,
            notifier,
            social,
        } = collaborators;
        Self {
            config,
            credentials: CredentialStore::new(storage),
            api,
            connectivity: ConnectivityGuard::new(navigator.clone()),
            navigator,
            notifier,
            social,
            state: Arc::new(Mutex::new(AppState::default())),
        }
    }

    /// Create a reconciler backed by the on-disk store and the HTTP client
    pub fn connect(
        config: AppConfig,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        social: Arc<dyn SocialLoginProvider>,
    ) -> Result<Self> {
        let storage = KvStore::new(config.kv_config())?;
        let api = GraphqlClient::new(config.graphql_config())?;
        info!(endpoint = %config.api_url, storage = %config.storage_path, "reconciler connected");

        let collaborators = Collaborators {
            storage: Arc::new(storage),
            api: Arc::new(api),
            navigator,
            notifier,
            social,
        };
        Ok(Self::new(config, collaborators))
    }

    /// Configuration in use
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> AppState {
        self.state.lock().clone()
    }

    // =========================================================================
    // Startup
    // =========================================================================

    /// Bring local state in line with storage and the backend
    ///
    /// Sends first-run users to the intro, restores the stored session when the
    /// backend does not already know the user, loads the user details and course
    /// list, then applies the server-selected course.
    pub async fn start(&self) -> Result<StartReport> {
        if !self.credentials.is_intro_disabled().await? {
            info!("intro not yet dismissed");
            self.navigator.push(Route::Intro);
        }

        let mut report = StartReport::default();
        match self.current_user().await {
            Ok(Some(user)) => debug!(user_id = %user.id, "backend already knows the current user"),
            Ok(None) => report.restore = Some(self.restore_session().await?),
            // Offline must not cost the user their stored credential
            Err(error) => warn!(%error, "current user unavailable, skipping restore"),
        }

        if let Err(error) = self.user_details().await {
            warn!(%error, "could not load user details");
        }
        if let Err(error) = self.courses().await {
            warn!(%error, "could not load courses");
        }

        report.selection = self.sync_selected_course().await?;
        Ok(report)
    }

    /// Remember that the intro has been seen
    pub async fn dismiss_intro(&self) -> Result<()> {
        self.credentials.disable_intro().await?;
        Ok(())
    }

    // =========================================================================
    // Menu
    // =========================================================================

    /// Flip the main menu
    pub fn toggle_menu(&self) {
        self.state.lock().menu.toggle();
    }

    /// Show the main menu
    pub fn open_menu(&self) {
        self.state.lock().menu.open();
    }

    /// Hide the main menu
    pub fn close_menu(&self) {
        self.state.lock().menu.close();
    }

    /// Handle the platform back signal; it is always consumed
    pub fn handle_back(&self) -> BackAction {
        let action = self.state.lock().menu.on_back();
        if action == BackAction::ExitApp {
            info!("back pressed with menu closed, exiting");
            self.navigator.exit_app();
        }
        action
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current user, from cache unless invalidated
    pub async fn current_user(&self) -> brain_api::Result<Option<UserRecord>> {
        match self.cached(|queries| &queries.current_user) {
            Some(user) => Ok(user),
            None => self.refresh_current_user().await,
        }
    }

    /// User details, from cache unless invalidated
    pub async fn user_details(&self) -> brain_api::Result<UserDetails> {
        match self.cached(|queries| &queries.user_details) {
            Some(details) => Ok(details),
            None => self.refresh_user_details().await,
        }
    }

    /// Course list, from cache unless invalidated
    pub async fn courses(&self) -> brain_api::Result<Vec<Course>> {
        match self.cached(|queries| &queries.courses) {
            Some(courses) => Ok(courses),
            None => self.refresh_courses().await,
        }
    }

    /// Fetch the current user and fold it into the session
    pub async fn refresh_current_user(&self) -> brain_api::Result<Option<UserRecord>> {
        let call = self.api.current_user();
        let user = self.fetch(QueryKey::CurrentUser, call).await?;

        let mut state = self.state.lock();
        if let Some(user) = &user {
            state.session.refresh_user(user.clone());
        }
        state.queries.current_user.resolve(user.clone());
        Ok(user)
    }

    /// Fetch the user details
    pub async fn refresh_user_details(&self) -> brain_api::Result<UserDetails> {
        let call = self.api.user_details();
        let details = self.fetch(QueryKey::UserDetails, call).await?;
        let mut state = self.state.lock();
        state.queries.user_details.resolve(details.clone());
        Ok(details)
    }

    /// Fetch the course list
    pub async fn refresh_courses(&self) -> brain_api::Result<Vec<Course>> {
        let courses = self.fetch(QueryKey::Courses, self.api.courses()).await?;
        self.state.lock().queries.courses.resolve(courses.clone());
        Ok(courses)
    }

    fn cached<T: Clone>(&self, entry: impl FnOnce(&QueryCache) -> &QueryEntry<T>) -> Option<T> {
        let state = self.state.lock();
        let entry = entry(&state.queries);
        if entry.needs_fetch() {
            None
        } else {
            entry.data().cloned()
        }
    }

    async fn fetch<T, F>(&self, key: QueryKey, call: F) -> brain_api::Result<T>
    where
        F: Future<Output = brain_api::Result<T>>,
    {
        self.state.lock().queries.begin_fetch(key);
        let result = call.await;
        if let Err(error) = &result {
            warn!(query = %key, %error, "query failed");
            self.state.lock().queries.fail(key, error.to_string());
        }
        result
    }
}
