//! Mocks and recording fakes shared by the reconciler tests

use async_trait::async_trait;
use brain_api::{AuthParams, BrainApi, Course, UserDetails, UserRecord};
use mockall::mock;
use parking_lot::Mutex;
use std::sync::Arc;
use storage::{KeyValueStore, MemoryStore};

use super::{Collaborators, Reconciler};
use crate::config::AppConfig;
use crate::navigation::{Navigator, Route};
use crate::platform::{Notice, Notifier, SocialLoginProvider};

mock! {
    pub Api {}

    #[async_trait]
    impl BrainApi for Api {
        async fn restore_session(
            &self,
            user_id: &str,
            access_token: &str,
            device_id: &str,
        ) -> brain_api::Result<UserRecord>;
        async fn restore_session_via_social_provider(
            &self,
            access_token_fb: &str,
        ) -> brain_api::Result<UserRecord>;
        async fn login(&self, params: &AuthParams) -> brain_api::Result<UserRecord>;
        async fn signup(&self, params: &AuthParams) -> brain_api::Result<UserRecord>;
        async fn clear_token(&self, user_id: &str, token: &str) -> brain_api::Result<()>;
        async fn forget_access_token(&self);
        async fn select_course_save_token(
            &self,
            course_id: &str,
            device_id: &str,
        ) -> brain_api::Result<UserDetails>;
        async fn close_course(&self) -> brain_api::Result<UserDetails>;
        async fn current_user(&self) -> brain_api::Result<Option<UserRecord>>;
        async fn user_details(&self) -> brain_api::Result<UserDetails>;
        async fn courses(&self) -> brain_api::Result<Vec<Course>>;
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    pushed: Mutex<Vec<Route>>,
    exits: Mutex<usize>,
}

impl RecordingNavigator {
    pub(crate) fn pushed(&self) -> Vec<Route> {
        self.pushed.lock().clone()
    }

    pub(crate) fn exit_count(&self) -> usize {
        *self.exits.lock()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: Route) {
        self.pushed.lock().push(route);
    }

    fn exit_app(&self) {
        *self.exits.lock() += 1;
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub(crate) fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

#[derive(Default)]
pub(crate) struct RecordingSocial {
    logouts: Mutex<usize>,
}

impl RecordingSocial {
    pub(crate) fn logout_count(&self) -> usize {
        *self.logouts.lock()
    }
}

impl SocialLoginProvider for RecordingSocial {
    fn logout(&self) {
        *self.logouts.lock() += 1;
    }
}

/// Storage and recording collaborators for one test
pub(crate) struct Harness {
    pub(crate) store: MemoryStore,
    pub(crate) navigator: Arc<RecordingNavigator>,
    pub(crate) notifier: Arc<RecordingNotifier>,
    pub(crate) social: Arc<RecordingSocial>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_entries(&[])
    }

    pub(crate) fn with_entries(entries: &[(&str, &str)]) -> Self {
        Self {
            store: MemoryStore::with_entries(entries.iter().copied()),
            navigator: Arc::new(RecordingNavigator::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            social: Arc::new(RecordingSocial::default()),
        }
    }

    pub(crate) fn reconciler(&self, api: MockApi) -> Reconciler {
        let collaborators = Collaborators {
            storage: Arc::new(self.store.clone()),
            api: Arc::new(api),
            navigator: self.navigator.clone(),
            notifier: self.notifier.clone(),
            social: self.social.clone(),
        };
        let config = AppConfig::default().with_device_id("device-1");
        Reconciler::new(config, collaborators)
    }

    pub(crate) async fn stored(&self, key: &str) -> Option<String> {
        self.store.get(key).await.ok().flatten()
    }
}

pub(crate) fn user(id: &str, token: Option<&str>) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        current_access_token: token.map(str::to_string),
        ..Default::default()
    }
}

pub(crate) fn selecting(course_id: &str) -> UserDetails {
    UserDetails {
        selected_course: Some(course_id.to_string()),
        ..Default::default()
    }
}
