//! Backend contract
//!
//! `BrainApi` is the seam between the session reconciler and the remote service.
//! `GraphqlClient` implements it over HTTP; tests substitute mocks.

use async_trait::async_trait;

use crate::types::{AuthParams, Course, UserDetails, UserRecord};
use crate::Result;

/// Remote authentication and query service
#[async_trait]
pub trait BrainApi: Send + Sync {
    /// Exchange a stored user id and access token for a session with a rotated token
    async fn restore_session(
        &self,
        user_id: &str,
        access_token: &str,
        device_id: &str,
    ) -> Result<UserRecord>;

    /// Exchange a social-provider token for a session
    async fn restore_session_via_social_provider(
        &self,
        access_token_fb: &str,
    ) -> Result<UserRecord>;

    /// Log into an existing account
    async fn login(&self, params: &AuthParams) -> Result<UserRecord>;

    /// Attach a username and password to the current guest account
    async fn signup(&self, params: &AuthParams) -> Result<UserRecord>;

    /// Invalidate a server-side token
    async fn clear_token(&self, user_id: &str, token: &str) -> Result<()>;

    /// Stop presenting any access token on later requests
    ///
    /// Purely local; the backend is not contacted.
    async fn forget_access_token(&self);

    /// Select a course, creating a guest identity server-side if there is none
    async fn select_course_save_token(
        &self,
        course_id: &str,
        device_id: &str,
    ) -> Result<UserDetails>;

    /// Close the selected course
    async fn close_course(&self) -> Result<UserDetails>;

    /// The user the backend currently associates with this client
    async fn current_user(&self) -> Result<Option<UserRecord>>;

    /// Server-owned details of the current user
    async fn user_details(&self) -> Result<UserDetails>;

    /// All courses
    async fn courses(&self) -> Result<Vec<Course>>;
}
