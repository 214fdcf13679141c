//! Interactive authentication and logout

use app_state::MutationKind;
use brain_api::{ApiError, AuthMode, AuthParams};
use tracing::{debug, info, warn};

use super::Reconciler;
use crate::connectivity::Guarded;
use crate::error::{FailureKind, Result};
use crate::navigation::Route;

/// Outcome of a login, signup or social login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// A session was established and persisted
    Authenticated {
        /// Id of the authenticated user
        user_id: String,
    },
    /// The backend refused the attempt; `message` is meant for the user
    Rejected {
        /// First structured error message from the backend
        message: String,
    },
    /// The attempt could not be completed
    Failed(FailureKind),
}

impl AuthOutcome {
    /// Whether a session was established
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated { .. })
    }

    fn offline() -> Self {
        AuthOutcome::Failed(FailureKind::ConnectivityFailure)
    }

    fn rejected(error: &ApiError) -> Self {
        let message = error
            .first_message()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        AuthOutcome::Rejected { message }
    }
}

impl Reconciler {
    /// Log in with an existing account
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthOutcome> {
        self.authenticate(AuthMode::Login, username, password).await
    }

    /// Attach a username and password to the current guest
    pub async fn signup(&self, username: &str, password: &str) -> Result<AuthOutcome> {
        self.authenticate(AuthMode::Signup, username, password)
            .await
    }

    /// Authenticate with a username and password
    ///
    /// Any token held by the current session is invalidated on the backend
    /// first. On success the course selection is closed, the new credential is
    /// persisted, user details are refetched and the home route is pushed. A
    /// rejected attempt leaves the existing session and stored credential alone.
    pub async fn authenticate(
        &self,
        mode: AuthMode,
        username: &str,
        password: &str,
    ) -> Result<AuthOutcome> {
        if let Some((user_id, token)) = self.current_credential_pair() {
            debug!(user_id, "invalidating token of prior session");
            let clear = MutationKind::ClearToken;
            let call = self.api.clear_token(&user_id, &token);
            match self.connectivity.run(&clear.to_string(), call).await {
                Guarded::Completed(()) => {
                    let mut state = self.state.lock();
                    state.queries.invalidate_many(clear.invalidates());
                }
                Guarded::Offline => return Ok(AuthOutcome::offline()),
                Guarded::Rejected(error) => {
                    warn!(user_id, %error, "could not invalidate prior token, continuing");
                }
            }
        }

        let kind = match mode {
            AuthMode::Login => MutationKind::Login,
            AuthMode::Signup => MutationKind::Signup,
        };
        let params = AuthParams::new(username, password, self.config.device_id());
        let call = async {
            match mode {
                AuthMode::Login => self.api.login(&params).await,
                AuthMode::Signup => self.api.signup(&params).await,
            }
        };

        let user = match self.connectivity.run(&kind.to_string(), call).await {
            Guarded::Completed(user) => user,
            Guarded::Offline => return Ok(AuthOutcome::offline()),
            Guarded::Rejected(error) => {
                info!(username, %error, "authentication rejected");
                return Ok(AuthOutcome::rejected(&error));
            }
        };

        let Some((user_id, token)) = user.credential_pair() else {
            warn!(username, "authentication response lacked user id or token");
            return Ok(AuthOutcome::Failed(FailureKind::MalformedAuthResponse));
        };
        self.credentials
            .save_password_credential(user_id, token)
            .await?;
        let user_id = user_id.to_string();

        {
            let mut state = self.state.lock();
            state.course.clear();
            state.session.replace(user);
            state.queries.invalidate_many(kind.invalidates());
        }

        if let Err(error) = self.refresh_user_details().await {
            warn!(%error, "could not refresh user details after {}", kind);
        }

        self.navigator.push(Route::Home);
        info!(user_id, "authenticated via {}", kind);
        Ok(AuthOutcome::Authenticated { user_id })
    }

    /// Establish a session from a token the social provider just issued
    pub async fn login_with_social_token(&self, fb_token: &str) -> Result<AuthOutcome> {
        let kind = MutationKind::RestoreSocialSession;
        let call = self.api.restore_session_via_social_provider(fb_token);

        let user = match self.connectivity.run(&kind.to_string(), call).await {
            Guarded::Completed(user) => user,
            Guarded::Offline => return Ok(AuthOutcome::offline()),
            Guarded::Rejected(error) => {
                info!(%error, "social login rejected");
                return Ok(AuthOutcome::rejected(&error));
            }
        };
        if user.credential_pair().is_none() {
            warn!("social login response lacked user id or token");
            return Ok(AuthOutcome::Failed(FailureKind::MalformedAuthResponse));
        }

        self.credentials.save_social_token(fb_token).await?;
        let user_id = user.id.clone();
        {
            let mut state = self.state.lock();
            state.session.replace(user);
            state.queries.invalidate_many(kind.invalidates());
        }

        if let Err(error) = self.refresh_user_details().await {
            warn!(%error, "could not refresh user details after social login");
        }

        self.navigator.push(Route::Home);
        info!(user_id, "authenticated via social provider");
        Ok(AuthOutcome::Authenticated { user_id })
    }

    /// End the session locally and on the backend
    ///
    /// A failure to invalidate the remote token is logged; local teardown
    /// always completes and the API client stops presenting the old token.
    pub async fn logout(&self) -> Result<()> {
        // Not routed through the connectivity guard: logout never redirects
        if let Some((user_id, token)) = self.current_credential_pair() {
            match self.api.clear_token(&user_id, &token).await {
                Ok(()) => debug!(user_id, "remote token invalidated"),
                Err(error) => warn!(user_id, %error, "could not invalidate remote token"),
            }
        }
        self.api.forget_access_token().await;

        let had_social_token = self.credentials.load().await?.social_token().is_some();
        self.credentials.clear_all().await?;
        if had_social_token {
            self.social.logout();
        }

        self.state.lock().sign_out();
        info!("logged out");
        Ok(())
    }

    fn current_credential_pair(&self) -> Option<(String, String)> {
        self.state
            .lock()
            .session
            .credential_pair()
            .map(|(user_id, token)| (user_id.to_string(), token.to_string()))
    }
}
