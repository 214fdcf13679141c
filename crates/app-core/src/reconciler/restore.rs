//! Session restore from persisted credentials

use app_state::MutationKind;
use brain_api::UserRecord;
use tracing::{debug, info, warn};

use super::Reconciler;
use crate::error::{FailureKind, Result};
use crate::platform::Notice;

/// Outcome of one restore branch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BranchOutcome {
    /// Nothing was stored for this branch
    #[default]
    Skipped,
    /// The backend accepted the stored token
    Restored {
        /// Id of the restored user
        user_id: String,
    },
    /// The stored token was refused and has been deleted
    Failed(FailureKind),
}

impl BranchOutcome {
    /// Whether this branch produced a session
    pub fn is_restored(&self) -> bool {
        matches!(self, BranchOutcome::Restored { .. })
    }
}

/// Per-branch result of [`Reconciler::restore_session`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Stored user id and access token
    pub password: BranchOutcome,
    /// Stored social-provider token
    pub social: BranchOutcome,
}

impl RestoreReport {
    /// Whether either branch produced a session
    pub fn is_restored(&self) -> bool {
        self.password.is_restored() || self.social.is_restored()
    }
}

impl Reconciler {
    /// Resurrect a session from the stored credential
    ///
    /// The password and social branches run concurrently and each touches only
    /// its own storage keys. A refused credential is deleted and the user is told
    /// to log in again.
    pub async fn restore_session(&self) -> Result<RestoreReport> {
        let credential = self.credentials.load().await?;
        if credential.is_empty() {
            debug!("no stored credential to restore");
            return Ok(RestoreReport::default());
        }

        let (password, social) = tokio::join!(
            self.restore_password_branch(credential.password_pair()),
            self.restore_social_branch(credential.social_token()),
        );

        let report = RestoreReport {
            password: password?,
            social: social?,
        };
        info!(password = ?report.password, social = ?report.social, "restore finished");
        Ok(report)
    }

    async fn restore_password_branch(&self, stored: Option<(&str, &str)>) -> Result<BranchOutcome> {
        let Some((user_id, access_token)) = stored else {
            return Ok(BranchOutcome::Skipped);
        };

        debug!(user_id, "exchanging stored access token");
        let device_id = self.config.device_id();
        let call = self.api.restore_session(user_id, access_token, device_id);
        let user = match call.await {
            Ok(user) => user,
            Err(error) => {
                warn!(user_id, %error, "stored credential rejected");
                self.expire_password_credential().await?;
                let kind = if error.is_connectivity() {
                    FailureKind::ConnectivityFailure
                } else {
                    FailureKind::StaleCredential
                };
                return Ok(BranchOutcome::Failed(kind));
            }
        };

        let Some((restored_id, rotated_token)) = user.credential_pair() else {
            warn!(user_id, "restore response lacked user id or token");
            self.expire_password_credential().await?;
            return Ok(BranchOutcome::Failed(FailureKind::MalformedAuthResponse));
        };

        self.credentials.rotate_access_token(rotated_token).await?;
        let user_id = restored_id.to_string();
        self.apply_restored(user, MutationKind::RestoreSession);
        info!(user_id, "session restored, access token rotated");

        Ok(BranchOutcome::Restored { user_id })
    }

    async fn restore_social_branch(&self, stored: Option<&str>) -> Result<BranchOutcome> {
        let Some(fb_token) = stored else {
            return Ok(BranchOutcome::Skipped);
        };

        debug!("exchanging stored social token");
        let call = self.api.restore_session_via_social_provider(fb_token);
        match call.await {
            Ok(user) if user.credential_pair().is_some() => {
                let user_id = user.id.clone();
                self.apply_restored(user, MutationKind::RestoreSocialSession);
                info!(user_id, "session restored via social provider");
                Ok(BranchOutcome::Restored { user_id })
            }
            Ok(_) => {
                warn!("social restore response lacked user id or token");
                self.expire_social_token().await?;
                Ok(BranchOutcome::Failed(FailureKind::MalformedAuthResponse))
            }
            Err(error) => {
                warn!(%error, "stored social token rejected");
                self.expire_social_token().await?;
                Ok(BranchOutcome::Failed(FailureKind::ExpiredSocialToken))
            }
        }
    }

    fn apply_restored(&self, user: UserRecord, kind: MutationKind) {
        let mut state = self.state.lock();
        state.session.replace(user);
        state.queries.invalidate_many(kind.invalidates());
    }

    async fn expire_password_credential(&self) -> Result<()> {
        self.credentials.clear_password_credential().await?;
        self.notifier.notify(Notice::LoggedOut);
        Ok(())
    }

    async fn expire_social_token(&self) -> Result<()> {
        self.credentials.clear_social_token().await?;
        self.social.logout();
        self.notifier.notify(Notice::SocialLoginExpired);
        Ok(())
    }
}
