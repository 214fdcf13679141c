//! Course selection commit, server-driven sync and course close

use app_state::{MutationKind, SelectAttempt};
use brain_api::Course;
use tracing::{debug, info, warn};

use super::Reconciler;
use crate::connectivity::Guarded;
use crate::error::{FailureKind, Result};

/// Outcome of [`Reconciler::select_course`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The backend accepted the selection
    Committed,
    /// A course was already selected; nothing was sent
    AlreadySelected,
    /// The course or the selector is disabled; nothing was sent
    Disabled,
    /// The backend call failed and the optimistic selection was undone
    RolledBack(FailureKind),
    /// The backend accepted the selection but it was cleared locally while
    /// the call was in flight; the cleared state is kept
    Superseded,
}

/// Outcome of [`Reconciler::close_course`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The course was closed remotely and locally
    Closed,
    /// The backend call failed; local state is unchanged
    Failed(FailureKind),
}

impl Reconciler {
    /// Select `course` and commit it to the backend exactly once
    ///
    /// The selection is applied optimistically before the backend call, so a
    /// second call made while the first is in flight sees it and does nothing.
    pub async fn select_course(&self, course: &Course) -> Result<SelectOutcome> {
        let attempt = self.state.lock().course.try_select(course);
        match attempt {
            SelectAttempt::Accepted => {}
            SelectAttempt::AlreadySelected => {
                debug!(course_id = %course.id, "course already selected, ignoring");
                return Ok(SelectOutcome::AlreadySelected);
            }
            SelectAttempt::Disabled => {
                debug!(course_id = %course.id, "course disabled, ignoring");
                return Ok(SelectOutcome::Disabled);
            }
        }

        info!(course_id = %course.id, "committing course selection");
        let device_id = self.config.device_id();
        let call = self.api.select_course_save_token(&course.id, device_id);
        let operation = MutationKind::SelectCourse.to_string();
        let details = match self.connectivity.run(&operation, call).await {
            Guarded::Completed(details) => details,
            Guarded::Offline => {
                self.state.lock().course.roll_back(&course.id);
                let kind = FailureKind::ConnectivityFailure;
                return Ok(SelectOutcome::RolledBack(kind));
            }
            Guarded::Rejected(error) => {
                warn!(course_id = %course.id, %error, "course selection rejected");
                self.state.lock().course.roll_back(&course.id);
                let kind = FailureKind::RemoteRejected;
                return Ok(SelectOutcome::RolledBack(kind));
            }
        };

        let authenticated = {
            let mut state = self.state.lock();
            if !state.course.confirm(&course.id) {
                info!(course_id = %course.id, "selection cleared while commit was in flight");
                return Ok(SelectOutcome::Superseded);
            }
            state.queries.user_details.resolve(details);
            state.session.is_authenticated()
        };
        if !authenticated {
            self.promote_guest().await?;
        }

        Ok(SelectOutcome::Committed)
    }

    /// Persist the guest identity the backend created for a course selection
    async fn promote_guest(&self) -> Result<()> {
        let user = match self.refresh_current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!("no guest identity after course selection");
                return Ok(());
            }
            Err(error) => {
                warn!(%error, "could not refetch current user after course selection");
                return Ok(());
            }
        };

        match user.credential_pair() {
            Some((user_id, token)) => {
                self.credentials
                    .save_password_credential(user_id, token)
                    .await?;
                info!(user_id, "guest session persisted");
            }
            None => debug!(user_id = %user.id, "guest identity has no token yet"),
        }
        Ok(())
    }

    /// Apply the course the backend considers selected
    ///
    /// Returns `None` when the cached details name no course or a course that
    /// is not in the cached course list.
    pub async fn sync_selected_course(&self) -> Result<Option<SelectOutcome>> {
        let course = {
            let state = self.state.lock();
            let selected = state
                .queries
                .user_details
                .data()
                .and_then(|details| details.selected_course.clone());
            let Some(course_id) = selected else {
                return Ok(None);
            };
            let Some(course) = state.queries.course(&course_id).cloned() else {
                warn!(course_id, "selected course missing from course list");
                return Ok(None);
            };
            course
        };

        self.select_course(&course).await.map(Some)
    }

    /// Close the selected course
    ///
    /// Local state is reset only after the backend confirms.
    pub async fn close_course(&self) -> CloseOutcome {
        let operation = MutationKind::CloseCourse.to_string();
        let call = self.api.close_course();
        let details = match self.connectivity.run(&operation, call).await {
            Guarded::Completed(details) => details,
            Guarded::Offline => return CloseOutcome::Failed(FailureKind::ConnectivityFailure),
            Guarded::Rejected(error) => {
                warn!(%error, "course close rejected");
                return CloseOutcome::Failed(FailureKind::RemoteRejected);
            }
        };

        let mut state = self.state.lock();
        state.queries.user_details.resolve(details);
        state.course.clear();
        state.menu.close();
        info!("course closed");
        CloseOutcome::Closed
    }
}
