//! Mutation tracking
//!
//! Every backend mutation the reconciler issues is described by a `MutationKind`,
//! which also names the queries a successful run invalidates.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::query::QueryKey;

/// Mutation state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationState {
    /// Mutation is idle
    #[default]
    Idle,

    /// Mutation is pending (optimistic update applied)
    Pending,

    /// Mutation succeeded
    Success,

    /// Mutation failed (rolled back)
    Error,
}

impl MutationState {
    /// Whether a request is in flight
    pub fn is_pending(self) -> bool {
        self == MutationState::Pending
    }
}

/// Backend mutations issued by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    /// `logInWithToken`
    RestoreSession,
    /// `logInWithFacebookAccessToken`
    RestoreSocialSession,
    /// `logIn`
    Login,
    /// `setUsernameAndPasswordForGuest`
    Signup,
    /// `clearToken`
    ClearToken,
    /// `selectCourseSaveToken`
    SelectCourse,
    /// `closeCourse`
    CloseCourse,
}

impl MutationKind {
    /// Queries to refetch after the mutation succeeds
    ///
    /// Course mutations return the new `UserDetails` directly, so they write the
    /// cache instead of invalidating it.
    pub fn invalidates(self) -> &'static [QueryKey] {
        match self {
            MutationKind::RestoreSession
            | MutationKind::RestoreSocialSession
            | MutationKind::Login
            | MutationKind::Signup => &[QueryKey::CurrentUser, QueryKey::UserDetails],
            MutationKind::ClearToken => &[QueryKey::CurrentUser],
            MutationKind::SelectCourse | MutationKind::CloseCourse => &[],
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationKind::RestoreSession => "logInWithToken",
            MutationKind::RestoreSocialSession => "logInWithFacebookAccessToken",
            MutationKind::Login => "logIn",
            MutationKind::Signup => "setUsernameAndPasswordForGuest",
            MutationKind::ClearToken => "clearToken",
            MutationKind::SelectCourse => "selectCourseSaveToken",
            MutationKind::CloseCourse => "closeCourse",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(MutationState::default(), MutationState::Idle);
        assert!(MutationState::Pending.is_pending());
        assert!(!MutationState::Success.is_pending());
    }

    #[test]
    fn test_auth_mutations_invalidate_user_queries() {
        for kind in [
            MutationKind::Login,
            MutationKind::Signup,
            MutationKind::RestoreSession,
        ] {
            assert!(kind.invalidates().contains(&QueryKey::CurrentUser));
            assert!(kind.invalidates().contains(&QueryKey::UserDetails));
        }
        assert!(MutationKind::SelectCourse.invalidates().is_empty());
    }

    #[test]
    fn test_display_uses_operation_names() {
        assert_eq!(
            MutationKind::SelectCourse.to_string(),
            "selectCourseSaveToken"
        );
        assert_eq!(
            MutationKind::Signup.to_string(),
            "setUsernameAndPasswordForGuest"
        );
    }
}
