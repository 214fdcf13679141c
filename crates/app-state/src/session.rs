//! In-memory session
//!
//! The session is derived from backend authentication responses and never
//! persisted directly; persisted credentials live in the storage crate.

use brain_api::UserRecord;
use serde::{Deserialize, Serialize};

/// The identity the client is currently acting as
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// User returned by the last successful authentication
    pub current_user: Option<UserRecord>,
    /// Access token issued with that user
    pub current_access_token: Option<String>,
}

impl Session {
    /// Build a session from an authentication response
    pub fn from_user(user: UserRecord) -> Self {
        let current_access_token = user.current_access_token.clone();
        Self {
            current_user: Some(user),
            current_access_token,
        }
    }

    /// Authenticated only when both an identity and a token are present
    pub fn is_authenticated(&self) -> bool {
        self.credential_pair().is_some()
    }

    /// Whether any user identity is known
    pub fn has_user(&self) -> bool {
        self.current_user.is_some()
    }

    /// Id of the current user
    pub fn user_id(&self) -> Option<&str> {
        self.current_user.as_ref().map(|u| u.id.as_str())
    }

    /// The user id and access token, if both are present
    pub fn credential_pair(&self) -> Option<(&str, &str)> {
        match (self.user_id(), self.current_access_token.as_deref()) {
            (Some(user_id), Some(token)) if !user_id.is_empty() && !token.is_empty() => {
                Some((user_id, token))
            }
            _ => None,
        }
    }

    /// Replace the session with a new authentication response
    pub fn replace(&mut self, user: UserRecord) {
        *self = Self::from_user(user);
    }

    /// Apply a fresh `CurrentUser` read
    ///
    /// Reads of the same user that omit the token keep the token already held.
    pub fn refresh_user(&mut self, user: UserRecord) {
        let keep_token =
            self.user_id() == Some(user.id.as_str()) && user.current_access_token.is_none();
        if keep_token {
            self.current_user = Some(user);
        } else {
            self.replace(user);
        }
    }

    /// Forget the current identity
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
