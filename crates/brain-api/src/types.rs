//! Records exchanged with the Brain backend
//!
//! Field names follow the GraphQL payloads (`_id`, camelCase).

use serde::{Deserialize, Serialize};

/// Authenticated (or guest) user as returned by the auth mutations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Server-side user id
    #[serde(rename = "_id")]
    pub id: String,
    /// Username, absent for guests
    pub username: Option<String>,
    /// Whether the account has been activated
    pub activated: Option<bool>,
    /// Email address
    pub email: Option<String>,
    /// Linked Facebook account id
    pub facebook_id: Option<String>,
    /// Freshly issued access token
    pub current_access_token: Option<String>,
}

impl UserRecord {
    /// The user id and access token, if the record carries both
    pub fn credential_pair(&self) -> Option<(&str, &str)> {
        match self.current_access_token.as_deref() {
            Some(token) if !self.id.is_empty() && !token.is_empty() => {
                Some((self.id.as_str(), token))
            }
            _ => None,
        }
    }
}

/// Experience progress tracked for a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    /// Current level
    pub level: u32,
    /// Whether a level-up notice is pending
    pub show_level_up: bool,
}

/// Server-owned per-user state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    /// Id of the course the server considers selected
    pub selected_course: Option<String>,
    /// Whether the tutorial has been dismissed
    pub has_disabled_tutorial: Option<bool>,
    /// Casual mode flag
    pub is_casual: Option<bool>,
    /// Experience progress
    pub experience: Option<Experience>,
}

/// A course that can be selected
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Course id
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name
    pub name: Option<String>,
    /// Theme color
    pub color: Option<String>,
    /// Disabled courses are listed but cannot be selected
    #[serde(default)]
    pub is_disabled: bool,
}

impl Course {
    /// Create an enabled course with the given id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the theme color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Mark the course as disabled
    pub fn disabled(mut self) -> Self {
        self.is_disabled = true;
        self
    }
}

/// Whether an authentication request logs into an existing account or signs up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Existing username/password
    Login,
    /// Attach a username/password to the current guest
    Signup,
}

/// Username/password authentication parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthParams {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
    /// Device the token is issued for
    pub device_id: String,
    /// Ask the server to persist the issued token
    pub save_token: bool,
}

impl AuthParams {
    /// Create parameters that request a saved token
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            device_id: device_id.into(),
            save_token: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_record_from_payload() {
        let user: UserRecord = serde_json::from_value(json!({
            "_id": "u1",
            "username": "alice",
            "activated": true,
            "facebookId": null,
            "currentAccessToken": "tok"
        }))
        .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(user.credential_pair(), Some(("u1", "tok")));
    }

    #[test]
    fn test_credential_pair_requires_token() {
        let user = UserRecord {
            id: "u1".to_string(),
            ..Default::default()
        };
        assert!(user.credential_pair().is_none());

        let user = UserRecord {
            id: "u1".to_string(),
            current_access_token: Some(String::new()),
            ..Default::default()
        };
        assert!(user.credential_pair().is_none());
    }

    #[test]
    fn test_course_defaults_to_enabled() {
        let payload = json!({ "_id": "c1", "color": "#68b888" });
        let course: Course = serde_json::from_value(payload).unwrap();
        assert!(!course.is_disabled);
        assert_eq!(course, Course::new("c1").with_color("#68b888"));
    }

    #[test]
    fn test_user_details_payload() {
        let details: UserDetails = serde_json::from_value(json!({
            "selectedCourse": "c1",
            "hasDisabledTutorial": false,
            "isCasual": true,
            "experience": { "level": 3, "showLevelUp": false }
        }))
        .unwrap();

        assert_eq!(details.selected_course.as_deref(), Some("c1"));
        assert_eq!(details.experience.map(|e| e.level), Some(3));
    }
}
