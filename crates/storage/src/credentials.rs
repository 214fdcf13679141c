//! Persisted credentials
//!
//! Typed access to the well-known keys holding the user's identity and tokens,
//! plus the onboarding flag checked at startup.

use std::sync::Arc;

use crate::kv::{KeyValueStore, Result};

/// Storage key for the user id
pub const USER_ID_KEY: &str = "userId";
/// Storage key for the password-login access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key for the social-provider access token
pub const SOCIAL_TOKEN_KEY: &str = "accessTokenFb";
/// Storage key for the "intro already seen" onboarding flag
pub const INTRO_DISABLED_KEY: &str = "isIntroDisabled";

/// Identity and tokens persisted between runs
///
/// Every field is optional: nothing is stored on first run, and the
/// password pair and the social token are invalidated independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    /// Server-side user id
    pub user_id: Option<String>,
    /// Access token from password login or a previous rotation
    pub access_token: Option<String>,
    /// Access token issued by the social login provider
    pub access_token_fb: Option<String>,
}

impl Credential {
    /// The user id and access token, if both are present
    pub fn password_pair(&self) -> Option<(&str, &str)> {
        match (&self.user_id, &self.access_token) {
            (Some(user_id), Some(token)) => Some((user_id.as_str(), token.as_str())),
            _ => None,
        }
    }

    /// The social-provider token, if present
    pub fn social_token(&self) -> Option<&str> {
        self.access_token_fb.as_deref()
    }

    /// True when nothing usable for a restore is stored
    pub fn is_empty(&self) -> bool {
        self.password_pair().is_none() && self.social_token().is_none()
    }
}

/// Credential persistence over any `KeyValueStore`
#[derive(Clone)]
pub struct CredentialStore {
    kv: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    /// Create a credential store over the given backend
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load whatever credential fields are currently stored
    pub async fn load(&self) -> Result<Credential> {
        Ok(Credential {
            user_id: self.kv.get(USER_ID_KEY).await?,
            access_token: self.kv.get(ACCESS_TOKEN_KEY).await?,
            access_token_fb: self.kv.get(SOCIAL_TOKEN_KEY).await?,
        })
    }

    /// Persist a user id together with its access token
    pub async fn save_password_credential(&self, user_id: &str, access_token: &str) -> Result<()> {
        self.kv.set(ACCESS_TOKEN_KEY, access_token).await?;
        self.kv.set(USER_ID_KEY, user_id).await?;
        tracing::debug!(user_id, "persisted credential");
        Ok(())
    }

    /// Replace the stored access token, leaving the user id untouched
    pub async fn rotate_access_token(&self, access_token: &str) -> Result<()> {
        self.kv.set(ACCESS_TOKEN_KEY, access_token).await
    }

    /// Delete the user id and access token
    pub async fn clear_password_credential(&self) -> Result<()> {
        self.kv.delete(ACCESS_TOKEN_KEY).await?;
        self.kv.delete(USER_ID_KEY).await
    }

    /// Persist the social-provider token
    pub async fn save_social_token(&self, token: &str) -> Result<()> {
        self.kv.set(SOCIAL_TOKEN_KEY, token).await
    }

    /// Delete the social-provider token
    pub async fn clear_social_token(&self) -> Result<()> {
        self.kv.delete(SOCIAL_TOKEN_KEY).await
    }

    /// Delete every credential key
    pub async fn clear_all(&self) -> Result<()> {
        self.clear_password_credential().await?;
        self.clear_social_token().await
    }

    /// Whether the onboarding intro has been dismissed on this device
    pub async fn is_intro_disabled(&self) -> Result<bool> {
        Ok(self.kv.get(INTRO_DISABLED_KEY).await?.is_some())
    }

    /// Record that the onboarding intro has been dismissed
    pub async fn disable_intro(&self) -> Result<()> {
        self.kv.set(INTRO_DISABLED_KEY, "true").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn store_with(entries: &[(&str, &str)]) -> (CredentialStore, MemoryStore) {
        let memory = MemoryStore::with_entries(entries.iter().copied());
        (CredentialStore::new(Arc::new(memory.clone())), memory)
    }

    #[tokio::test]
    async fn test_load_empty() {
        let (store, _) = store_with(&[]);
        let credential = store.load().await.unwrap();
        assert!(credential.is_empty());
        assert_eq!(credential, Credential::default());
    }

    #[tokio::test]
    async fn test_password_pair_requires_both_fields() {
        let (store, _) = store_with(&[(USER_ID_KEY, "u1")]);
        let credential = store.load().await.unwrap();
        assert!(credential.password_pair().is_none());
        assert!(credential.is_empty());

        store.rotate_access_token("tok").await.unwrap();
        let credential = store.load().await.unwrap();
        assert_eq!(credential.password_pair(), Some(("u1", "tok")));
    }

    #[tokio::test]
    async fn test_clear_password_keeps_social_token() {
        let (store, memory) = store_with(&[
            (USER_ID_KEY, "u1"),
            (ACCESS_TOKEN_KEY, "tok"),
            (SOCIAL_TOKEN_KEY, "fb"),
        ]);

        store.clear_password_credential().await.unwrap();

        assert!(!memory.contains(USER_ID_KEY).await);
        assert!(!memory.contains(ACCESS_TOKEN_KEY).await);
        assert_eq!(store.load().await.unwrap().social_token(), Some("fb"));
    }

    #[tokio::test]
    async fn test_clear_all() {
        let (store, memory) = store_with(&[(SOCIAL_TOKEN_KEY, "fb"), (INTRO_DISABLED_KEY, "true")]);
        store.save_password_credential("u2", "tok-2").await.unwrap();

        store.clear_all().await.unwrap();

        let snapshot = memory.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key(INTRO_DISABLED_KEY));
    }

    #[tokio::test]
    async fn test_intro_flag() {
        let (store, _) = store_with(&[]);
        assert!(!store.is_intro_disabled().await.unwrap());

        store.disable_intro().await.unwrap();
        assert!(store.is_intro_disabled().await.unwrap());
    }
}
