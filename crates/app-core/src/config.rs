//! Application configuration
//!
//! Builder-style settings for the backend endpoint, local storage and device
//! identity, with an optional environment overlay.

use brain_api::GraphqlClientConfig;
use std::time::Duration;
use storage::KvConfig;

use crate::error::{ReconcileError, Result};

/// Device id used when the platform does not provide one
pub const DEFAULT_DEVICE_ID: &str = "defaultMobileClient";

/// Environment variable overriding the GraphQL endpoint
pub const ENV_API_URL: &str = "BRAIN_API_URL";
/// Environment variable overriding the device id
pub const ENV_DEVICE_ID: &str = "BRAIN_DEVICE_ID";
/// Environment variable overriding the storage path
pub const ENV_STORAGE_PATH: &str = "BRAIN_STORAGE_PATH";
/// Environment variable overriding the request timeout, in seconds
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "BRAIN_REQUEST_TIMEOUT_SECS";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// GraphQL endpoint URL
    pub api_url: String,
    /// Platform device id, if known
    pub device_id: Option<String>,
    /// Path of the local key-value database
    pub storage_path: String,
    /// HTTP request timeout
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api = GraphqlClientConfig::default();
        let kv = KvConfig::default();
        Self {
            api_url: api.endpoint,
            device_id: None,
            storage_path: kv.path,
            request_timeout: api.timeout,
        }
    }
}

impl AppConfig {
    /// Create a configuration for the given endpoint
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Set the device id
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Set the storage path
    pub fn with_storage_path(mut self, path: impl Into<String>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Defaults overlaid with any `BRAIN_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Overlay values from a lookup function (environment, settings file, ...)
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(device_id) = lookup(ENV_DEVICE_ID) {
            self.device_id = Some(device_id);
        }
        if let Some(path) = lookup(ENV_STORAGE_PATH) {
            self.storage_path = path;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            let Ok(secs) = raw.trim().parse::<u64>() else {
                return Err(invalid_timeout(&raw));
            };
            self.request_timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }

    /// The device id sent with token-issuing requests
    pub fn device_id(&self) -> &str {
        match self.device_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => DEFAULT_DEVICE_ID,
        }
    }

    /// HTTP client settings
    pub fn graphql_config(&self) -> GraphqlClientConfig {
        GraphqlClientConfig::new(self.api_url.clone())
            .with_timeout(self.request_timeout)
    }

    /// Local storage settings
    pub fn kv_config(&self) -> KvConfig {
        KvConfig::new(self.storage_path.clone())
    }
}

fn invalid_timeout(raw: &str) -> ReconcileError {
    let message = format!("expected whole seconds, got {:?}", raw);
    ReconcileError::Config(format!("{}: {}", ENV_REQUEST_TIMEOUT_SECS, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_device_id_fallback() {
        let config = AppConfig::default();
        assert_eq!(config.device_id(), DEFAULT_DEVICE_ID);

        let config = AppConfig::default().with_device_id("");
        assert_eq!(config.device_id(), DEFAULT_DEVICE_ID);

        let config = AppConfig::default().with_device_id("ios-1234");
        assert_eq!(config.device_id(), "ios-1234");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, "http://localhost:3000/graphql"),
            (ENV_DEVICE_ID, "device-7"),
            (ENV_STORAGE_PATH, "/tmp/brain.db"),
            (ENV_REQUEST_TIMEOUT_SECS, "12"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::default()
            .with_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_url, "http://localhost:3000/graphql");
        assert_eq!(config.device_id(), "device-7");
        assert_eq!(config.kv_config().path, "/tmp/brain.db");
        assert_eq!(config.graphql_config().timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let lookup = |name: &str| match name {
            ENV_REQUEST_TIMEOUT_SECS => Some("soon".to_string()),
            _ => None,
        };

        let result = AppConfig::default().with_overrides(lookup);
        assert!(matches!(result, Err(ReconcileError::Config(_))));
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::new("https://example.test/graphql")
            .with_storage_path("state.db")
            .with_request_timeout(Duration::from_secs(3));

        let api = config.graphql_config();
        assert_eq!(api.endpoint, "https://example.test/graphql");
        assert_eq!(config.storage_path, "state.db");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }
}
