//! GraphQL-over-HTTP client
//!
//! Every operation is a JSON `POST` of `{ operationName, query, variables }` to a single
//! endpoint. Once an auth mutation yields an access token, it is attached to later
//! requests as a bearer token.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::api::BrainApi;
use crate::operations::{self, Operation};
use crate::types::{AuthParams, Course, UserDetails, UserRecord};
use crate::{ApiError, GraphqlErrorMessage, Result};

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the GraphQL client
#[derive(Debug, Clone)]
pub struct GraphqlClientConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Custom headers to include in all requests
    pub default_headers: HashMap<String, String>,
}

impl Default for GraphqlClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://thebrain.pro/graphql".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("Brain-Mobile/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
        }
    }
}

impl GraphqlClientConfig {
    /// Create a new config with an endpoint URL
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// Wire Format
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlRequest<'a> {
    operation_name: &'a str,
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

fn malformed(operation: &Operation, detail: &str) -> ApiError {
    ApiError::MalformedResponse(format!("{}: {}", operation.name, detail))
}

// =============================================================================
// Client Implementation
// =============================================================================

/// GraphQL client for the Brain backend
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    client: ReqwestClient,
    config: GraphqlClientConfig,
    access_token: Arc<RwLock<Option<String>>>,
}

impl GraphqlClient {
    /// Create a new client
    pub fn new(config: GraphqlClientConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &GraphqlClientConfig {
        &self.config
    }

    /// The token currently attached to requests
    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// Replace the token attached to requests
    pub async fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().await = token;
    }

    /// Execute an operation and decode the field it names from `data`
    pub async fn execute<T>(&self, operation: &Operation, variables: Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let body = GraphqlRequest {
            operation_name: operation.name,
            query: operation.document,
            variables,
        };

        let mut req = self.client.post(&self.config.endpoint).json(&body);

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        if let Some(token) = self.access_token.read().await.as_deref() {
            req = req.bearer_auth(token);
        }

        tracing::debug!(operation = operation.name, "sending GraphQL request");

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let error = match serde_json::from_str::<GraphqlResponse>(&text) {
                Ok(parsed) if status.is_client_error() && !parsed.errors.is_empty() => {
                    ApiError::Graphql(parsed.errors)
                }
                _ => ApiError::Http {
                    status: status.as_u16(),
                    message: text,
                },
            };
            tracing::warn!(operation = operation.name, %error, "GraphQL request failed");
            return Err(error);
        }

        let parsed: GraphqlResponse = serde_json::from_str(&text)?;

        if !parsed.errors.is_empty() {
            let error = ApiError::Graphql(parsed.errors);
            tracing::warn!(operation = operation.name, %error, "GraphQL request rejected");
            return Err(error);
        }

        let Some(mut data) = parsed.data else {
            return Err(malformed(operation, "missing data"));
        };

        let Some(field) = data.get_mut(operation.field).map(Value::take) else {
            return Err(malformed(operation, "missing field"));
        };

        Ok(serde_json::from_value(field)?)
    }

    /// Run an auth mutation and remember the token it issues
    async fn authenticate(&self, operation: &Operation, variables: Value) -> Result<UserRecord> {
        let user: Option<UserRecord> = self.execute(operation, variables).await?;
        let Some(user) = user else {
            return Err(malformed(operation, "no user returned"));
        };

        if let Some(token) = &user.current_access_token {
            self.set_access_token(Some(token.clone())).await;
        }

        Ok(user)
    }
}

#[async_trait]
impl BrainApi for GraphqlClient {
    async fn restore_session(
        &self,
        user_id: &str,
        access_token: &str,
        device_id: &str,
    ) -> Result<UserRecord> {
        self.authenticate(
            &operations::LOG_IN_WITH_TOKEN,
            json!({ "accessToken": access_token, "userId": user_id, "deviceId": device_id }),
        )
        .await
    }

    async fn restore_session_via_social_provider(
        &self,
        access_token_fb: &str,
    ) -> Result<UserRecord> {
        self.authenticate(
            &operations::LOG_IN_WITH_FACEBOOK_ACCESS_TOKEN,
            json!({ "accessTokenFb": access_token_fb }),
        )
        .await
    }

    async fn login(&self, params: &AuthParams) -> Result<UserRecord> {
        let variables = serde_json::to_value(params)?;
        self.authenticate(&operations::LOG_IN, variables).await
    }

    async fn signup(&self, params: &AuthParams) -> Result<UserRecord> {
        let variables = serde_json::to_value(params)?;
        self.authenticate(&operations::SET_USERNAME_AND_PASSWORD_FOR_GUEST, variables)
            .await
    }

    async fn clear_token(&self, user_id: &str, token: &str) -> Result<()> {
        let variables = json!({ "userId": user_id, "token": token });
        let _: Value = self.execute(&operations::CLEAR_TOKEN, variables).await?;

        let mut current = self.access_token.write().await;
        if current.as_deref() == Some(token) {
            *current = None;
        }
        Ok(())
    }

    async fn forget_access_token(&self) {
        self.set_access_token(None).await;
    }

    async fn select_course_save_token(
        &self,
        course_id: &str,
        device_id: &str,
    ) -> Result<UserDetails> {
        let variables = json!({ "courseId": course_id, "deviceId": device_id });
        self.execute(&operations::SELECT_COURSE_SAVE_TOKEN, variables)
            .await
    }

    async fn close_course(&self) -> Result<UserDetails> {
        self.execute(&operations::CLOSE_COURSE, json!({})).await
    }

    async fn current_user(&self) -> Result<Option<UserRecord>> {
        let user: Option<UserRecord> = self.execute(&operations::CURRENT_USER, json!({})).await?;

        if let Some(token) = user.as_ref().and_then(|u| u.current_access_token.clone()) {
            self.set_access_token(Some(token)).await;
        }

        Ok(user)
    }

    async fn user_details(&self) -> Result<UserDetails> {
        self.execute(&operations::USER_DETAILS, json!({})).await
    }

    async fn courses(&self) -> Result<Vec<Course>> {
        let courses: Option<Vec<Course>> = self.execute(&operations::COURSES, json!({})).await?;
        Ok(courses.unwrap_or_default())
    }
}

// =============================================================================
// Client Tests
// =============================================================================
