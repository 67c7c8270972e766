//! HTTP client for the upstream account-data provider.
//!
//! The provider's request and response bodies are opaque JSON. This module
//! only knows how to reach the login endpoint and how to hand an installed
//! session to a named query operation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Path of the provider's login operation, relative to the base URL
const LOGIN_PATH: &str = "login";

/// Key under which the installed session is sent with each query
const SESSION_KEY: &str = "loginInfo";

/// Remote calls against the provider.
///
/// `login` exchanges a credential pair for the provider's raw login response.
/// `call` runs a named query operation with an installed session payload and
/// returns the provider's raw response.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn login(&self, account_id: &str, secret: &str) -> Result<Value, ApiError>;

    async fn call(
        &self,
        session: &Value,
        operation: &str,
        params: Map<String, Value>,
    ) -> Result<Value, ApiError>;
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    phonenum: &'a str,
    password: &'a str,
}

/// reqwest-backed provider client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpRemoteClient {
    client: Client,
    base_url: String,
}

impl HttpRemoteClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, operation: &str) -> String {
        format!("{}/{}", self.base_url, operation.trim_start_matches('/'))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn post<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let text = response.text().await?;
        debug!(url = url, bytes = text.len(), "Provider response received");

        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse JSON from {}: {}", url, e)))
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn login(&self, account_id: &str, secret: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(LOGIN_PATH);
        let body = LoginRequest {
            phonenum: account_id,
            password: secret,
        };
        self.post(&url, &body).await
    }

    async fn call(
        &self,
        session: &Value,
        operation: &str,
        mut params: Map<String, Value>,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(operation);
        params.insert(SESSION_KEY.to_string(), session.clone());
        self.post(&url, &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = HttpRemoteClient::new("http://provider.local/api/", Duration::from_secs(1))
            .expect("client should build");
        assert_eq!(client.endpoint("login"), "http://provider.local/api/login");
        assert_eq!(
            client.endpoint("/qryImportantData"),
            "http://provider.local/api/qryImportantData"
        );
    }

    #[test]
    fn test_login_request_uses_provider_field_names() {
        let body = LoginRequest {
            phonenum: "1380000",
            password: "pw1",
        };
        let json = serde_json::to_value(&body).expect("serialize login body");
        assert_eq!(json, serde_json::json!({"phonenum": "1380000", "password": "pw1"}));
    }
}
