/// HTTP transport used for every outbound call
use crate::error::{AmpError, AmpResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Raw HTTP response as seen by the client
///
/// Non-success statuses are not errors at this layer; callers get the status and body
/// and decide what to do with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport backend trait
///
/// Implementations perform a single request and report transport failures as errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request
    async fn get(&self, url: &str) -> AmpResult<HttpResponse>;

    /// Issue a POST request with a JSON body
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> AmpResult<HttpResponse>;
}

/// Transport backed by `reqwest`
#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the given user agent and per-request timeout
    pub fn new(user_agent: &str, timeout: Duration) -> AmpResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| AmpError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::from_client(http_client))
    }

    /// Wrap an existing client
    pub fn from_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    async fn into_response(response: reqwest::Response) -> AmpResult<HttpResponse> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> AmpResult<HttpResponse> {
        debug!("GET {}", url);

        let response = self.http_client.get(url).send().await?;
        Self::into_response(response).await
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> AmpResult<HttpResponse> {
        debug!("POST {}", url);

        let response = self.http_client.post(url).json(body).send().await?;
        Self::into_response(response).await
    }
}
