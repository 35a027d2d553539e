/// Shared fixtures for client integration tests
use amp_url_api::{AmpError, AmpResult, HttpResponse, HttpTransport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

pub const VALID_AMP_PAGE: &str = r#"<!doctype html>
<html ⚡>
<head>
  <meta charset="utf-8">
  <script async src="https://cdn.ampproject.org/v0.js"></script>
  <link rel="canonical" href="https://www.example.com/story">
  <meta name="viewport" content="width=device-width">
  <style amp-boilerplate>body{visibility:hidden}</style>
</head>
<body>Hello</body>
</html>"#;

pub const PLAIN_PAGE: &str = "<html><head><title>Story</title></head><body>Hi</body></html>";

/// A recorded outbound call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

/// Transport answering from a fixed route table
///
/// Routes match on URL prefix; the first match wins. Unmatched URLs return 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<(String, Result<HttpResponse, String>)>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, prefix: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes
            .push((prefix.to_string(), Ok(HttpResponse::new(status, body))));
        self
    }

    pub fn failing_route(mut self, prefix: &str, message: &str) -> Self {
        self.routes.push((prefix.to_string(), Err(message.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, prefix: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.url.starts_with(prefix))
            .collect()
    }

    fn respond(&self, method: &'static str, url: &str, body: Option<Value>) -> AmpResult<HttpResponse> {
        self.calls.lock().unwrap().push(Call {
            method,
            url: url.to_string(),
            body,
        });

        match self.routes.iter().find(|(prefix, _)| url.starts_with(prefix.as_str())) {
            Some((_, Ok(response))) => Ok(response.clone()),
            Some((_, Err(message))) => Err(AmpError::UnexpectedResponse(message.clone())),
            None => Ok(HttpResponse::new(404, "Not Found")),
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &str) -> AmpResult<HttpResponse> {
        self.respond("GET", url, None)
    }

    async fn post_json(&self, url: &str, body: &Value) -> AmpResult<HttpResponse> {
        self.respond("POST", url, Some(body.clone()))
    }
}

/// caches.json body with two providers
pub fn caches_body() -> String {
    json!({
        "caches": [
            {
                "id": "google",
                "name": "Google AMP Cache",
                "docs": "https://developers.google.com/amp/cache/",
                "cacheDomain": "cdn.ampproject.org",
                "updateCacheApiDomainSuffix": "cdn.ampproject.org",
                "thirdPartyFrameDomainSuffix": "ampproject.net"
            },
            {
                "id": "bing",
                "name": "Bing AMP Cache",
                "docs": "https://www.bing.com/webmaster/help/bing-amp-cache-bc1c884c",
                "cacheDomain": "www.bing-amp.com",
                "updateCacheApiDomainSuffix": "www.bing-amp.com",
                "thirdPartyFrameDomainSuffix": "www.bing-amp.net"
            }
        ]
    })
    .to_string()
}
