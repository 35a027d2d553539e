/// Configuration management for the AMP URL API client
use crate::error::{AmpError, AmpResult};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the Google API key
pub const API_KEY_ENV: &str = "AMP_API_KEY";
/// Environment variable holding the path to the PEM private key
pub const PRIVATE_KEY_ENV: &str = "AMP_RSA_PRIVATE_KEY";

pub const DEFAULT_API_BASE: &str = "https://acceleratedmobilepageurl.googleapis.com";
pub const DEFAULT_CACHES_URL: &str = "https://cdn.ampproject.org/caches.json";

/// Main client configuration
#[derive(Debug, Clone)]
pub struct AmpConfig {
    /// Google API key; discovery and batch lookups are disabled without it
    pub api_key: Option<String>,
    /// PEM private key used to sign cache updates
    pub key_path: Option<PathBuf>,
    pub endpoints: ApiEndpoints,
    /// User-Agent header for HTTP requests
    pub user_agent: String,
    /// Per-request timeout applied by the default transport
    pub request_timeout: Duration,
    pub rate_limit: RateLimitPolicy,
}

/// Remote endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    /// Base URL of the AMP URL API, without a trailing slash
    pub api_base: String,
    /// AMP cache provider registry
    pub caches_url: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            caches_url: DEFAULT_CACHES_URL.to_string(),
        }
    }
}

impl ApiEndpoints {
    /// Discovery document URL
    pub fn discovery_url(&self, api_key: &str) -> String {
        format!(
            "{}/$discovery/rest?version=v1&key={}",
            self.api_base,
            urlencoding::encode(api_key)
        )
    }

    /// ampUrls:batchGet URL
    pub fn batch_get_url(&self, api_key: &str) -> String {
        format!(
            "{}/v1/ampUrls:batchGet?key={}",
            self.api_base,
            urlencoding::encode(api_key)
        )
    }
}

/// Limits of the AMP URL API
///
/// The service allows 10 queries per 100 seconds and 50 URLs per batchGet call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// URLs per batchGet request
    pub max_urls_per_request: usize,
    /// Requests per rate window
    pub max_requests_per_window: usize,
    /// Wait after each request of a chunked batch
    pub cooldown: Duration,
    /// Length of the service's rate window
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_urls_per_request: 50,
            max_requests_per_window: 10,
            cooldown: Duration::from_secs(10),
            window: Duration::from_secs(100),
        }
    }
}

impl Default for AmpConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            key_path: None,
            endpoints: ApiEndpoints::default(),
            user_agent: format!("amp-url-api/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: Duration::from_secs(30),
            rate_limit: RateLimitPolicy::default(),
        }
    }
}

impl AmpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn key_path(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.key_path = Some(key_path.into());
        self
    }

    pub fn endpoints(mut self, endpoints: ApiEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn rate_limit(mut self, rate_limit: RateLimitPolicy) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Load configuration from environment variables (and `.env`, if present)
    pub fn from_env() -> AmpResult<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::default().fill_from_env();

        if let Ok(api_base) = env::var("AMP_API_BASE_URL") {
            config.endpoints.api_base = api_base.trim_end_matches('/').to_string();
        }
        if let Ok(caches_url) = env::var("AMP_CACHES_URL") {
            config.endpoints.caches_url = caches_url;
        }

        config.request_timeout = Duration::from_secs(
            env::var("AMP_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| AmpError::Configuration("Invalid AMP_HTTP_TIMEOUT_SECS".to_string()))?,
        );
        config.rate_limit.cooldown = Duration::from_secs(
            env::var("AMP_BATCH_COOLDOWN_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| AmpError::Configuration("Invalid AMP_BATCH_COOLDOWN_SECS".to_string()))?,
        );
        config.rate_limit.window = Duration::from_secs(
            env::var("AMP_RATE_WINDOW_SECS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .map_err(|_| AmpError::Configuration("Invalid AMP_RATE_WINDOW_SECS".to_string()))?,
        );

        Ok(config)
    }

    /// Fill a missing API key and key path from `AMP_API_KEY` / `AMP_RSA_PRIVATE_KEY`
    ///
    /// Explicitly configured values win; empty values count as missing.
    pub fn fill_from_env(mut self) -> Self {
        if self.api_key.as_deref().map_or(true, str::is_empty) {
            self.api_key = env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        }
        if self.key_path.as_ref().map_or(true, |p| p.as_os_str().is_empty()) {
            self.key_path = env::var(PRIVATE_KEY_ENV)
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from);
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> AmpResult<()> {
        if self.rate_limit.max_urls_per_request == 0 {
            return Err(AmpError::Configuration(
                "max_urls_per_request must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.max_requests_per_window == 0 {
            return Err(AmpError::Configuration(
                "max_requests_per_window must be at least 1".to_string(),
            ));
        }

        for endpoint in [&self.endpoints.api_base, &self.endpoints.caches_url] {
            url::Url::parse(endpoint).map_err(|e| {
                AmpError::Configuration(format!("Invalid endpoint {}: {}", endpoint, e))
            })?;
        }

        Ok(())
    }
}
