/// Update-cache URL construction and signing
///
/// See https://developers.google.com/amp/cache/update-cache for the request format.
use crate::{
    cache::CacheProvider,
    crypto::CacheSigner,
    error::{AmpError, AmpResult},
};
use std::fmt;
use url::Url;

/// Content type segment for documents
pub const DEFAULT_CONTENT_TYPE: &str = "c";
/// Cache action requested by default
pub const DEFAULT_ACTION: &str = "flush";

/// Escape a host for use as an AMP cache subdomain
///
/// Dashes are doubled before dots become dashes, so `a-b.com` and `a.b-com`
/// cannot collide.
pub fn dasherize_host(host: &str) -> String {
    host.replace('-', "--").replace('.', "-")
}

/// The parts of a page URL that feed an update-cache request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheUpdateTarget {
    /// Host as it appears in the request path, including an explicit port
    pub host: String,
    /// Subdomain form of the host name
    pub dasherized_host: String,
    pub pathname: String,
}

impl CacheUpdateTarget {
    /// Parse an absolute page URL
    pub fn parse(page_url: &str) -> AmpResult<Self> {
        let parsed = Url::parse(page_url)?;
        let host_name = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| AmpError::InvalidUrl(format!("{} has no host", page_url)))?;

        let host = match parsed.port() {
            Some(port) => format!("{}:{}", host_name, port),
            None => host_name.to_string(),
        };

        Ok(Self {
            dasherized_host: dasherize_host(host_name),
            host,
            pathname: parsed.path().to_string(),
        })
    }
}

/// Canonical, unsigned update-cache request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheUpdatePath {
    pub content_type: String,
    pub action: String,
    pub timestamp: i64,
    path: String,
}

impl CacheUpdatePath {
    pub fn new(target: &CacheUpdateTarget, content_type: &str, action: &str, timestamp: i64) -> Self {
        let path = format!(
            "/update-cache/{}/s/{}{}?amp_action={}&amp_ts={}",
            content_type, target.host, target.pathname, action, timestamp
        );

        Self {
            content_type: content_type.to_string(),
            action: action.to_string(),
            timestamp,
            path,
        }
    }

    /// The exact string that gets signed
    pub fn as_str(&self) -> &str {
        &self.path
    }
}

/// A signed update-cache URL for one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCacheUrl {
    /// Dasherized page host
    pub host: String,
    pub api_domain_suffix: String,
    pub content_type: String,
    /// Canonical path, including the `amp_action` and `amp_ts` query parameters
    pub path: String,
    pub action: String,
    pub timestamp: i64,
    /// base64url signature over `path`
    pub signature: String,
}

impl SignedCacheUrl {
    /// Sign `path` once and produce a URL per provider, in registry order
    pub fn for_providers(
        signer: &CacheSigner,
        target: &CacheUpdateTarget,
        path: &CacheUpdatePath,
        providers: &[CacheProvider],
    ) -> AmpResult<Vec<Self>> {
        let signature = signer.sign_base64url(path.as_str().as_bytes())?;

        Ok(providers
            .iter()
            .map(|provider| Self {
                host: target.dasherized_host.clone(),
                api_domain_suffix: provider.update_cache_api_domain_suffix.clone(),
                content_type: path.content_type.clone(),
                path: path.as_str().to_string(),
                action: path.action.clone(),
                timestamp: path.timestamp,
                signature: signature.clone(),
            })
            .collect())
    }

    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SignedCacheUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "https://{}.{}{}&amp_url_signature={}",
            self.host, self.api_domain_suffix, self.path, self.signature
        )
    }
}
