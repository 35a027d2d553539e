/// AMP cache providers and signed update-cache URLs
///
/// The provider registry lives at `https://cdn.ampproject.org/caches.json` and
/// is fetched fresh for every cache update; nothing here is persisted.

pub mod update_url;

pub use update_url::{
    dasherize_host, CacheUpdatePath, CacheUpdateTarget, SignedCacheUrl, DEFAULT_ACTION,
    DEFAULT_CONTENT_TYPE,
};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A third-party AMP cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheProvider {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_domain: Option<String>,

    /// Domain suffix of the update-cache API, e.g. `cdn.ampproject.org`
    pub update_cache_api_domain_suffix: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_party_frame_domain_suffix: Option<String>,

    /// Fields this client does not interpret
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Body of the caches registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRegistry {
    pub caches: Vec<CacheProvider>,
}
