/// Batch AMP URL lookups
///
/// The AMP URL API accepts at most 50 URLs per `ampUrls:batchGet` call and 10
/// calls per 100 seconds. Larger requests are split into groups and windows and
/// issued one group at a time with a cooldown after each.

pub mod coordinator;
pub mod plan;
pub mod session;

pub use coordinator::BatchCoordinator;
pub use plan::{BatchPlan, RequestGroup, RequestWindow};
pub use session::RateLimitState;

use crate::{response::ParsedBody, transport::HttpResponse};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the API resolves the AMP document for a URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LookupStrategy {
    /// Fetch the live document
    #[default]
    FetchLiveDoc,
    /// Use the indexed copy only
    InIndexDoc,
    /// Anything else; sent as-is
    Other(String),
}

impl LookupStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            LookupStrategy::FetchLiveDoc => "FETCH_LIVE_DOC",
            LookupStrategy::InIndexDoc => "IN_INDEX_DOC",
            LookupStrategy::Other(other) => other,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, LookupStrategy::Other(_))
    }
}

impl From<String> for LookupStrategy {
    fn from(value: String) -> Self {
        match value.as_str() {
            "FETCH_LIVE_DOC" => LookupStrategy::FetchLiveDoc,
            "IN_INDEX_DOC" => LookupStrategy::InIndexDoc,
            _ => LookupStrategy::Other(value),
        }
    }
}

impl From<&str> for LookupStrategy {
    fn from(value: &str) -> Self {
        LookupStrategy::from(value.to_string())
    }
}

impl From<LookupStrategy> for String {
    fn from(value: LookupStrategy) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for LookupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of an `ampUrls:batchGet` request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGetRequest {
    #[serde(default)]
    pub lookup_strategy: LookupStrategy,
    #[serde(default)]
    pub urls: Vec<String>,
}

impl BatchGetRequest {
    /// Request with the default `FETCH_LIVE_DOC` strategy
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lookup_strategy: LookupStrategy::default(),
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_strategy(mut self, lookup_strategy: impl Into<LookupStrategy>) -> Self {
        self.lookup_strategy = lookup_strategy.into();
        self
    }
}

/// Outcome of a batch lookup
#[derive(Debug, Clone, PartialEq)]
pub enum BatchGetOutput {
    /// Single call: the decoded response body
    Single(ParsedBody),
    /// Chunked call: one raw response per group, in group order
    Grouped(Vec<HttpResponse>),
}

impl BatchGetOutput {
    /// Number of lookup calls that produced this output
    pub fn call_count(&self) -> usize {
        match self {
            BatchGetOutput::Single(_) => 1,
            BatchGetOutput::Grouped(responses) => responses.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strategy_wire_names() {
        assert_eq!(LookupStrategy::FetchLiveDoc.as_str(), "FETCH_LIVE_DOC");
        assert_eq!(LookupStrategy::InIndexDoc.to_string(), "IN_INDEX_DOC");
        assert_eq!(LookupStrategy::from("IN_INDEX_DOC"), LookupStrategy::InIndexDoc);

        let other = LookupStrategy::from("FETCH_CACHED_DOC");
        assert!(!other.is_supported());
        assert_eq!(other.as_str(), "FETCH_CACHED_DOC");
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = BatchGetRequest::new(["https://example.com/a"]).with_strategy("IN_INDEX_DOC");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({"lookupStrategy": "IN_INDEX_DOC", "urls": ["https://example.com/a"]})
        );
    }

    #[test]
    fn test_request_defaults_when_fields_missing() {
        let request: BatchGetRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.lookup_strategy, LookupStrategy::FetchLiveDoc);
        assert!(request.urls.is_empty());

        let request: BatchGetRequest =
            serde_json::from_value(json!({"lookupStrategy": "SOMETHING", "urls": ["x"]})).unwrap();
        assert_eq!(request.lookup_strategy, LookupStrategy::Other("SOMETHING".to_string()));
    }
}
