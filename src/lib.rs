//! amp-url-api - client for the Google AMP URL API
//!
//! Discovers the API schema, validates AMP pages, sends signed update-cache
//! requests to every AMP cache, and runs batch URL lookups within the API's
//! rate limit.

pub mod batch;
pub mod cache;
pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod response;
pub mod transport;
pub mod validation;

pub use batch::{BatchGetOutput, BatchGetRequest, LookupStrategy};
pub use cache::{CacheProvider, SignedCacheUrl};
pub use client::{AmpApi, AmpApiBuilder};
pub use config::{AmpConfig, ApiEndpoints, RateLimitPolicy};
pub use crypto::CacheSigner;
pub use error::{AmpError, AmpResult, Capability};
pub use logging::{AmpLogger, MemoryLogger, NoopLogger, TracingLogger};
pub use response::ParsedBody;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use validation::{AmpValidator, BasicAmpValidator, ValidationError, ValidationStatus};
