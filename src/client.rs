/// AmpApi - the public client surface
///
/// Composes the transport, response parsing, cache-update signing and the batch
/// coordinator. Which operations are available is decided once, at construction.
use crate::{
    batch::{BatchCoordinator, BatchGetOutput, BatchGetRequest},
    cache::{
        CacheProvider, CacheRegistry, CacheUpdatePath, CacheUpdateTarget, SignedCacheUrl,
        DEFAULT_ACTION, DEFAULT_CONTENT_TYPE,
    },
    config::AmpConfig,
    crypto::CacheSigner,
    error::{AmpError, AmpResult, Capability},
    logging::{AmpLogger, TracingLogger},
    response::{parse_response, ParsedBody},
    transport::{HttpResponse, HttpTransport, ReqwestTransport},
    validation::{AmpValidator, BasicAmpValidator, ValidationStatus},
};
use futures::future::try_join_all;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Builder for `AmpApi`
#[derive(Default)]
pub struct AmpApiBuilder {
    config: AmpConfig,
    logger: Option<Arc<dyn AmpLogger>>,
    transport: Option<Arc<dyn HttpTransport>>,
    validator: Option<Arc<dyn AmpValidator>>,
    signer: Option<CacheSigner>,
}

impl AmpApiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: AmpConfig) -> Self {
        self.config = config;
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    pub fn key_path(mut self, key_path: impl Into<std::path::PathBuf>) -> Self {
        self.config.key_path = Some(key_path.into());
        self
    }

    pub fn logger(mut self, logger: Arc<dyn AmpLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn validator(mut self, validator: Arc<dyn AmpValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Use an already loaded signing key instead of `key_path`
    pub fn signer(mut self, signer: CacheSigner) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Build the client
    ///
    /// An API key or key path left unset falls back to `AMP_API_KEY` / `AMP_RSA_PRIVATE_KEY`.
    /// Missing credentials do not fail the build; they disable the capabilities that need
    /// them and are reported through the logger. Only invalid configuration or a transport
    /// that cannot be created is an error.
    pub fn build(mut self) -> AmpResult<AmpApi> {
        self.config = self.config.fill_from_env();
        self.config.validate()?;

        let logger = match self.logger {
            Some(logger) => logger,
            None => {
                let logger: Arc<dyn AmpLogger> = Arc::new(TracingLogger);
                logger.warn("No logger passed or invalid logger. Using default logger.");
                logger
            }
        };

        let mut disabled = BTreeSet::new();

        let api_key = self.config.api_key.clone().filter(|k| !k.is_empty());
        if api_key.is_none() {
            logger.warn("Amp Api declared without google api key, cache update and get unsupported.");
            disabled.insert(Capability::Lookup);
        }

        let signer = match (self.signer, &self.config.key_path) {
            (Some(signer), _) => Some(signer),
            (None, Some(path)) => match CacheSigner::from_file(path) {
                Ok(signer) => Some(signer),
                Err(e) => {
                    logger.fatal(&format!(
                        "Cannot read private key {}. Cache updating not supported.",
                        path.display()
                    ));
                    logger.error(&e.to_string());
                    None
                }
            },
            (None, None) => {
                logger.warn("No amp rsa keypath declared, cache update unsupported.");
                None
            }
        };
        if signer.is_none() {
            disabled.insert(Capability::CacheUpdate);
        }

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(
                &self.config.user_agent,
                self.config.request_timeout,
            )?),
        };

        let validator: Arc<dyn AmpValidator> = match self.validator {
            Some(validator) => validator,
            None => Arc::new(BasicAmpValidator::new()),
        };

        let batcher = BatchCoordinator::new(
            Arc::clone(&transport),
            Arc::clone(&logger),
            self.config.rate_limit.clone(),
        );

        Ok(AmpApi {
            api_key,
            config: self.config,
            transport,
            validator,
            logger,
            signer,
            disabled,
            batcher,
        })
    }
}

/// Client for the AMP URL API and the AMP caches
pub struct AmpApi {
    api_key: Option<String>,
    config: AmpConfig,
    transport: Arc<dyn HttpTransport>,
    validator: Arc<dyn AmpValidator>,
    logger: Arc<dyn AmpLogger>,
    signer: Option<CacheSigner>,
    disabled: BTreeSet<Capability>,
    batcher: BatchCoordinator,
}

impl AmpApi {
    pub fn builder() -> AmpApiBuilder {
        AmpApiBuilder::new()
    }

    /// Build a client from `AMP_*` environment variables and the default collaborators
    pub fn from_env() -> AmpResult<Self> {
        Self::builder().config(AmpConfig::from_env()?).build()
    }

    pub fn config(&self) -> &AmpConfig {
        &self.config
    }

    /// Capabilities available on this client
    pub fn capabilities(&self) -> BTreeSet<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.is_enabled(*c))
            .collect()
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        !self.disabled.contains(&capability)
    }

    /// Capabilities switched off at construction
    pub fn disabled_capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.disabled.iter().copied()
    }

    fn require_api_key(&self) -> AmpResult<&str> {
        match (&self.api_key, self.is_enabled(Capability::Lookup)) {
            (Some(key), true) => Ok(key.as_str()),
            _ => Err(AmpError::CapabilityDisabled(Capability::Lookup)),
        }
    }

    fn require_signer(&self) -> AmpResult<&CacheSigner> {
        self.signer.as_ref().ok_or(AmpError::SigningUnavailable)
    }

    fn parse(&self, response: HttpResponse) -> ParsedBody {
        parse_response(response, self.logger.as_ref())
    }

    /// Fetch the API discovery document
    pub async fn discover(&self) -> AmpResult<ParsedBody> {
        let api_key = self.require_api_key()?;
        let response = self
            .transport
            .get(&self.config.endpoints.discovery_url(api_key))
            .await?;
        Ok(self.parse(response))
    }

    /// Fetch the AMP cache provider registry
    pub async fn get_amp_caches(&self) -> AmpResult<ParsedBody> {
        let response = self.transport.get(&self.config.endpoints.caches_url).await?;
        Ok(self.parse(response))
    }

    /// Fetch the registry and decode its providers
    pub async fn cache_providers(&self) -> AmpResult<Vec<CacheProvider>> {
        match self.get_amp_caches().await? {
            ParsedBody::Json(value) => {
                let registry: CacheRegistry = serde_json::from_value(value)?;
                Ok(registry.caches)
            }
            ParsedBody::Raw(response) => Err(AmpError::UnexpectedResponse(format!(
                "cache registry returned non-JSON body (status {})",
                response.status
            ))),
        }
    }

    /// Fetch a page and run it through the AMP validator
    pub async fn validate_amp_url(&self, url: &str) -> AmpResult<ValidationStatus> {
        let response = self.transport.get(url).await?;
        let report = self.validator.validate_str(&response.body);

        if report.passed() {
            Ok(ValidationStatus::Pass)
        } else {
            Err(AmpError::ValidationFailed {
                url: url.to_string(),
                errors: report.errors,
            })
        }
    }

    /// Signed update-cache URLs for every registered cache, without requesting them
    pub async fn signed_cache_urls(
        &self,
        url: &str,
        content_type: &str,
        action: &str,
    ) -> AmpResult<Vec<SignedCacheUrl>> {
        let signer = self.require_signer()?;
        let target = CacheUpdateTarget::parse(url)?;
        let providers = self.cache_providers().await?;

        let path = CacheUpdatePath::new(&target, content_type, action, chrono::Utc::now().timestamp());
        SignedCacheUrl::for_providers(signer, &target, &path, &providers)
    }

    /// Ask every registered AMP cache to apply `action` to `url`
    ///
    /// Requests go out concurrently; the first failure fails the whole call. Responses are
    /// returned in registry order.
    pub async fn update_cache(
        &self,
        url: &str,
        content_type: &str,
        action: &str,
    ) -> AmpResult<Vec<HttpResponse>> {
        let signed = self.signed_cache_urls(url, content_type, action).await?;
        let cache_urls: Vec<String> = signed.iter().map(SignedCacheUrl::url).collect();

        try_join_all(cache_urls.iter().map(|cache_url| self.transport.get(cache_url))).await
    }

    /// `update_cache` with content type `c` and action `flush`
    pub async fn update_cache_default(&self, url: &str) -> AmpResult<Vec<HttpResponse>> {
        self.update_cache(url, DEFAULT_CONTENT_TYPE, DEFAULT_ACTION).await
    }

    /// Look up AMP URLs, chunking to stay within the API's rate limit
    pub async fn batch_get(&self, request: BatchGetRequest) -> AmpResult<BatchGetOutput> {
        let api_key = self.require_api_key()?;
        let endpoint = self.config.endpoints.batch_get_url(api_key);
        self.batcher.batch_get(&endpoint, request).await
    }

    /// Whether a recent chunked batch is still holding back lookups
    pub async fn rate_limit_active(&self) -> bool {
        self.batcher.is_rate_limited().await
    }

    /// Clear the rate-limit session
    pub async fn reset_rate_limit(&self) {
        self.batcher.reset().await;
    }
}
