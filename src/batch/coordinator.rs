/// Batch coordinator - issues batchGet calls within the service's rate limit
use crate::{
    batch::{BatchGetOutput, BatchGetRequest, BatchPlan, RateLimitState},
    config::RateLimitPolicy,
    error::AmpResult,
    logging::AmpLogger,
    response::parse_response,
    transport::{HttpResponse, HttpTransport},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{sleep, Instant};

/// Runs batch lookups against one batchGet endpoint
pub struct BatchCoordinator {
    transport: Arc<dyn HttpTransport>,
    logger: Arc<dyn AmpLogger>,
    policy: RateLimitPolicy,
    state: Arc<RwLock<RateLimitState>>,
}

impl BatchCoordinator {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        logger: Arc<dyn AmpLogger>,
        policy: RateLimitPolicy,
    ) -> Self {
        Self {
            transport,
            logger,
            policy,
            state: Arc::new(RwLock::new(RateLimitState::new())),
        }
    }

    /// Look up `request.urls`, chunking when they exceed one call's limit
    ///
    /// Small requests issue one call and return the decoded body. Larger ones issue one call
    /// per group, strictly in order, waiting the cooldown after each, and return the raw
    /// responses. The first failing group aborts the rest.
    pub async fn batch_get(
        &self,
        endpoint_url: &str,
        request: BatchGetRequest,
    ) -> AmpResult<BatchGetOutput> {
        if !request.lookup_strategy.is_supported() {
            self.logger.warn(&format!(
                "Possible unsupported lookup strategy passed: {}",
                request.lookup_strategy
            ));
        }

        if request.urls.is_empty() {
            self.logger.warn("No urls passed to batch add.");
        }

        if request.urls.len() > self.policy.max_urls_per_request {
            self.chunked(endpoint_url, request).await
        } else {
            self.single(endpoint_url, request).await
        }
    }

    /// Whether single calls are currently held back by a recent chunked batch
    pub async fn is_rate_limited(&self) -> bool {
        self.state
            .read()
            .await
            .is_active(Instant::now(), self.policy.window)
    }

    /// Forget any recent chunked batch
    pub async fn reset(&self) {
        self.state.write().await.reset();
    }

    async fn single(
        &self,
        endpoint_url: &str,
        request: BatchGetRequest,
    ) -> AmpResult<BatchGetOutput> {
        let body = serde_json::to_value(&request)?;
        let response = self.transport.post_json(endpoint_url, &body).await?;

        let held = self
            .state
            .write()
            .await
            .clear_expired(Instant::now(), self.policy.window);
        if held {
            self.logger.info(&format!(
                "Recent batched lookups; holding result for {}s to avoid rate limits.",
                self.policy.cooldown.as_secs()
            ));
            sleep(self.policy.cooldown).await;
        }

        Ok(BatchGetOutput::Single(parse_response(
            response,
            self.logger.as_ref(),
        )))
    }

    async fn chunked(
        &self,
        endpoint_url: &str,
        request: BatchGetRequest,
    ) -> AmpResult<BatchGetOutput> {
        let plan = BatchPlan::new(
            &request.urls,
            self.policy.max_urls_per_request,
            self.policy.max_requests_per_window,
        );

        self.logger.info(&format!(
            "More than {} urls passed to batch add.",
            self.policy.max_urls_per_request
        ));
        self.logger.info(&format!(
            "Chunking urls to {} each, making {} requests per {} seconds.",
            self.policy.max_urls_per_request,
            self.policy.max_requests_per_window,
            self.policy.window.as_secs()
        ));
        self.logger.info(&format!(
            "{} sets of {} urls across {} rate windows. Each will be executed with a {} second delay to avoid rate limits.",
            plan.group_count(),
            self.policy.max_urls_per_request,
            plan.window_count(),
            self.policy.cooldown.as_secs()
        ));

        self.state.write().await.trip(Instant::now());

        let mut responses: Vec<HttpResponse> = Vec::with_capacity(plan.group_count());
        for window in &plan.windows {
            self.logger.info(&format!(
                "Starting rate window {} of {} ({} requests)",
                window.index + 1,
                plan.window_count(),
                window.groups.len()
            ));

            for group in &window.groups {
                let body = serde_json::to_value(BatchGetRequest {
                    lookup_strategy: request.lookup_strategy.clone(),
                    urls: group.urls.clone(),
                })?;

                let response = self.transport.post_json(endpoint_url, &body).await?;
                responses.push(response);

                sleep(self.policy.cooldown).await;
                self.state.write().await.trip(Instant::now());
            }
        }

        Ok(BatchGetOutput::Grouped(responses))
    }
}
