//! Microsoft Graph implementation of [`GovernanceSource`]
//!
//! Endpoints under `{base_url}/identityGovernance/accessReviews`:
//! - `definitions?$filter=status eq '{status}'`
//! - `definitions/{id}/instances`
//! - `definitions/{id}/instances/{id}/decisions`
//! - `definitions/{id}/instances/{id}/contactedReviewers`
//!
//! All collections are paged with `$top` and `$skip`.

use super::auth::TokenProvider;
use super::models::{error_message, CollectionPage};
use super::source::GovernanceSource;
use crate::config::{GraphConfig, RetryConfig};
use crate::domain::{ArxError, DefinitionId, GraphError, InstanceId, Record, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use url::Url;

/// Graph REST client for access review collections
///
/// # Example
///
/// ```no_run
/// use arx::adapters::graph::{GovernanceSource, GraphGovernanceClient};
/// use arx::config::{secret_string, GraphConfig};
///
/// # async fn example() -> arx::domain::Result<()> {
/// let config = GraphConfig {
///     access_token: Some(secret_string("eyJ0eXAi...".to_string())),
///     ..Default::default()
/// };
/// let client = GraphGovernanceClient::new(&config)?;
/// let page = client.list_definitions("InProgress", 0, 100).await?;
/// println!("{} definitions", page.len());
/// # Ok(())
/// # }
/// ```
pub struct GraphGovernanceClient {
    base_url: Url,
    client: Client,
    auth: TokenProvider,
    retry: RetryConfig,
}

impl GraphGovernanceClient {
    /// Create a client from Graph configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unusable base URL or missing
    /// credentials.
    pub fn new(config: &GraphConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            ArxError::Configuration(format!("Invalid graph.base_url '{}': {e}", config.base_url))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ArxError::Configuration(format!(
                "graph.base_url '{}' cannot be used as a base URL",
                config.base_url
            )));
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ArxError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        let auth = TokenProvider::from_config(config)?;

        Ok(Self {
            base_url,
            client,
            auth,
            retry: config.retry.clone(),
        })
    }

    /// Base URL requests are built from
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn collection_url(
        &self,
        segments: &[&str],
        filter: Option<&str>,
        skip: usize,
        top: usize,
    ) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ArxError::Configuration("graph.base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["identityGovernance", "accessReviews", "definitions"])
            .extend(segments);

        {
            let mut query = url.query_pairs_mut();
            if let Some(filter) = filter {
                query.append_pair("$filter", filter);
            }
            query.append_pair("$top", &top.to_string());
            query.append_pair("$skip", &skip.to_string());
        }

        Ok(url)
    }

    /// Fetch one page, retrying transient failures
    async fn get_page(&self, url: Url) -> Result<Vec<Record>> {
        tracing::debug!(url = %url, "Requesting Graph page");

        let page = self
            .retry_request(|| async {
                let token = self.auth.bearer().await?;

                let resp = self
                    .client
                    .get(url.clone())
                    .bearer_auth(token)
                    .header("Accept", "application/json")
                    .send()
                    .await
                    .map_err(|e| {
                        if e.is_timeout() {
                            ArxError::Graph(GraphError::Timeout(e.to_string()))
                        } else {
                            ArxError::Graph(GraphError::ConnectionFailed(e.to_string()))
                        }
                    })?;

                let status = resp.status();
                if !status.is_success() {
                    let hint = retry_after(resp.headers());
                    let body = resp.text().await.unwrap_or_default();
                    let error = GraphError::from_status(
                        status.as_u16(),
                        format!("GET {} returned {status}: {}", url.path(), error_message(&body)),
                    )
                    .with_retry_after(hint);
                    return Err(ArxError::Graph(error));
                }

                resp.json::<CollectionPage>().await.map_err(|e| {
                    ArxError::Graph(GraphError::InvalidResponse(format!(
                        "Malformed page from {}: {e}",
                        url.path()
                    )))
                })
            })
            .await?;

        Ok(page.value)
    }

    /// Retry a request with exponential backoff
    ///
    /// Only retryable errors (connection failures, timeouts, 429, 5xx) are
    /// retried; everything else is returned immediately. A `Retry-After`
    /// sent with a 429 is waited out when it is longer than the backoff.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.retry.max_retries;
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !e.is_retryable() || retries >= max_retries {
                        return Err(e);
                    }
                    retries += 1;

                    let delay = retry_delay(&self.retry, retries, e.retry_after());

                    tracing::warn!(
                        attempt = retries,
                        max_retries = max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying Graph request after error"
                    );

                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Delay before retry number `retry`, never shorter than the server's hint
fn retry_delay(config: &RetryConfig, retry: usize, retry_after: Option<Duration>) -> Duration {
    let backoff = Duration::from_millis(config.delay_ms(retry));
    retry_after.map_or(backoff, |hint| hint.max(backoff))
}

/// `Retry-After` in delta-seconds form; HTTP dates are ignored
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[async_trait]
impl GovernanceSource for GraphGovernanceClient {
    async fn list_definitions(&self, status: &str, skip: usize, top: usize) -> Result<Vec<Record>> {
        let filter = format!("status eq '{}'", status.replace('\'', "''"));
        let url = self.collection_url(&[], Some(&filter), skip, top)?;
        self.get_page(url).await
    }

    async fn list_instances(
        &self,
        definition_id: &DefinitionId,
        skip: usize,
        top: usize,
    ) -> Result<Vec<Record>> {
        let url = self.collection_url(&[definition_id.as_str(), "instances"], None, skip, top)?;
        self.get_page(url).await
    }

    async fn list_decisions(
        &self,
        definition_id: &DefinitionId,
        instance_id: &InstanceId,
        skip: usize,
        top: usize,
    ) -> Result<Vec<Record>> {
        let url = self.collection_url(
            &[
                definition_id.as_str(),
                "instances",
                instance_id.as_str(),
                "decisions",
            ],
            None,
            skip,
            top,
        )?;
        self.get_page(url).await
    }

    async fn list_contacted_reviewers(
        &self,
        definition_id: &DefinitionId,
        instance_id: &InstanceId,
        skip: usize,
        top: usize,
    ) -> Result<Vec<Record>> {
        let url = self.collection_url(
            &[
                definition_id.as_str(),
                "instances",
                instance_id.as_str(),
                "contactedReviewers",
            ],
            None,
            skip,
            top,
        )?;
        self.get_page(url).await
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}
