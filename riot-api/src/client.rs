//! Raw HTTP client: authentication, budget gating, response classification
//! and bounded retry with backoff.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use matchvault_shared::Region;
use matchvault_shared::errors::{ApiError, ApiResult};

use crate::metrics::RequestMetrics;
use crate::rate_limit::{DEFAULT_PER_SECOND, RateGovernor};

/// Backoff floor when the server gives no Retry-After hint.
const RETRY_FLOOR: Duration = Duration::from_secs(1);
const BACKOFF_CAP: Duration = Duration::from_secs(60);
/// Retries allowed after a 429 before surfacing a terminal failure.
const MAX_RATE_LIMIT_RETRIES: u32 = 4;
/// Retries allowed after a 5xx or network failure.
const MAX_TRANSIENT_RETRIES: u32 = 2;

/// What one HTTP exchange amounted to, before any retry decision.
#[derive(Debug)]
enum Outcome {
    Success(Bytes),
    RateLimited(Option<Duration>),
    Transient(u16),
    NotFound,
    Unexpected(u16),
}

/// Client for the Riot REST API. Every request passes through the shared
/// [`RateGovernor`] before going out.
#[derive(Debug)]
pub struct LolApiClient {
    http: reqwest::Client,
    governor: Arc<RateGovernor>,
    /// Riot API Key
    key: String,
    pub metrics: Arc<RequestMetrics>,
    base_url: Option<String>,
}

impl LolApiClient {
    /// Create a client with the default development-key budgets.
    pub fn new(key: String) -> Self {
        Self::with_governor(key, Arc::new(RateGovernor::riot_default(DEFAULT_PER_SECOND)))
    }

    /// Create a client around an externally owned governor, e.g. one whose
    /// per-second cap came from configuration.
    pub fn with_governor(key: String, governor: Arc<RateGovernor>) -> Self {
        Self {
            http: reqwest::Client::new(),
            governor,
            key,
            metrics: RequestMetrics::new(),
            base_url: None,
        }
    }

    /// Route every request to a fixed base URL instead of the per-region
    /// Riot hosts. Meant for tests against a local mock server.
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = Some(base.into());
        self
    }

    /// Spawn a task logging periodic metrics about requests.
    pub fn start_metrics_logging(&self) {
        let metrics = self.metrics.clone();
        tokio::spawn(async move { metrics.log_loop().await });
    }

    pub(crate) fn regional_base(&self, region: Region) -> String {
        match &self.base_url {
            Some(base) => base.clone(),
            None => format!("https://{}", region.regional_host()),
        }
    }

    pub(crate) fn platform_base(&self, region: Region) -> String {
        match &self.base_url {
            Some(base) => base.clone(),
            None => format!("https://{}", region.platform_host()),
        }
    }

    /// Perform one logical GET, retrying rate-limit and transient failures
    /// with exponential backoff until a bounded attempt budget runs out.
    pub async fn request(&self, path: String) -> ApiResult<Bytes> {
        let mut rate_limit_retries = 0u32;
        let mut transient_retries = 0u32;

        loop {
            if self.governor.acquire().await {
                self.metrics.inc_throttled();
            }
            self.metrics.inc();

            match self.send(&path).await {
                Ok(Outcome::Success(body)) => return Ok(body),
                Ok(Outcome::NotFound) => return Err(ApiError::NotFound),
                Ok(Outcome::Unexpected(status)) => {
                    return Err(ApiError::UnexpectedStatus(status));
                }
                Ok(Outcome::RateLimited(retry_after)) => {
                    rate_limit_retries += 1;
                    if rate_limit_retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited {
                            attempts: rate_limit_retries,
                        });
                    }
                    // The server's own model of our budget wins over the
                    // governor's; seed the backoff with its hint.
                    let delay =
                        backoff_delay(retry_after.unwrap_or(RETRY_FLOOR), rate_limit_retries);
                    tracing::warn!(
                        %path,
                        retry = rate_limit_retries,
                        ?delay,
                        "rate limited upstream, backing off"
                    );
                    sleep(delay).await;
                }
                Ok(Outcome::Transient(status)) => {
                    transient_retries += 1;
                    if transient_retries > MAX_TRANSIENT_RETRIES {
                        return Err(ApiError::Transient {
                            status: Some(status),
                            message: format!("upstream kept failing with status {status}"),
                        });
                    }
                    let delay = backoff_delay(RETRY_FLOOR, transient_retries);
                    tracing::warn!(%path, status, retry = transient_retries, ?delay, "server error, retrying");
                    sleep(delay).await;
                }
                Err(err) => {
                    transient_retries += 1;
                    if transient_retries > MAX_TRANSIENT_RETRIES {
                        return Err(ApiError::Transient {
                            status: None,
                            message: err.to_string(),
                        });
                    }
                    let delay = backoff_delay(RETRY_FLOOR, transient_retries);
                    tracing::warn!(%path, error = %err, retry = transient_retries, ?delay, "network error, retrying");
                    sleep(delay).await;
                }
            }
        }
    }

    async fn send(&self, path: &str) -> Result<Outcome, reqwest::Error> {
        let res = self
            .http
            .get(path)
            .header("X-Riot-Token", &self.key)
            .send()
            .await?;

        let status = res.status();
        Ok(match status {
            StatusCode::OK => Outcome::Success(res.bytes().await?),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = res
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Outcome::RateLimited(retry_after)
            }
            StatusCode::NOT_FOUND => Outcome::NotFound,
            s if s.is_server_error() => Outcome::Transient(s.as_u16()),
            s => Outcome::Unexpected(s.as_u16()),
        })
    }
}

/// Decode a response body, surfacing malformed payloads distinctly from
/// network failures.
pub(crate) fn decode<T: DeserializeOwned>(body: &Bytes) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(ApiError::Decode)
}

fn backoff_delay(base: Duration, retry: u32) -> Duration {
    let factor = 1u32 << retry.saturating_sub(1).min(5);
    base.saturating_mul(factor).min(BACKOFF_CAP)
}
