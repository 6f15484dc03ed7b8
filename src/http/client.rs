//! reqwest-backed [`Transport`]
//!
//! Sends [`ResolvedRequest`]s against a base URL with default headers,
//! static credentials, client-side rate limiting and an opt-in retry policy.
//! Non-2xx responses become [`Error::HttpStatus`] (or [`Error::RateLimited`]
//! for 429) and 2xx bodies are decoded as JSON.

use super::rate_limit::{RateLimit, RateLimiter};
use crate::auth::{AuthConfig, Authenticator};
use crate::dispatch::{ResolvedRequest, Transport};
use crate::error::{Error, Result};
use crate::types::{value_to_string, BackoffType};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Seconds to wait after a 429 without a usable `Retry-After`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

// ============================================================================
// Configuration
// ============================================================================

/// How failed requests are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 sends each request exactly once)
    pub max_retries: u32,
    /// Delay growth between attempts
    pub backoff: BackoffType,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Upper bound on any delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff: BackoffType::Exponential,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt + 1`
    ///
    /// A server-provided `Retry-After` takes precedence over the backoff curve.
    pub fn delay(&self, attempt: u32, error: &Error) -> Duration {
        if let Error::RateLimited {
            retry_after_seconds,
        } = error
        {
            return Duration::from_secs(*retry_after_seconds);
        }

        let delay = match self.backoff {
            BackoffType::Constant => self.initial_backoff,
            BackoffType::Linear => self.initial_backoff * (attempt + 1),
            BackoffType::Exponential => self.initial_backoff * 2u32.saturating_pow(attempt),
        };
        delay.min(self.max_backoff)
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL every request path is appended to
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Retry policy
    pub retry: RetryPolicy,
    /// Client-side rate limit
    pub rate_limit: Option<RateLimit>,
    /// Headers sent with every request
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("optable/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Limit the request rate
    pub fn rate_limit(mut self, limit: Option<RateLimit>) -> Self {
        self.config.rate_limit = limit;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

// ============================================================================
// Client
// ============================================================================

/// Flatten a JSON query map into string pairs
///
/// Null values are dropped and arrays become repeated keys.
pub fn query_pairs(query: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(query.len());
    for (key, value) in query {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items.iter().filter(|v| !v.is_null()) {
                    pairs.push((key.clone(), value_to_string(item)));
                }
            }
            other => pairs.push((key.clone(), value_to_string(other))),
        }
    }
    pairs
}

/// HTTP transport for one API
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Option<Authenticator>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create an unauthenticated client
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        Self::with_auth(config, AuthConfig::None)
    }

    /// Create a client sending `auth` with every request
    pub fn with_auth(config: HttpClientConfig, auth: AuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let authenticator = match auth {
            AuthConfig::None => None,
            other => Some(Authenticator::new(other)),
        };

        Ok(Self {
            client,
            rate_limiter: config.rate_limit.map(RateLimiter::new),
            config,
            authenticator,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Send a request, retrying per the configured policy
    pub async fn execute(&self, request: &ResolvedRequest) -> Result<Value> {
        let policy = self.config.retry;
        let mut attempt = 0;

        loop {
            match self.attempt(request).await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < policy.max_retries && error.is_retryable() => {
                    let delay = policy.delay(attempt, &error);
                    attempt += 1;
                    warn!(
                        "{} failed ({error}), attempt {attempt}/{}, retrying in {delay:?}",
                        request.label(),
                        policy.max_retries + 1
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// One round trip, without retries
    async fn attempt(&self, request: &ResolvedRequest) -> Result<Value> {
        if let Some(limiter) = &self.rate_limiter {
            if limiter.acquire().await {
                debug!("Rate limiter delayed {}", request.label());
            }
        }

        let url = self.endpoint_url(&request.path);
        let mut builder = self.client.request(request.method.into(), &url);

        for (key, value) in &self.config.default_headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let query = query_pairs(&request.query);
        if !query.is_empty() {
            builder = builder.query(&query);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        if let Some(auth) = &self.authenticator {
            builder = auth.apply(builder);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        decode_response(response).await
    }

    /// Append a request path to the base URL
    fn endpoint_url(&self, path: &str) -> String {
        match &self.config.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_string(),
        }
    }
}

/// Classify the status and decode a JSON body (empty body is `null`)
async fn decode_response(response: Response) -> Result<Value> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::RateLimited {
            retry_after_seconds: retry_after(&response),
        });
    }

    let text = response.text().await?;
    if !status.is_success() {
        return Err(Error::http_status(status.as_u16(), text));
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| Error::decode(format!("invalid JSON response: {e}")))
}

fn retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: &ResolvedRequest) -> Result<Value> {
        self.execute(request).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("retry", &self.config.retry)
            .field("rate_limiter", &self.rate_limiter)
            .field(
                "auth",
                &self.authenticator.as_ref().map(|a| a.config().kind()),
            )
            .finish_non_exhaustive()
    }
}
