//! Main Neynar API client implementation.

use crate::api::{FollowsApi, UsersApi};
use crate::config::RateLimitConfig;
use governor::DefaultDirectRateLimiter;
use kinship_core::{KinshipError, Result};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// The Neynar API base URL
const DEFAULT_BASE_URL: &str = "https://api.neynar.com";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Main Neynar API client
#[derive(Clone)]
pub struct NeynarClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    api_key: String,
    base_url: String,
    timeout: Duration,
    rate_limiter: DefaultDirectRateLimiter,
}

impl NeynarClient {
    /// Create a new client with the given API key using default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        NeynarClientBuilder::new(api_key).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> NeynarClientBuilder {
        NeynarClientBuilder::new(api_key)
    }

    /// Access follower/following endpoints
    #[must_use]
    pub fn follows(&self) -> FollowsApi<'_> {
        FollowsApi::new(self)
    }

    /// Access user lookup endpoints
    #[must_use]
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    /// Perform a rate-limited GET request with query parameters
    #[instrument(skip(self, params), fields(provider = "neynar"))]
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        self.inner.rate_limiter.until_ready().await;

        let url = self.build_url(path, params)?;
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(url)
            .header("x-api-key", &self.inner.api_key)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        self.handle_response(response).await
    }

    /// Build a URL with encoded query parameters
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.inner.base_url, path))
            .map_err(|e| KinshipError::Config(format!("invalid URL for {path}: {e}")))?;

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }

    /// Classify a reqwest failure
    fn transport_error(&self, err: &reqwest::Error) -> KinshipError {
        if err.is_timeout() {
            KinshipError::Timeout(self.inner.timeout.as_secs())
        } else if err.is_connect() {
            KinshipError::Connection(err.to_string())
        } else {
            KinshipError::Http(err.to_string())
        }
    }

    /// Handle an API response that returns JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| self.transport_error(&e))?;
            serde_json::from_str(&body).map_err(KinshipError::Json)
        } else {
            Self::handle_error(status.as_u16(), response).await
        }
    }

    /// Convert an error response to a `KinshipError`
    async fn handle_error<T>(status: u16, response: reqwest::Response) -> Result<T> {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();

        // Neynar reports errors as {"code": "...", "message": "..."}
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or(body);

        match status {
            401 | 403 => Err(KinshipError::Unauthorized),
            404 => Err(KinshipError::NotFound { resource: message }),
            429 => {
                warn!(?retry_after, "Rate limited by Neynar API");
                Err(KinshipError::RateLimited { retry_after })
            }
            _ => Err(KinshipError::Api {
                code: status,
                message,
            }),
        }
    }
}

impl std::fmt::Debug for NeynarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeynarClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring a [`NeynarClient`]
pub struct NeynarClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    rate_limit: RateLimitConfig,
}

impl NeynarClientBuilder {
    /// Create a new builder with the given API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("kinship/{}", env!("CARGO_PKG_VERSION")),
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set rate limiting
    #[must_use]
    pub const fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<NeynarClient> {
        if self.api_key.trim().is_empty() {
            return Err(KinshipError::Config("Neynar API key is empty".into()));
        }

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| KinshipError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(NeynarClient {
            inner: Arc::new(ClientInner {
                http,
                api_key: self.api_key,
                base_url: self.base_url,
                timeout: self.timeout,
                rate_limiter: self.rate_limit.limiter(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        let err = NeynarClient::new("  ").unwrap_err();
        assert!(matches!(err, KinshipError::Config(_)));
    }

    #[test]
    fn url_encodes_query_params() {
        let client = NeynarClient::builder("key")
            .base_url("http://localhost:9999/")
            .build()
            .unwrap();
        let url = client
            .build_url("/v2/farcaster/user/bulk-by-address", &[("addresses", "0xa,0xb")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9999/v2/farcaster/user/bulk-by-address?addresses=0xa%2C0xb"
        );
    }
}
