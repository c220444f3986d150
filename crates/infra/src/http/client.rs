use std::time::{Duration, Instant};

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tallybridge_domain::BridgeError;
use tracing::debug;

use crate::errors::InfraError;

/// HTTP client with a default timeout and error mapping.
///
/// Requests are sent exactly once; a failed call is retried by the next
/// sync cycle, not here.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, BridgeError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    ///
    /// Any response, including non-OK statuses, is returned to the caller.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, BridgeError> {
        let request = builder.build().map_err(|err| BridgeError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        let started = Instant::now();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(
                    %method,
                    %url,
                    %status,
                    elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "received HTTP response"
                );
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }
}

/// User agent sent with every request.
const USER_AGENT: &str = concat!("tallybridge-agent/", env!("CARGO_PKG_VERSION"));

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30) }
    }
}

impl HttpClientBuilder {
    /// Client-wide timeout; individual requests may set a shorter one.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HttpClient, BridgeError> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .map_err(|err| BridgeError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}
