//! HTTP adapter for the accounting daemon's import endpoint

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use tallybridge_core::{RequestClass, TallyGateway};
use tallybridge_domain::{AgentConfig, BridgeError, Result};
use tracing::{debug, instrument, warn};

use crate::errors::InfraError;
use crate::http::HttpClient;

const XML_CONTENT_TYPE: &str = "application/xml";

/// Posts import documents to the daemon.
///
/// Master-data requests and voucher requests carry separate timeout budgets.
#[derive(Clone)]
pub struct TallyClient {
    http: HttpClient,
    url: String,
    master_timeout: Duration,
    voucher_timeout: Duration,
}

impl TallyClient {
    pub fn new(
        http: HttpClient,
        url: impl Into<String>,
        master_timeout: Duration,
        voucher_timeout: Duration,
    ) -> Self {
        Self { http, url: url.into(), master_timeout, voucher_timeout }
    }

    /// Build a client from a configuration snapshot.
    pub fn from_config(http: HttpClient, config: &AgentConfig) -> Self {
        Self::new(http, &config.tally_url, config.timeouts.master(), config.timeouts.voucher())
    }

    fn timeout_for(&self, class: RequestClass) -> Duration {
        match class {
            RequestClass::Master => self.master_timeout,
            RequestClass::Voucher => self.voucher_timeout,
        }
    }
}

#[async_trait]
impl TallyGateway for TallyClient {
    #[instrument(skip(self, document, class), fields(class = class.as_str()))]
    async fn post_document(
        &self,
        document: &str,
        class: RequestClass,
        entity: &str,
    ) -> Result<String> {
        let request = self
            .http
            .request(Method::POST, &self.url)
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .timeout(self.timeout_for(class))
            .body(document.to_string());

        let response = self.http.send(request).await?;
        let status = response.status();
        let body = response.text().await.map_err(|err| BridgeError::from(InfraError::from(err)))?;
        debug!(entity, %status, body = %body, "daemon response");

        if status != StatusCode::OK {
            warn!(entity, %status, body = %body, "daemon returned non-OK status");
            return Err(BridgeError::Protocol(format!(
                "daemon returned HTTP {} for {entity}: {body}",
                status.as_u16()
            )));
        }

        Ok(body)
    }
}
