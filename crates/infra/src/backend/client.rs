//! HTTP adapter for the backend webhook
//!
//! Both the pending-invoice fetch and status reporting are JSON events posted
//! to `{server_url}/webhook`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use tallybridge_core::InvoiceBackend;
use tallybridge_domain::{
    AgentConfig, BridgeError, Invoice, InvoiceBatch, Result, SyncRequestEvent, SyncStatus,
    SyncStatusEvent,
};
use tracing::{debug, info, instrument, warn};

use crate::errors::InfraError;
use crate::http::HttpClient;

pub struct WebhookBackend {
    http: HttpClient,
    webhook_url: String,
    api_key: String,
    fetch_timeout: Duration,
    status_timeout: Duration,
}

impl WebhookBackend {
    pub fn new(
        http: HttpClient,
        webhook_url: impl Into<String>,
        api_key: impl Into<String>,
        fetch_timeout: Duration,
        status_timeout: Duration,
    ) -> Self {
        Self {
            http,
            webhook_url: webhook_url.into(),
            api_key: api_key.into(),
            fetch_timeout,
            status_timeout,
        }
    }

    /// Build a backend client from a configuration snapshot.
    pub fn from_config(http: HttpClient, config: &AgentConfig) -> Self {
        Self::new(
            http,
            config.webhook_url(),
            config.api_key.clone(),
            config.timeouts.fetch(),
            config.timeouts.status(),
        )
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}

#[async_trait]
impl InvoiceBackend for WebhookBackend {
    #[instrument(skip(self), fields(url = %self.webhook_url))]
    async fn fetch_pending(&self) -> Result<Vec<Invoice>> {
        let request = self
            .http
            .request(Method::POST, &self.webhook_url)
            .timeout(self.fetch_timeout)
            .json(&SyncRequestEvent::new(&self.api_key));

        let response = self.http.send(request).await?;
        let status = response.status();
        let body = response.text().await.map_err(|err| BridgeError::from(InfraError::from(err)))?;

        if status != StatusCode::OK {
            warn!(%status, body = %body, "backend rejected sync request");
            return Err(BridgeError::Protocol(format!(
                "backend returned HTTP {}: {body}",
                status.as_u16()
            )));
        }

        let batch: InvoiceBatch =
            serde_json::from_str(&body).map_err(|err| BridgeError::from(InfraError::from(err)))?;

        if batch.success == Some(false) {
            warn!(
                message = batch.message.as_deref().unwrap_or_default(),
                "backend reported unsuccessful sync request"
            );
        }

        let invoices = batch.into_invoices();
        info!(count = invoices.len(), "fetched pending invoices");
        Ok(invoices)
    }

    #[instrument(skip(self, status), fields(invoice_id = ?status.invoice_id, status = status.state.as_str()))]
    async fn report_status(&self, status: &SyncStatus) -> Result<()> {
        let request = self
            .http
            .request(Method::POST, &self.webhook_url)
            .timeout(self.status_timeout)
            .json(&SyncStatusEvent::new(&self.api_key, status));

        let response = self.http.send(request).await?;
        let code = response.status();
        if code != StatusCode::OK {
            return Err(BridgeError::Protocol(format!(
                "backend returned HTTP {} for status report",
                code.as_u16()
            )));
        }

        debug!(%code, "status reported");
        Ok(())
    }
}
