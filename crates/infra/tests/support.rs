//! Shared fixtures for infra integration tests.
//!
//! Every test gets its own pair of mock servers: one standing in for the
//! backend webhook, one for the accounting daemon.

use std::sync::Once;

use serde_json::{json, Value};
use tallybridge_domain::AgentConfig;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const API_KEY: &str = "test-api-key-123";

/// Daemon reply for a successful import.
pub const CREATED: &str = "<RESPONSE><CREATED>1</CREATED><ERRORS>0</ERRORS></RESPONSE>";

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().with_env_filter("debug").try_init();
    });
}

/// Backend and daemon mocks plus a configuration pointing at both.
pub struct TestServers {
    pub backend: MockServer,
    pub daemon: MockServer,
}

impl TestServers {
    pub async fn start() -> Self {
        init_tracing();
        Self { backend: MockServer::start().await, daemon: MockServer::start().await }
    }

    pub fn config(&self) -> AgentConfig {
        AgentConfig::new(self.backend.uri(), API_KEY).with_tally_url(self.daemon.uri())
    }

    /// Answer `sync-request` events with the given invoices.
    pub async fn serve_invoices(&self, invoices: Value) {
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .and(body_partial_json(json!({"event": "sync-request", "apiKey": API_KEY})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "invoices": invoices,
            })))
            .mount(&self.backend)
            .await;
    }

    /// Accept every `sync-status` event.
    pub async fn accept_status_reports(&self) {
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .and(body_partial_json(json!({"event": "sync-status"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&self.backend)
            .await;
    }

    /// Reply to every daemon post with `body`.
    pub async fn daemon_replies(&self, body: &str) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.daemon)
            .await;
    }

    /// Status events received by the backend, in arrival order.
    pub async fn status_reports(&self) -> Vec<Value> {
        received_json(&self.backend)
            .await
            .into_iter()
            .filter(|body| body["event"] == "sync-status")
            .map(|body| body["data"].clone())
            .collect()
    }

    /// Documents received by the daemon, in arrival order.
    pub async fn daemon_documents(&self) -> Vec<String> {
        self.daemon
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }
}

pub async fn received_json(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|request: &Request| serde_json::from_slice(&request.body).ok())
        .collect()
}

/// A well-formed invoice with one stock item.
pub fn sample_invoice(id: &str) -> Value {
    json!({
        "_id": id,
        "customerName": "Acme Traders",
        "totalAmount": 250,
        "invoice_date": "2025-03-14T09:30:00Z",
        "items": [
            {"name": "Widget", "quantity": 5, "rate": 50, "amount": 250}
        ]
    })
}
