//! Recording port doubles

use std::collections::VecDeque;

use async_trait::async_trait;
use tallybridge_core::{InvoiceBackend, RequestClass, TallyGateway};
use tallybridge_domain::{Invoice, Result as DomainResult, SyncStatus};
use tokio::sync::Mutex;

pub const CREATED: &str = "<RESPONSE><CREATED>1</CREATED></RESPONSE>";

/// One document posted to the daemon double.
#[derive(Debug, Clone)]
pub struct Posted {
    pub class: RequestClass,
    pub entity: String,
    pub document: String,
}

/// Backend serving a fixed batch and recording every status report.
#[derive(Default)]
pub struct RecordingBackend {
    invoices: Vec<serde_json::Value>,
    pub reports: Mutex<Vec<SyncStatus>>,
}

impl RecordingBackend {
    pub fn with_invoices(invoices: Vec<serde_json::Value>) -> Self {
        Self { invoices, reports: Mutex::new(Vec::new()) }
    }

    pub async fn reports(&self) -> Vec<SyncStatus> {
        self.reports.lock().await.clone()
    }
}

#[async_trait]
impl InvoiceBackend for RecordingBackend {
    async fn fetch_pending(&self) -> DomainResult<Vec<Invoice>> {
        Ok(self
            .invoices
            .iter()
            .map(|value| serde_json::from_value(value.clone()).expect("fixture invoice"))
            .collect())
    }

    async fn report_status(&self, status: &SyncStatus) -> DomainResult<()> {
        self.reports.lock().await.push(status.clone());
        Ok(())
    }
}

/// Daemon double answering from a queue of scripted bodies, then `CREATED`.
#[derive(Default)]
pub struct RecordingGateway {
    replies: Mutex<VecDeque<String>>,
    pub posts: Mutex<Vec<Posted>>,
}

impl RecordingGateway {
    pub fn scripted(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(ToString::to_string).collect()),
            posts: Mutex::new(Vec::new()),
        }
    }

    pub async fn posts(&self) -> Vec<Posted> {
        self.posts.lock().await.clone()
    }

    pub async fn entities(&self) -> Vec<String> {
        self.posts.lock().await.iter().map(|post| post.entity.clone()).collect()
    }
}

#[async_trait]
impl TallyGateway for RecordingGateway {
    async fn post_document(
        &self,
        document: &str,
        class: RequestClass,
        entity: &str,
    ) -> DomainResult<String> {
        self.posts.lock().await.push(Posted {
            class,
            entity: entity.to_string(),
            document: document.to_string(),
        });
        Ok(self.replies.lock().await.pop_front().unwrap_or_else(|| CREATED.to_string()))
    }
}
