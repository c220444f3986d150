//! Backend webhook payloads
//!
//! Both directions share one endpoint; the `event` field selects the
//! operation.

use serde::{Deserialize, Serialize};

use super::invoice::{Invoice, InvoiceId};
use super::status::{SyncState, SyncStatus};
use crate::constants::{EVENT_SYNC_REQUEST, EVENT_SYNC_STATUS};

/// `sync-request` event asking the backend for pending invoices.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequestEvent<'a> {
    pub api_key: &'a str,
    pub event: &'static str,
}

impl<'a> SyncRequestEvent<'a> {
    pub fn new(api_key: &'a str) -> Self {
        Self { api_key, event: EVENT_SYNC_REQUEST }
    }
}

/// Response to a `sync-request` event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceBatch {
    #[serde(default)]
    pub invoices: Option<Vec<Invoice>>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

impl InvoiceBatch {
    pub fn into_invoices(self) -> Vec<Invoice> {
        self.invoices.unwrap_or_default()
    }
}

/// `sync-status` event carrying one invoice outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusEvent<'a> {
    pub api_key: &'a str,
    pub event: &'static str,
    pub data: StatusPayload<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload<'a> {
    pub invoice_id: Option<&'a InvoiceId>,
    pub status: SyncState,
    pub error: &'a str,
}

impl<'a> SyncStatusEvent<'a> {
    pub fn new(api_key: &'a str, status: &'a SyncStatus) -> Self {
        Self {
            api_key,
            event: EVENT_SYNC_STATUS,
            data: StatusPayload {
                invoice_id: status.invoice_id.as_ref(),
                status: status.state,
                error: &status.message,
            },
        }
    }
}
