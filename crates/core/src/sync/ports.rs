//! Port interfaces for sync operations

use async_trait::async_trait;
use tallybridge_domain::{Invoice, Result, SyncStatus};

/// Order-management backend offering pending invoices.
#[async_trait]
pub trait InvoiceBackend: Send + Sync {
    /// Fetch the invoices currently awaiting synchronization.
    ///
    /// Non-OK statuses and undecodable bodies are `Protocol` errors and abort
    /// the cycle.
    async fn fetch_pending(&self) -> Result<Vec<Invoice>>;

    /// Report the terminal status of one invoice.
    async fn report_status(&self, status: &SyncStatus) -> Result<()>;
}
