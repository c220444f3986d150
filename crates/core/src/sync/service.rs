//! Sync orchestration - one cycle of fetch, submit, report

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tallybridge_domain::{BridgeError, Invoice, InvoiceId, Result, SyncStatus};
use tracing::{debug, error, info, instrument, warn};

use super::ports::InvoiceBackend;
use crate::document::render_voucher;
use crate::invoice::normalize_invoice;
use crate::masters::MasterDataService;
use crate::tally::{extract_line_error, RequestClass, TallyGateway};

/// Counters for one completed cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub fetched: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Status reports the backend did not accept.
    pub reports_failed: usize,
}

/// Invoice synchronization service
///
/// Invoices are processed strictly sequentially in backend order. Every
/// invoice receives exactly one status report per cycle, including invoices
/// whose processing panicked.
pub struct InvoiceSyncService {
    backend: Arc<dyn InvoiceBackend>,
    gateway: Arc<dyn TallyGateway>,
    masters: MasterDataService,
}

impl InvoiceSyncService {
    pub fn new(backend: Arc<dyn InvoiceBackend>, gateway: Arc<dyn TallyGateway>) -> Self {
        let masters = MasterDataService::new(Arc::clone(&gateway));
        Self { backend, gateway, masters }
    }

    /// Run one complete cycle.
    ///
    /// # Errors
    /// Only a failed fetch aborts the cycle. Per-invoice failures are reported
    /// to the backend and counted in the summary.
    pub async fn run_cycle(&self) -> Result<CycleSummary> {
        let started = Instant::now();
        let invoices = self.backend.fetch_pending().await?;

        let mut summary = CycleSummary { fetched: invoices.len(), ..CycleSummary::default() };
        if invoices.is_empty() {
            info!("no pending invoices");
            return Ok(summary);
        }
        info!(count = invoices.len(), "processing pending invoices");

        for invoice in &invoices {
            let status = self.process_invoice(invoice).await;
            if status.is_success() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }

            if let Err(err) = self.backend.report_status(&status).await {
                summary.reports_failed += 1;
                warn!(
                    invoice_id = ?status.invoice_id,
                    error = %err,
                    "failed to report sync status"
                );
            }
        }

        info!(
            fetched = summary.fetched,
            succeeded = summary.succeeded,
            failed = summary.failed,
            reports_failed = summary.reports_failed,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "sync cycle complete"
        );
        Ok(summary)
    }

    /// Process one invoice into its terminal status.
    ///
    /// Panics raised while processing are contained here and reported as
    /// error statuses.
    pub async fn process_invoice(&self, invoice: &Invoice) -> SyncStatus {
        let invoice_id = reportable_id(invoice);

        match AssertUnwindSafe(self.sync_invoice(invoice)).catch_unwind().await {
            Ok(Ok(())) => {
                info!(invoice_id = ?invoice_id, "invoice synced");
                SyncStatus::success(invoice_id)
            }
            Ok(Err(err)) => {
                warn!(invoice_id = ?invoice_id, kind = err.label(), error = %err, "invoice failed");
                SyncStatus::error(invoice_id, err.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(invoice_id = ?invoice_id, panic = %message, "invoice processing panicked");
                SyncStatus::error(invoice_id, format!("Panic: {message}"))
            }
        }
    }

    /// Normalize, ensure master data, then submit the voucher.
    #[instrument(skip_all, fields(invoice_id = ?invoice.id))]
    async fn sync_invoice(&self, invoice: &Invoice) -> Result<()> {
        let normalized = normalize_invoice(invoice)?;
        self.masters.ensure_master_data(&normalized).await?;

        let document = render_voucher(&normalized)?;
        let entity = format!("VOUCHER '{}'", normalized.id);
        debug!(entity = %entity, document = %document, "submitting voucher");
        let body = self.gateway.post_document(&document, RequestClass::Voucher, &entity).await?;

        match extract_line_error(&body) {
            Some(line_error) => Err(BridgeError::Daemon(line_error)),
            None => Ok(()),
        }
    }
}

/// Identifier echoed in the status report; blank identifiers are reported as null.
fn reportable_id(invoice: &Invoice) -> Option<InvoiceId> {
    invoice.id.clone().filter(|id| !id.is_blank())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
