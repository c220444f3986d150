//! Per-invoice sync outcome

use serde::{Deserialize, Serialize};

use super::invoice::InvoiceId;

/// Terminal state of one invoice within one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    Success,
    Error,
}

impl SyncState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Status reported back to the backend exactly once per invoice per cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    pub invoice_id: Option<InvoiceId>,
    pub state: SyncState,
    /// Human-readable failure reason; empty on success.
    pub message: String,
}

impl SyncStatus {
    pub fn success(invoice_id: Option<InvoiceId>) -> Self {
        Self { invoice_id, state: SyncState::Success, message: String::new() }
    }

    pub fn error(invoice_id: Option<InvoiceId>, message: impl Into<String>) -> Self {
        Self { invoice_id, state: SyncState::Error, message: message.into() }
    }

    pub fn is_success(&self) -> bool {
        self.state == SyncState::Success
    }
}
