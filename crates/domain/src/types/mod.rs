//! Domain types and models

pub mod invoice;
pub mod status;
pub mod webhook;

pub use invoice::{
    format_decimal, render_number, CustomerRef, Invoice, InvoiceId, Items, LineItem, Scalar,
};
pub use status::{SyncState, SyncStatus};
pub use webhook::{InvoiceBatch, StatusPayload, SyncRequestEvent, SyncStatusEvent};
