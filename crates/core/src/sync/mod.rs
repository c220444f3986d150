//! Invoice synchronization

pub mod ports;
pub mod service;

pub use ports::InvoiceBackend;
pub use service::{CycleSummary, InvoiceSyncService};
