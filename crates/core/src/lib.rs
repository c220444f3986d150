//! # TallyBridge Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Invoice normalization with explicit fallback chains
//! - Import document builders for master data and sales vouchers
//! - Daemon response interpretation
//! - Master-data assurance and the per-cycle sync orchestrator
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `tallybridge-domain`
//! - No HTTP, filesystem, or platform code
//! - All external effects via traits
//! - Pure, testable business logic

pub mod document;
pub mod invoice;
pub mod masters;
pub mod sync;
pub mod tally;

// Infrastructure ports
pub mod config_ports;

// Re-export specific items to avoid ambiguity
pub use config_ports::ConfigProvider;
pub use document::{build_invoice_document, ImportEnvelope, MasterKind, MasterRecord};
pub use invoice::{normalize_invoice, NormalizedInvoice, Resolved};
pub use masters::MasterDataService;
pub use sync::{CycleSummary, InvoiceBackend, InvoiceSyncService};
pub use tally::{extract_line_error, RequestClass, TallyGateway};
