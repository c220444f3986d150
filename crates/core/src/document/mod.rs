//! Import documents for the accounting daemon

pub mod builders;
pub mod model;
mod render;

pub use builders::{
    base_unit, build_invoice_document, build_voucher, customer_ledger, default_stock_group,
    render_master, render_voucher, sales_ledger, stock_item,
};
pub use model::{
    ImportEnvelope, InventoryEntry, LedgerEntry, MasterKind, MasterRecord, Message, ReportName,
    Voucher,
};
