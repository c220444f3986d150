//! Invoice normalization

pub mod normalize;
pub mod resolved;

pub use normalize::{
    format_voucher_date, normalize_invoice, resolve_customer_name, resolve_date,
    resolve_item_name, resolve_total_amount, NormalizedInvoice, VoucherLine,
};
pub use resolved::Resolved;
