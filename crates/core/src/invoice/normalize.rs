//! Invoice field normalization
//!
//! Extracts the fields a voucher needs from a heterogeneously-shaped invoice.
//! Names and dates are tolerant and fall back to sentinels; the identifier,
//! the total, and the item sequence are required and reject the invoice when
//! they cannot be resolved.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tallybridge_domain::constants::{FALLBACK_VOUCHER_DATE, UNKNOWN_CUSTOMER, UNKNOWN_ITEM};
use tallybridge_domain::{BridgeError, Invoice, InvoiceId, Items, LineItem, Result, Scalar};
use tracing::{debug, warn};

use super::resolved::Resolved;

const VOUCHER_DATE_FORMAT: &str = "%Y%m%d";

/// Date-only formats tried after the timestamp formats, in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// One inventory line that survived item validation.
#[derive(Debug, Clone, PartialEq)]
pub struct VoucherLine {
    pub item_name: String,
    pub rate: Scalar,
    pub quantity: Scalar,
    pub amount: Scalar,
}

/// An invoice reduced to the fields the voucher and master data need.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInvoice {
    pub id: InvoiceId,
    pub customer_name: Resolved<String>,
    pub total: Resolved<Scalar>,
    pub date: Resolved<String>,
    pub lines: Vec<VoucherLine>,
    /// Stock items to ensure, in item order. Repeated names are kept.
    pub stock_items: Vec<String>,
}

impl NormalizedInvoice {
    pub fn customer(&self) -> &str {
        self.customer_name.value()
    }
}

/// Customer name from `customer.name`, then `customerName`, then the sentinel.
pub fn resolve_customer_name(invoice: &Invoice) -> Resolved<String> {
    let nested = invoice.customer.as_ref().and_then(|customer| customer.name.as_deref());
    if let Some(name) = non_empty(nested) {
        return Resolved::Found { value: name.to_string(), field: "customer.name" };
    }
    if let Some(name) = non_empty(invoice.customer_name.as_deref()) {
        return Resolved::Found { value: name.to_string(), field: "customerName" };
    }
    Resolved::Defaulted(UNKNOWN_CUSTOMER.to_string())
}

/// Item name from `title`, then `name`, then the sentinel.
pub fn resolve_item_name(item: &LineItem) -> Resolved<String> {
    if let Some(title) = non_empty(item.title.as_deref()) {
        return Resolved::Found { value: title.to_string(), field: "title" };
    }
    if let Some(name) = non_empty(item.name.as_deref()) {
        return Resolved::Found { value: name.to_string(), field: "name" };
    }
    Resolved::Defaulted(UNKNOWN_ITEM.to_string())
}

/// Invoice total from the first present candidate field, else the sum of
/// the amounts of the items that make it onto the voucher.
///
/// Items skipped by [`normalize_invoice`] contribute nothing to the derived
/// total, so the voucher's ledger entries always balance its inventory lines.
///
/// # Errors
/// Returns `BridgeError::InvalidInvoice` when no candidate field is present and
/// the item sum is not positive or there are no items to sum.
pub fn resolve_total_amount(invoice: &Invoice) -> Result<Resolved<Scalar>> {
    let candidates = [
        ("total", &invoice.total),
        ("totalAmount", &invoice.total_amount),
        ("amount", &invoice.amount),
        ("grandTotal", &invoice.grand_total),
        ("finalAmount", &invoice.final_amount),
    ];

    for (field, candidate) in candidates {
        if let Some(value) = candidate {
            debug!(field, value = %value, "total amount found");
            return Ok(Resolved::Found { value: value.clone(), field });
        }
    }

    let items = match &invoice.items {
        Items::List(items) if !items.is_empty() => items,
        _ => {
            return Err(BridgeError::InvalidInvoice(
                "invoice missing totalAmount and no items to calculate from".into(),
            ))
        }
    };

    let sum: f64 = items
        .iter()
        .flatten()
        .filter_map(|item| voucher_line(item).ok())
        .filter_map(|line| line.amount.as_f64())
        .sum();

    if sum > 0.0 {
        debug!(total = sum, "total amount calculated from items");
        Ok(Resolved::Derived(Scalar::from(sum)))
    } else {
        Err(BridgeError::InvalidInvoice(
            "invoice missing totalAmount and could not calculate from items".into(),
        ))
    }
}

/// Why an item was left off the voucher.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SkippedItem {
    UnknownName,
    MissingAmount(String),
    MissingRateOrQuantity(String),
}

impl SkippedItem {
    /// Name to ensure as a stock item even though the line is skipped.
    fn named(&self) -> Option<&str> {
        match self {
            Self::UnknownName => None,
            Self::MissingAmount(name) | Self::MissingRateOrQuantity(name) => Some(name),
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Self::UnknownName => "skipping item with empty or unknown name",
            Self::MissingAmount(_) => "skipping item with missing total/amount",
            Self::MissingRateOrQuantity(_) => "skipping item with missing rate or quantity",
        }
    }
}

/// Validate one item into a voucher line.
fn voucher_line(item: &LineItem) -> std::result::Result<VoucherLine, SkippedItem> {
    let name = resolve_item_name(item);
    if name.is_defaulted() {
        return Err(SkippedItem::UnknownName);
    }
    let name = name.into_value();

    let Some(amount) = item.total_or_amount() else {
        return Err(SkippedItem::MissingAmount(name));
    };
    let (Some(rate), Some(quantity)) = (&item.rate, &item.quantity) else {
        return Err(SkippedItem::MissingRateOrQuantity(name));
    };

    Ok(VoucherLine {
        item_name: name,
        rate: rate.clone(),
        quantity: quantity.clone(),
        amount: amount.clone(),
    })
}

/// Voucher date from `invoice_date`, else `date`, formatted as `YYYYMMDD`.
///
/// The first non-empty field wins; if it cannot be parsed the fallback date
/// is used.
pub fn resolve_date(invoice: &Invoice) -> Resolved<String> {
    let candidates =
        [("invoice_date", invoice.invoice_date.as_deref()), ("date", invoice.date.as_deref())];

    let Some((field, raw)) =
        candidates.into_iter().find_map(|(field, raw)| non_empty(raw).map(|raw| (field, raw)))
    else {
        return Resolved::Defaulted(FALLBACK_VOUCHER_DATE.to_string());
    };

    match format_voucher_date(raw) {
        Some(value) => Resolved::Found { value, field },
        None => {
            warn!(field, raw, "could not parse invoice date, using fallback");
            Resolved::Defaulted(FALLBACK_VOUCHER_DATE.to_string())
        }
    }
}

/// Parse one of the accepted textual date formats into `YYYYMMDD`.
pub fn format_voucher_date(raw: &str) -> Option<String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.format(VOUCHER_DATE_FORMAT).to_string());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%SZ") {
        return Some(timestamp.format(VOUCHER_DATE_FORMAT).to_string());
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .map(|date| date.format(VOUCHER_DATE_FORMAT).to_string())
}

/// Reduce an invoice to its voucher-ready form.
///
/// Items missing a rate, quantity, or total/amount are skipped, as are items
/// whose name resolves to the sentinel; neither fails the invoice.
///
/// # Errors
/// Returns `BridgeError::InvalidInvoice` when the identifier, the total, or the
/// item sequence cannot be resolved.
pub fn normalize_invoice(invoice: &Invoice) -> Result<NormalizedInvoice> {
    let id = match &invoice.id {
        Some(id) if !id.is_blank() => id.clone(),
        _ => return Err(BridgeError::InvalidInvoice("invoice missing _id".into())),
    };

    let total = resolve_total_amount(invoice)?;

    let items = match &invoice.items {
        Items::List(items) => items,
        Items::Missing => return Err(BridgeError::InvalidInvoice("invoice missing items".into())),
        Items::Malformed => {
            return Err(BridgeError::InvalidInvoice("invalid items format in invoice".into()))
        }
    };

    let mut lines = Vec::with_capacity(items.len());
    let mut stock_items = Vec::with_capacity(items.len());

    for (index, slot) in items.iter().enumerate() {
        let Some(item) = slot else {
            warn!(invoice_id = %id, index, "skipping item that is not an object");
            continue;
        };

        match voucher_line(item) {
            Ok(line) => {
                stock_items.push(line.item_name.clone());
                lines.push(line);
            }
            Err(skipped) => {
                warn!(invoice_id = %id, index, "{}", skipped.reason());
                if let Some(name) = skipped.named() {
                    stock_items.push(name.to_string());
                }
            }
        }
    }

    Ok(NormalizedInvoice {
        id,
        customer_name: resolve_customer_name(invoice),
        total,
        date: resolve_date(invoice),
        lines,
        stock_items,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
