//! Import document model
//!
//! Every request to the daemon is an `ENVELOPE` carrying exactly one message:
//! either a master record or a sales voucher.

/// Report selected in the envelope's request description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportName {
    AllMasters,
    Vouchers,
}

impl ReportName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllMasters => "All Masters",
            Self::Vouchers => "Vouchers",
        }
    }
}

/// Kind of master entity, rendered as the record's element name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterKind {
    Unit,
    StockGroup,
    Ledger,
    StockItem,
}

impl MasterKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Unit => "UNIT",
            Self::StockGroup => "STOCKGROUP",
            Self::Ledger => "LEDGER",
            Self::StockItem => "STOCKITEM",
        }
    }
}

/// A create-request for one named master entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterRecord {
    pub kind: MasterKind,
    pub name: String,
    /// Extra child elements in declared order. Empty values are not rendered.
    pub fields: Vec<(&'static str, String)>,
}

impl MasterRecord {
    pub fn new(kind: MasterKind, name: impl Into<String>) -> Self {
        Self { kind, name: name.into(), fields: Vec::new() }
    }

    pub fn field(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((key, value.into()));
        self
    }

    /// Log-friendly entity description, e.g. `LEDGER 'Acme'`.
    pub fn describe(&self) -> String {
        format!("{} '{}'", self.kind.tag(), self.name)
    }
}

/// Ledger posting within a voucher or an accounting allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub ledger_name: String,
    pub deemed_positive: bool,
    pub amount: String,
}

/// One inventory line of a sales voucher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub stock_item_name: String,
    pub rate: String,
    pub amount: String,
    pub actual_qty: String,
    pub billed_qty: String,
    pub allocation: LedgerEntry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voucher {
    pub remote_id: String,
    pub voucher_type: String,
    pub view: String,
    pub date: String,
    pub narration: String,
    pub party_ledger_name: String,
    pub entry_mode: String,
    pub ledger_entries: Vec<LedgerEntry>,
    pub inventory_entries: Vec<InventoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Master(MasterRecord),
    Voucher(Voucher),
}

/// A complete import request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEnvelope {
    pub report: ReportName,
    pub message: Message,
}

impl ImportEnvelope {
    pub fn master(record: MasterRecord) -> Self {
        Self { report: ReportName::AllMasters, message: Message::Master(record) }
    }

    pub fn voucher(voucher: Voucher) -> Self {
        Self { report: ReportName::Vouchers, message: Message::Voucher(voucher) }
    }
}
