//! Bridge constants
//!
//! Centralized location for the fixed names, sentinels, and defaults shared by
//! the pipeline and the agent runtime.

// Sentinels
pub const UNKNOWN_CUSTOMER: &str = "Unknown Customer";
pub const UNKNOWN_ITEM: &str = "Unknown Item";
pub const FALLBACK_VOUCHER_DATE: &str = "20250101";

// Master data referenced by every voucher
pub const BASE_UNIT_NAME: &str = "PIECES";
pub const UNIT_MARKER: &str = "PCS";
pub const DEFAULT_STOCK_GROUP: &str = "Primary";
pub const SALES_LEDGER_NAME: &str = "Sales Account";
pub const SALES_LEDGER_PARENT: &str = "Sales Accounts";
pub const CUSTOMER_LEDGER_PARENT: &str = "Sundry Debtors";

// Voucher fixtures
pub const VOUCHER_TYPE_SALES: &str = "Sales";
pub const VOUCHER_NARRATION: &str = "Sales Invoice";
pub const VOUCHER_VIEW: &str = "Invoice Voucher View";
pub const VOUCHER_ENTRY_MODE: &str = "Item Invoice";

// Daemon protocol
pub const DEFAULT_TALLY_URL: &str = "http://localhost:9000";
pub const ALREADY_EXISTS_MARKER: &str = "already exists";

// Backend protocol
pub const WEBHOOK_PATH: &str = "/webhook";
pub const EVENT_SYNC_REQUEST: &str = "sync-request";
pub const EVENT_SYNC_STATUS: &str = "sync-status";

// Runtime defaults
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_STATUS_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MASTER_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_VOUCHER_TIMEOUT_SECS: u64 = 30;
