//! Builders for master-data and voucher documents

use tallybridge_domain::constants::{
    BASE_UNIT_NAME, CUSTOMER_LEDGER_PARENT, DEFAULT_STOCK_GROUP, SALES_LEDGER_NAME,
    SALES_LEDGER_PARENT, UNIT_MARKER, VOUCHER_ENTRY_MODE, VOUCHER_NARRATION, VOUCHER_TYPE_SALES,
    VOUCHER_VIEW,
};
use tallybridge_domain::{Invoice, Result};
use tracing::debug;

use super::model::{ImportEnvelope, InventoryEntry, LedgerEntry, MasterKind, MasterRecord, Voucher};
use crate::invoice::{normalize_invoice, NormalizedInvoice, VoucherLine};

/// The base unit every stock item is counted in.
pub fn base_unit() -> MasterRecord {
    MasterRecord::new(MasterKind::Unit, BASE_UNIT_NAME)
        .field("ISSIMPLEUNIT", "Yes")
        .field("DECIMALPLACES", "0")
}

pub fn default_stock_group() -> MasterRecord {
    MasterRecord::new(MasterKind::StockGroup, DEFAULT_STOCK_GROUP)
        .field("PARENT", "")
        .field("ISADDABLE", "No")
}

pub fn sales_ledger() -> MasterRecord {
    MasterRecord::new(MasterKind::Ledger, SALES_LEDGER_NAME)
        .field("PARENT", SALES_LEDGER_PARENT)
        .field("ISCOSTCENTREON", "No")
}

pub fn customer_ledger(name: &str) -> MasterRecord {
    MasterRecord::new(MasterKind::Ledger, name)
        .field("PARENT", CUSTOMER_LEDGER_PARENT)
        .field("ISCOSTCENTREON", "No")
}

pub fn stock_item(name: &str) -> MasterRecord {
    MasterRecord::new(MasterKind::StockItem, name)
        .field("PARENT", DEFAULT_STOCK_GROUP)
        .field("BASEUNITS", BASE_UNIT_NAME)
}

/// Build the sales voucher for a normalized invoice.
///
/// The party ledger is debited with the negated total and the sales ledger
/// credited with the total; each surviving line becomes an inventory entry
/// allocated to the sales ledger.
pub fn build_voucher(invoice: &NormalizedInvoice) -> Voucher {
    let total = invoice.total.value().to_string();
    let customer = invoice.customer().to_string();

    let ledger_entries = vec![
        LedgerEntry {
            ledger_name: customer.clone(),
            deemed_positive: true,
            amount: format!("-{total}"),
        },
        LedgerEntry {
            ledger_name: SALES_LEDGER_NAME.to_string(),
            deemed_positive: false,
            amount: total,
        },
    ];

    Voucher {
        remote_id: invoice.id.to_string(),
        voucher_type: VOUCHER_TYPE_SALES.to_string(),
        view: VOUCHER_VIEW.to_string(),
        date: invoice.date.value().clone(),
        narration: VOUCHER_NARRATION.to_string(),
        party_ledger_name: customer,
        entry_mode: VOUCHER_ENTRY_MODE.to_string(),
        ledger_entries,
        inventory_entries: invoice.lines.iter().map(inventory_entry).collect(),
    }
}

fn inventory_entry(line: &VoucherLine) -> InventoryEntry {
    let amount = line.amount.to_string();
    let quantity = format!("{} {UNIT_MARKER}", line.quantity);
    InventoryEntry {
        stock_item_name: line.item_name.clone(),
        rate: format!("{}/{UNIT_MARKER}", line.rate),
        amount: amount.clone(),
        actual_qty: quantity.clone(),
        billed_qty: quantity,
        allocation: LedgerEntry {
            ledger_name: SALES_LEDGER_NAME.to_string(),
            deemed_positive: false,
            amount,
        },
    }
}

/// Render the voucher document for a raw invoice.
///
/// # Errors
/// Fails without side effects when the invoice cannot be normalized or the
/// document cannot be serialized.
pub fn build_invoice_document(invoice: &Invoice) -> Result<String> {
    let normalized = normalize_invoice(invoice)?;
    render_voucher(&normalized)
}

/// Render the voucher document for an already-normalized invoice.
pub fn render_voucher(invoice: &NormalizedInvoice) -> Result<String> {
    let document = ImportEnvelope::voucher(build_voucher(invoice)).render()?;
    debug!(invoice_id = %invoice.id, document = %document, "voucher document built");
    Ok(document)
}

/// Render a master create-request.
pub fn render_master(record: &MasterRecord) -> Result<String> {
    ImportEnvelope::master(record.clone()).render()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tallybridge_domain::BridgeError;

    use super::*;

    fn invoice(value: serde_json::Value) -> Invoice {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn master_definitions_carry_fixed_fields() {
        let unit = render_master(&base_unit()).unwrap();
        assert!(unit.contains(
            "<UNIT NAME=\"PIECES\" ACTION=\"Create\"><NAME>PIECES</NAME>\
             <ISSIMPLEUNIT>Yes</ISSIMPLEUNIT><DECIMALPLACES>0</DECIMALPLACES></UNIT>"
        ));

        let item = render_master(&stock_item("Widget")).unwrap();
        assert!(item.contains(
            "<STOCKITEM NAME=\"Widget\" ACTION=\"Create\"><NAME>Widget</NAME>\
             <PARENT>Primary</PARENT><BASEUNITS>PIECES</BASEUNITS></STOCKITEM>"
        ));

        let ledger = render_master(&customer_ledger("Acme")).unwrap();
        assert!(ledger.contains("<PARENT>Sundry Debtors</PARENT><ISCOSTCENTREON>No</ISCOSTCENTREON>"));

        let sales = render_master(&sales_ledger()).unwrap();
        assert!(sales.contains("<PARENT>Sales Accounts</PARENT>"));
    }

    #[test]
    fn voucher_document_for_simple_invoice() {
        let xml = build_invoice_document(&invoice(json!({
            "_id": "abc",
            "customerName": "Acme",
            "total": 100,
            "invoice_date": "2024-03-15",
            "items": [{"name": "Widget", "rate": 10, "quantity": 10, "amount": 100}]
        })))
        .unwrap();

        assert!(xml.contains("<REPORTNAME>Vouchers</REPORTNAME>"));
        assert!(xml.contains("<TALLYMESSAGE xmlns:UDF=\"TallyUDF\">"));
        assert!(xml.contains(
            "<VOUCHER REMOTEID=\"abc\" VCHTYPE=\"Sales\" ACTION=\"Create\" OBJVIEW=\"Invoice Voucher View\">"
        ));
        assert!(xml.contains("<DATE>20240315</DATE><GUID>abc</GUID>"));
        assert!(xml.contains("<PARTYLEDGERNAME>Acme</PARTYLEDGERNAME>"));
        assert!(xml.contains(
            "<ALLLEDGERENTRIES.LIST><LEDGERNAME>Acme</LEDGERNAME>\
             <ISDEEMEDPOSITIVE>Yes</ISDEEMEDPOSITIVE><AMOUNT>-100</AMOUNT></ALLLEDGERENTRIES.LIST>"
        ));
        assert!(xml.contains(
            "<ALLLEDGERENTRIES.LIST><LEDGERNAME>Sales Account</LEDGERNAME>\
             <ISDEEMEDPOSITIVE>No</ISDEEMEDPOSITIVE><AMOUNT>100</AMOUNT></ALLLEDGERENTRIES.LIST>"
        ));
        assert!(xml.contains(
            "<INVENTORYENTRIES.LIST><STOCKITEMNAME>Widget</STOCKITEMNAME>\
             <ISDEEMEDPOSITIVE>No</ISDEEMEDPOSITIVE><RATE>10/PCS</RATE><AMOUNT>100</AMOUNT>\
             <ACTUALQTY>10 PCS</ACTUALQTY><BILLEDQTY>10 PCS</BILLEDQTY><BATCHALLOCATIONS.LIST/>\
             <ACCOUNTINGALLOCATIONS.LIST><LEDGERNAME>Sales Account</LEDGERNAME>\
             <ISDEEMEDPOSITIVE>No</ISDEEMEDPOSITIVE><AMOUNT>100</AMOUNT>\
             </ACCOUNTINGALLOCATIONS.LIST></INVENTORYENTRIES.LIST>"
        ));
    }

    #[test]
    fn derived_total_and_fallback_date() {
        let xml = build_invoice_document(&invoice(json!({
            "_id": 9,
            "items": [
                {"title": "A", "rate": 2.5, "quantity": 4, "total": 10},
                {"title": "B", "rate": 1, "quantity": 2.5, "total": 2.5}
            ]
        })))
        .unwrap();

        assert!(xml.contains("<AMOUNT>-12.5</AMOUNT>"));
        assert!(xml.contains("<DATE>20250101</DATE>"));
        assert!(xml.contains("<PARTYLEDGERNAME>Unknown Customer</PARTYLEDGERNAME>"));
        assert!(xml.contains("<RATE>2.5/PCS</RATE>"));
        assert!(xml.contains("<ACTUALQTY>2.5 PCS</ACTUALQTY>"));
        assert!(xml.contains("REMOTEID=\"9\""));
    }

    #[test]
    fn textual_amounts_render_verbatim() {
        let xml = build_invoice_document(&invoice(json!({
            "_id": "t1",
            "totalAmount": "99.90",
            "items": [{"name": "Pen", "rate": "9.99", "quantity": "10", "amount": "99.90"}]
        })))
        .unwrap();

        assert!(xml.contains("<AMOUNT>-99.90</AMOUNT>"));
        assert!(xml.contains("<RATE>9.99/PCS</RATE>"));
    }

    #[test]
    fn unknown_item_lines_are_excluded_from_voucher() {
        let xml = build_invoice_document(&invoice(json!({
            "_id": "u1",
            "items": [
                {"rate": 5, "quantity": 1, "total": 5},
                {"name": "Known", "rate": 5, "quantity": 1, "total": 5}
            ]
        })))
        .unwrap();

        assert!(!xml.contains("Unknown Item"));
        assert_eq!(xml.matches("<INVENTORYENTRIES.LIST>").count(), 1);
        // the derived total covers only the line on the voucher
        assert!(xml.contains("<AMOUNT>-5</AMOUNT>"));
        assert!(!xml.contains("<AMOUNT>-10</AMOUNT>"));
    }

    #[test]
    fn missing_identifier_fails_before_rendering() {
        let err = build_invoice_document(&invoice(json!({"total": 1, "items": []}))).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidInvoice(_)));
    }

    #[test]
    fn invoice_without_items_yields_voucher_without_inventory() {
        let xml =
            build_invoice_document(&invoice(json!({"_id": "e", "total": 3, "items": []}))).unwrap();
        assert!(!xml.contains("INVENTORYENTRIES.LIST"));
        assert_eq!(xml.matches("<ALLLEDGERENTRIES.LIST>").count(), 2);
    }
}
