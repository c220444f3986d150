//! Compact XML rendering of import envelopes

use std::fmt::Display;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tallybridge_domain::{BridgeError, Result};

use super::model::{
    ImportEnvelope, InventoryEntry, LedgerEntry, MasterRecord, Message, Voucher,
};

const UDF_NAMESPACE: (&str, &str) = ("xmlns:UDF", "TallyUDF");
const ACTION_CREATE: (&str, &str) = ("ACTION", "Create");

impl ImportEnvelope {
    /// Serialize to a compact document without an XML declaration.
    ///
    /// # Errors
    /// Returns `BridgeError::Document` if the writer fails or the output is
    /// not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let mut out = XmlOut::new();

        out.open("ENVELOPE", &[])?;
        out.open("HEADER", &[])?;
        out.leaf("TALLYREQUEST", "Import Data")?;
        out.close("HEADER")?;

        out.open("BODY", &[])?;
        out.open("IMPORTDATA", &[])?;
        out.open("REQUESTDESC", &[])?;
        out.leaf("REPORTNAME", self.report.as_str())?;
        out.close("REQUESTDESC")?;
        out.open("REQUESTDATA", &[])?;

        match &self.message {
            Message::Master(record) => {
                out.open("TALLYMESSAGE", &[])?;
                write_master(&mut out, record)?;
            }
            Message::Voucher(voucher) => {
                out.open("TALLYMESSAGE", &[UDF_NAMESPACE])?;
                write_voucher(&mut out, voucher)?;
            }
        }
        out.close("TALLYMESSAGE")?;

        out.close("REQUESTDATA")?;
        out.close("IMPORTDATA")?;
        out.close("BODY")?;
        out.close("ENVELOPE")?;

        out.finish()
    }
}

fn write_master(out: &mut XmlOut, record: &MasterRecord) -> Result<()> {
    let tag = record.kind.tag();
    out.open(tag, &[("NAME", record.name.as_str()), ACTION_CREATE])?;
    out.leaf("NAME", &record.name)?;
    for (key, value) in record.fields.iter().filter(|(_, value)| !value.is_empty()) {
        out.leaf(key, value)?;
    }
    out.close(tag)
}

fn write_voucher(out: &mut XmlOut, voucher: &Voucher) -> Result<()> {
    out.open(
        "VOUCHER",
        &[
            ("REMOTEID", voucher.remote_id.as_str()),
            ("VCHTYPE", voucher.voucher_type.as_str()),
            ACTION_CREATE,
            ("OBJVIEW", voucher.view.as_str()),
        ],
    )?;
    out.leaf("DATE", &voucher.date)?;
    out.leaf("GUID", &voucher.remote_id)?;
    out.leaf("NARRATION", &voucher.narration)?;
    out.leaf("VOUCHERTYPENAME", &voucher.voucher_type)?;
    out.leaf("PARTYLEDGERNAME", &voucher.party_ledger_name)?;
    out.leaf("PERSISTEDVIEW", &voucher.view)?;
    out.leaf("BASICBASEPARTYNAME", &voucher.party_ledger_name)?;
    out.leaf("VCHENTRYMODE", &voucher.entry_mode)?;

    for entry in &voucher.ledger_entries {
        write_ledger_entry(out, "ALLLEDGERENTRIES.LIST", entry)?;
    }
    for entry in &voucher.inventory_entries {
        write_inventory_entry(out, entry)?;
    }

    out.close("VOUCHER")
}

fn write_ledger_entry(out: &mut XmlOut, tag: &str, entry: &LedgerEntry) -> Result<()> {
    out.open(tag, &[])?;
    out.leaf("LEDGERNAME", &entry.ledger_name)?;
    out.leaf("ISDEEMEDPOSITIVE", yes_no(entry.deemed_positive))?;
    out.leaf("AMOUNT", &entry.amount)?;
    out.close(tag)
}

fn write_inventory_entry(out: &mut XmlOut, entry: &InventoryEntry) -> Result<()> {
    out.open("INVENTORYENTRIES.LIST", &[])?;
    out.leaf("STOCKITEMNAME", &entry.stock_item_name)?;
    out.leaf("ISDEEMEDPOSITIVE", yes_no(false))?;
    out.leaf("RATE", &entry.rate)?;
    out.leaf("AMOUNT", &entry.amount)?;
    out.leaf("ACTUALQTY", &entry.actual_qty)?;
    out.leaf("BILLEDQTY", &entry.billed_qty)?;
    out.empty("BATCHALLOCATIONS.LIST")?;
    write_ledger_entry(out, "ACCOUNTINGALLOCATIONS.LIST", &entry.allocation)?;
    out.close("INVENTORYENTRIES.LIST")
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Thin wrapper over the quick-xml writer mapping failures to `BridgeError`.
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self { writer: Writer::new(Vec::new()) }
    }

    fn open(&mut self, tag: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(tag).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Start(start)).map_err(xml)
    }

    fn close(&mut self, tag: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(tag))).map_err(xml)
    }

    fn empty(&mut self, tag: &str) -> Result<()> {
        self.writer.write_event(Event::Empty(BytesStart::new(tag))).map_err(xml)
    }

    fn leaf(&mut self, tag: &str, text: &str) -> Result<()> {
        self.open(tag, &[])?;
        self.writer.write_event(Event::Text(BytesText::new(text))).map_err(xml)?;
        self.close(tag)
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner()).map_err(xml)
    }
}

fn xml<E: Display>(e: E) -> BridgeError {
    BridgeError::Document(e.to_string())
}
