//! Master-data assurance
//!
//! Creates every master entity a voucher references before the voucher is
//! submitted. Creation is idempotent: a line error reporting that the entity
//! already exists counts as success.

use std::sync::Arc;

use tallybridge_domain::{BridgeError, Result};
use tracing::{debug, info, instrument};

use crate::document::{
    base_unit, customer_ledger, default_stock_group, render_master, sales_ledger, stock_item,
    MasterRecord,
};
use crate::invoice::NormalizedInvoice;
use crate::tally::{extract_line_error, is_already_exists, RequestClass, TallyGateway};

/// Outcome of one master create-request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterOutcome {
    Created,
    AlreadyExists,
}

pub struct MasterDataService {
    gateway: Arc<dyn TallyGateway>,
}

impl MasterDataService {
    pub fn new(gateway: Arc<dyn TallyGateway>) -> Self {
        Self { gateway }
    }

    /// Master records an invoice needs, in submission order.
    ///
    /// Unit, stock group, sales ledger, the customer's ledger, then one stock
    /// item per named line item. Repeated item names yield repeated records.
    pub fn required_masters(invoice: &NormalizedInvoice) -> Vec<MasterRecord> {
        let mut records = vec![
            base_unit(),
            default_stock_group(),
            sales_ledger(),
            customer_ledger(invoice.customer()),
        ];
        records.extend(invoice.stock_items.iter().map(|name| stock_item(name)));
        records
    }

    /// Ensure all master data for an invoice exists.
    ///
    /// # Errors
    /// Stops at the first create-request that fails for a reason other than a
    /// duplicate; transport and protocol errors propagate unchanged and a line
    /// error becomes `BridgeError::Daemon`.
    #[instrument(skip(self, invoice), fields(invoice_id = %invoice.id))]
    pub async fn ensure_master_data(&self, invoice: &NormalizedInvoice) -> Result<()> {
        let records = Self::required_masters(invoice);
        for record in &records {
            self.ensure(record).await?;
        }
        info!(count = records.len(), "master data ensured");
        Ok(())
    }

    /// Submit one create-request and interpret the response.
    pub async fn ensure(&self, record: &MasterRecord) -> Result<MasterOutcome> {
        let entity = record.describe();
        let document = render_master(record)?;
        let body = self.gateway.post_document(&document, RequestClass::Master, &entity).await?;

        match extract_line_error(&body) {
            None => {
                debug!(entity = %entity, "master created");
                Ok(MasterOutcome::Created)
            }
            Some(error) if is_already_exists(&error) => {
                debug!(entity = %entity, "master already exists");
                Ok(MasterOutcome::AlreadyExists)
            }
            Some(error) => Err(BridgeError::Daemon(format!("{entity}: {error}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;

    use super::*;
    use crate::invoice::normalize_invoice;

    /// Gateway double replying with a scripted body per entity description.
    struct ScriptedGateway {
        calls: Mutex<Vec<String>>,
        fail_on: Option<(&'static str, &'static str)>,
    }

    impl ScriptedGateway {
        fn new(fail_on: Option<(&'static str, &'static str)>) -> Self {
            Self { calls: Mutex::new(Vec::new()), fail_on }
        }
    }

    #[async_trait]
    impl TallyGateway for ScriptedGateway {
        async fn post_document(
            &self,
            _document: &str,
            class: RequestClass,
            entity: &str,
        ) -> Result<String> {
            assert_eq!(class, RequestClass::Master);
            self.calls.lock().await.push(entity.to_string());
            match self.fail_on {
                Some((target, error)) if entity.contains(target) => {
                    Ok(format!("<RESPONSE><LINEERROR>{error}</LINEERROR></RESPONSE>"))
                }
                _ => Ok("<RESPONSE><CREATED>1</CREATED></RESPONSE>".to_string()),
            }
        }
    }

    fn normalized(value: serde_json::Value) -> NormalizedInvoice {
        normalize_invoice(&serde_json::from_value(value).unwrap()).unwrap()
    }

    fn sample() -> NormalizedInvoice {
        normalized(json!({
            "_id": "abc",
            "customerName": "Acme",
            "total": 100,
            "items": [
                {"name": "Widget", "rate": 10, "quantity": 5, "amount": 50},
                {"name": "Widget", "rate": 10, "quantity": 5, "amount": 50}
            ]
        }))
    }

    #[tokio::test]
    async fn creates_masters_in_fixed_order() {
        let gateway = Arc::new(ScriptedGateway::new(None));
        let service = MasterDataService::new(gateway.clone());

        service.ensure_master_data(&sample()).await.unwrap();

        let calls = gateway.calls.lock().await.clone();
        assert_eq!(
            calls,
            vec![
                "UNIT 'PIECES'",
                "STOCKGROUP 'Primary'",
                "LEDGER 'Sales Account'",
                "LEDGER 'Acme'",
                "STOCKITEM 'Widget'",
                "STOCKITEM 'Widget'",
            ]
        );
    }

    #[tokio::test]
    async fn already_exists_is_tolerated() {
        let gateway = Arc::new(ScriptedGateway::new(Some(("LEDGER", "Ledger Already Exists"))));
        let service = MasterDataService::new(gateway.clone());

        service.ensure_master_data(&sample()).await.unwrap();
        assert_eq!(gateway.calls.lock().await.len(), 6);

        let outcome = service.ensure(&sales_ledger()).await.unwrap();
        assert_eq!(outcome, MasterOutcome::AlreadyExists);
    }

    #[tokio::test]
    async fn other_line_errors_abort_assurance() {
        let gateway = Arc::new(ScriptedGateway::new(Some(("STOCKGROUP", "Parent not found"))));
        let service = MasterDataService::new(gateway.clone());

        let err = service.ensure_master_data(&sample()).await.unwrap_err();

        assert_eq!(err, BridgeError::Daemon("STOCKGROUP 'Primary': Parent not found".into()));
        assert_eq!(gateway.calls.lock().await.len(), 2);
    }
}
