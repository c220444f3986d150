//! Pipeline behaviour through the public API: normalization, master data,
//! voucher submission, and status reporting.

mod support;

use std::sync::Arc;

use serde_json::json;
use support::doubles::{RecordingBackend, RecordingGateway, CREATED};
use tallybridge_core::{InvoiceSyncService, RequestClass};
use tallybridge_domain::{InvoiceId, SyncState};

fn service(backend: &Arc<RecordingBackend>, gateway: &Arc<RecordingGateway>) -> InvoiceSyncService {
    InvoiceSyncService::new(backend.clone(), gateway.clone())
}

#[tokio::test]
async fn every_master_step_tolerates_already_exists() {
    let backend = Arc::new(RecordingBackend::with_invoices(vec![json!({
        "_id": "abc",
        "customerName": "Acme",
        "total": 100,
        "items": [{"name": "Widget", "rate": 10, "quantity": 10, "amount": 100}]
    })]));
    let exists = "<RESPONSE><LINEERROR>Already Exists</LINEERROR></RESPONSE>";
    let gateway =
        Arc::new(RecordingGateway::scripted(&[exists, exists, exists, exists, exists, CREATED]));

    let summary = service(&backend, &gateway).run_cycle().await.unwrap();

    assert_eq!(summary.succeeded, 1);
    let posts = gateway.posts().await;
    assert_eq!(posts.len(), 6);
    assert!(posts[..5].iter().all(|post| post.class == RequestClass::Master));
    assert_eq!(posts[5].class, RequestClass::Voucher);
    assert_eq!(backend.reports().await[0].invoice_id, Some(InvoiceId::from("abc")));
}

#[tokio::test]
async fn master_failure_prevents_voucher_submission() {
    let backend = Arc::new(RecordingBackend::with_invoices(vec![json!({
        "_id": "m1",
        "customer": {"name": "Globex"},
        "total": 5,
        "items": [{"title": "Gear", "rate": 5, "quantity": 1, "total": 5}]
    })]));
    let gateway = Arc::new(RecordingGateway::scripted(&[
        CREATED,
        CREATED,
        CREATED,
        "<LINEERROR>Group 'Sundry Debtors' does not exist</LINEERROR>",
    ]));

    service(&backend, &gateway).run_cycle().await.unwrap();

    let entities = gateway.entities().await;
    assert_eq!(entities.last().map(String::as_str), Some("LEDGER 'Globex'"));
    assert!(entities.iter().all(|entity| !entity.starts_with("VOUCHER")));

    let reports = backend.reports().await;
    assert_eq!(reports[0].state, SyncState::Error);
    assert!(reports[0].message.contains("does not exist"));
}

#[tokio::test]
async fn sentinel_named_items_skip_master_data_and_voucher_lines() {
    let backend = Arc::new(RecordingBackend::with_invoices(vec![json!({
        "_id": "s1",
        "customerName": "Initech",
        "items": [
            {"rate": 3, "quantity": 2, "total": 6},
            {"name": "Stapler", "rate": 4, "quantity": 1, "amount": 4}
        ]
    })]));
    let gateway = Arc::new(RecordingGateway::default());

    service(&backend, &gateway).run_cycle().await.unwrap();

    let posts = gateway.posts().await;
    let entities: Vec<&str> = posts.iter().map(|post| post.entity.as_str()).collect();
    assert!(entities.contains(&"STOCKITEM 'Stapler'"));
    assert!(!entities.iter().any(|entity| entity.contains("Unknown Item")));

    let voucher = &posts.last().unwrap().document;
    assert_eq!(voucher.matches("<INVENTORYENTRIES.LIST>").count(), 1);
    assert!(!voucher.contains("Unknown Item"));
    // derived total covers only the line that made it onto the voucher
    assert!(voucher.contains("<AMOUNT>-4</AMOUNT>"));
}

#[tokio::test]
async fn zero_items_without_total_submits_nothing() {
    let backend =
        Arc::new(RecordingBackend::with_invoices(vec![json!({"_id": "z", "items": []})]));
    let gateway = Arc::new(RecordingGateway::default());

    let summary = service(&backend, &gateway).run_cycle().await.unwrap();

    assert_eq!(summary.failed, 1);
    assert!(gateway.posts().await.is_empty());
    assert!(backend.reports().await[0].message.contains("totalAmount"));
}

#[tokio::test]
async fn invoices_are_processed_in_backend_order() {
    let invoice = |id: &str| {
        json!({"_id": id, "total": 1, "items": [{"name": id, "rate": 1, "quantity": 1, "amount": 1}]})
    };
    let backend =
        Arc::new(RecordingBackend::with_invoices(vec![invoice("c"), invoice("a"), invoice("b")]));
    let gateway = Arc::new(RecordingGateway::default());

    service(&backend, &gateway).run_cycle().await.unwrap();

    let vouchers: Vec<String> = gateway
        .entities()
        .await
        .into_iter()
        .filter(|entity| entity.starts_with("VOUCHER"))
        .collect();
    assert_eq!(vouchers, vec!["VOUCHER 'c'", "VOUCHER 'a'", "VOUCHER 'b'"]);

    let reported: Vec<String> = backend
        .reports()
        .await
        .iter()
        .map(|status| status.invoice_id.as_ref().unwrap().to_string())
        .collect();
    assert_eq!(reported, vec!["c", "a", "b"]);
}
