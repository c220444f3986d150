//! Integration tests for the daemon adapter against a mock daemon.

#[path = "support.rs"]
mod support;

use std::time::Duration;

use support::{init_tracing, CREATED};
use tallybridge_core::{RequestClass, TallyGateway};
use tallybridge_domain::BridgeError;
use tallybridge_infra::{HttpClient, TallyClient};
use wiremock::matchers::{body_string_contains, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, master: Duration, voucher: Duration) -> TallyClient {
    let http = HttpClient::builder().timeout(Duration::from_secs(10)).build().unwrap();
    TallyClient::new(http, server.uri(), master, voucher)
}

#[tokio::test]
async fn posts_xml_and_returns_body() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("content-type", "application/xml"))
        .and(body_string_contains("<NAME>PIECES</NAME>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CREATED))
        .expect(1)
        .mount(&server)
        .await;

    let tally = client(&server, Duration::from_secs(5), Duration::from_secs(5));
    let body = tally
        .post_document("<ENVELOPE><NAME>PIECES</NAME></ENVELOPE>", RequestClass::Master, "UNIT 'PIECES'")
        .await
        .unwrap();

    assert_eq!(body, CREATED);
}

#[tokio::test]
async fn line_errors_are_returned_as_plain_bodies() {
    init_tracing();
    let server = MockServer::start().await;
    let reply = "<RESPONSE><LINEERROR>Ledger 'X' does not exist</LINEERROR></RESPONSE>";
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(reply))
        .mount(&server)
        .await;

    let tally = client(&server, Duration::from_secs(5), Duration::from_secs(5));
    let body = tally.post_document("<ENVELOPE/>", RequestClass::Voucher, "VOUCHER 'abc'").await.unwrap();

    assert_eq!(
        tallybridge_core::extract_line_error(&body).as_deref(),
        Some("Ledger 'X' does not exist")
    );
}

#[tokio::test]
async fn non_ok_status_is_a_protocol_error_with_body() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("daemon busy"))
        .expect(1)
        .mount(&server)
        .await;

    let tally = client(&server, Duration::from_secs(5), Duration::from_secs(5));
    let err = tally
        .post_document("<ENVELOPE/>", RequestClass::Master, "LEDGER 'Acme'")
        .await
        .unwrap_err();

    match err {
        BridgeError::Protocol(msg) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("LEDGER 'Acme'"));
            assert!(msg.contains("daemon busy"));
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn accepted_but_not_ok_status_is_a_protocol_error() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202).set_body_string("queued"))
        .mount(&server)
        .await;

    let tally = client(&server, Duration::from_secs(5), Duration::from_secs(5));
    let err = tally
        .post_document("<ENVELOPE/>", RequestClass::Voucher, "VOUCHER 'abc'")
        .await
        .unwrap_err();

    match err {
        BridgeError::Protocol(msg) => {
            assert!(msg.contains("202"));
            assert!(msg.contains("queued"));
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn master_requests_use_the_shorter_budget() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(CREATED).set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    let tally = client(&server, Duration::from_millis(100), Duration::from_secs(5));

    let master = tally.post_document("<ENVELOPE/>", RequestClass::Master, "UNIT 'PIECES'").await;
    assert!(matches!(master, Err(BridgeError::Network(_))));

    let voucher = tally.post_document("<ENVELOPE/>", RequestClass::Voucher, "VOUCHER 'abc'").await;
    assert_eq!(voucher.unwrap(), CREATED);
}

#[tokio::test]
async fn unreachable_daemon_is_a_network_error() {
    init_tracing();
    let http = HttpClient::new().unwrap();
    let tally = TallyClient::new(
        http,
        "http://127.0.0.1:1",
        Duration::from_secs(2),
        Duration::from_secs(2),
    );

    let err = tally.post_document("<ENVELOPE/>", RequestClass::Master, "UNIT 'PIECES'").await;
    assert!(matches!(err, Err(BridgeError::Network(_))));
}
