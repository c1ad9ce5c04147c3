//! Integration Tests: Transfers
//!
//! - invalid input never reaches the network
//! - payment body and endpoint per provider

use super::support::*;
use qiwi_payments::{Credentials, ErrorKind, Provider, RawResponse, TransferRequest};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials() -> Credentials {
    Credentials::new(Some(TOKEN.into()), Some(SECRET_KEY.into()), Some(PHONE.into()))
        .expect("Failed to build credentials")
}

/// Test: empty destination fails with zero requests issued
#[tokio::test]
async fn test_empty_destination_issues_no_request() {
    let transport = Arc::new(CapturingTransport::new(|_| RawResponse::json(200, &json!({}))));
    let client = capturing_client(transport.clone(), credentials());

    let err = client.transfer(TransferRequest::new("", 100.0)).await.unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::ValidationError));
    assert_eq!(transport.request_count(), 0);
}

/// Test: zero amount fails with zero requests issued
#[tokio::test]
async fn test_zero_amount_issues_no_request() {
    let transport = Arc::new(CapturingTransport::new(|_| RawResponse::json(200, &json!({}))));
    let client = capturing_client(transport.clone(), credentials());

    let err = client
        .transfer(TransferRequest::new("+79000000001", 0.0))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::ValidationError));
    assert_eq!(transport.request_count(), 0);
}

/// Test: wallet transfer posts to terms/99 with the account token
#[tokio::test]
async fn test_wallet_transfer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sinap/api/v2/terms/99/payments"))
        .and(header("Authorization", "Bearer wallet-token"))
        .and(body_partial_json(json!({
            "sum": {"amount": 100.0, "currency": "643"},
            "paymentMethod": {"type": "Account", "accountId": "643"},
            "fields": {"account": "+79000000001"},
            "comment": "lunch"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1700000000000123",
            "terms": "99",
            "fields": {"account": "+79000000001"},
            "sum": {"amount": 100, "currency": "643"},
            "transaction": {"id": "4969142201", "state": {"code": "Accepted"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = full_client(&server);
    let receipt = client
        .transfer(TransferRequest::new("+79000000001", 100.0).comment("lunch"))
        .await
        .expect("Transfer failed");

    assert_eq!(receipt.transaction_id(), Some("4969142201"));
    assert_eq!(receipt.state(), Some("Accepted"));
    assert_eq!(receipt.payload()["terms"], "99");
}

/// Test: provider selects the terms endpoint
#[tokio::test]
async fn test_provider_transfer_endpoint() {
    let transport = Arc::new(CapturingTransport::new(|_| {
        RawResponse::json(200, &json!({"transaction": {"id": "1", "state": {"code": "Accepted"}}}))
    }));
    let client = capturing_client(transport.clone(), credentials());

    client
        .transfer(TransferRequest::new("4111111111111111", 500.0).provider(Provider::VisaRussia))
        .await
        .expect("Transfer failed");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.ends_with("/sinap/api/v2/terms/1963/payments"));
    assert_eq!(requests[0].header("Authorization"), Some("Bearer wallet-token"));

    let id = requests[0].body.as_ref().and_then(|b| b["id"].as_str()).expect("transaction id");
    assert!(id.chars().all(|c| c.is_ascii_digit()));
}

/// Test: insufficient funds reported with `code` is an API error
#[tokio::test]
async fn test_remote_rejection() {
    let transport = Arc::new(CapturingTransport::new(|_| {
        RawResponse::json(400, &json!({"code": "QWPRC-220", "message": "Недостаточно средств"}))
    }));
    let client = capturing_client(transport.clone(), credentials());

    let err = client
        .transfer(TransferRequest::new("+79000000001", 1_000_000.0))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::ApiError));
    assert_eq!(err.api_code().as_deref(), Some("QWPRC-220"));
}
