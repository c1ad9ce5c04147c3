//! Integration Tests: Request Execution & Error Classification
//!
//! Exercises the executor over real HTTP (reqwest) against a mock server:
//! - 401 / 403 take precedence over the body
//! - structured errors in 200 responses
//! - malformed bodies
//! - per-call headers and query parameters
//! - the configured timeout, with no retry

use super::support::*;
use qiwi_payments::{CredentialRole, ErrorKind, QiwiError};
use reqwest::Method;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test: 401 is AuthInvalid even when the body looks like a success
#[tokio::test]
async fn test_401_with_success_payload_is_auth_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/funding-sources/v2/persons/79000000000/accounts"))
        .respond_with(ResponseTemplate::new(401).set_body_json(funding_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let client = full_client(&server);
    let err = client.balance("qw_wallet_rub").await.unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::AuthInvalid));
}

/// Test: 403 is PermissionDenied
#[tokio::test]
async fn test_403_is_permission_denied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/person-profile/v1/profile/current"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"code": "QWPRC-403"})))
        .mount(&server)
        .await;

    let client = full_client(&server);
    let err = client.get_profile(Default::default()).await.unwrap_err();

    assert!(matches!(err, QiwiError::PermissionDenied));
}

/// Test: errorCode in a 200 response is an API error carrying the payload
#[tokio::test]
async fn test_error_code_in_200_is_api_error() {
    let server = MockServer::start().await;
    let payload = json!({
        "serviceName": "invoicing-api",
        "errorCode": "api.invoice.not.found",
        "description": "Invoice not found",
        "userMessage": "Invoice not found"
    });
    Mock::given(method("GET"))
        .and(path("/bills/missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let client = full_client(&server);
    let err = client.get_invoice_status("missing").await.unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::ApiError));
    assert_eq!(err.api_code().as_deref(), Some("api.invoice.not.found"));
    assert_eq!(err.detail(), payload);
}

/// Test: a non-JSON body is an API error with the raw text as detail
#[tokio::test]
async fn test_malformed_body_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bills/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = full_client(&server);
    let err = client.get_invoice_status("abc").await.unwrap_err();

    match err {
        QiwiError::Api(detail) => assert_eq!(detail, json!("<html>Bad Gateway</html>")),
        other => panic!("unexpected error: {:?}", other),
    }
}

/// Test: headers and query parameters are sent per call
#[tokio::test]
async fn test_headers_and_query_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/person-profile/v1/profile/current"))
        .and(header("Authorization", "Bearer wallet-token"))
        .and(header("Accept", "application/json"))
        .and(query_param("authInfoEnabled", "true"))
        .and(query_param("contractInfoEnabled", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = full_client(&server);
    let url = client
        .config()
        .edge_endpoint(&["person-profile", "v1", "profile", "current"])
        .expect("Valid endpoint");
    let payload = client
        .executor()
        .execute(
            CredentialRole::AccountToken,
            Method::GET,
            &url,
            &[("authInfoEnabled", "true"), ("contractInfoEnabled", "false")],
            None,
        )
        .await
        .expect("Request should succeed");

    assert_eq!(payload, json!({"ok": true}));
}

/// Test: a role without a configured credential fails before any request
#[tokio::test]
async fn test_missing_role_credential_is_configuration_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let credentials = qiwi_payments::Credentials::with_account_token(TOKEN, Some(PHONE.into()))
        .expect("Failed to build credentials");
    let client = client_with(&server, credentials);

    let err = client.get_invoice_status("abc").await.unwrap_err();
    assert!(matches!(err, QiwiError::Configuration(_)));
}

/// Test: unreachable host surfaces as a network error, not a classified kind
#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let credentials = qiwi_payments::Credentials::with_secret_key(SECRET_KEY)
        .expect("Failed to build credentials");
    let config = qiwi_payments::QiwiConfig::default()
        .with_bills_url("http://127.0.0.1:9/bills")
        .with_timeout(1);
    let client = qiwi_payments::QiwiClient::with_config(credentials, config)
        .expect("Failed to build client");

    let err = client.get_invoice_status("abc").await.unwrap_err();
    assert!(matches!(err, QiwiError::Network(_)));
    assert_eq!(err.kind(), None);
}

/// Test: a response slower than the timeout fails once and is not retried
#[tokio::test]
async fn test_slow_response_times_out_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bills/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(bill_payload("slow", "WAITING"))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let credentials = qiwi_payments::Credentials::with_secret_key(SECRET_KEY)
        .expect("Failed to build credentials");
    let config = mock_config(&server).with_timeout(1);
    let client = qiwi_payments::QiwiClient::with_config(credentials, config)
        .expect("Failed to build client");

    let started = std::time::Instant::now();
    let err = client.get_invoice_status("slow").await.unwrap_err();

    assert!(matches!(err, QiwiError::Network(_)), "got {:?}", err);
    assert!(started.elapsed() < Duration::from_secs(3));

    let received = server.received_requests().await.expect("Request recording is enabled");
    assert_eq!(received.len(), 1);
}
