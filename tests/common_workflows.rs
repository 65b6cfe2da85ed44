//! Integration tests for common checkout workflows.
//!
//! These drive the gateway through the facade crate the way a checkout
//! service would.

use qualpay::prelude::*;
use qualpay::scrub_transcript;
use serde_json::json;
use std::collections::HashMap;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Setup
// =============================================================================

fn options_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

async fn processor_replying(reply: serde_json::Value) -> (MockServer, PaymentProcessor<QualpayGateway>) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pg/sale"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .mount(&server)
        .await;

    let config = QualpayConfig::from_options(&options_map(&[
        ("merchant_id", "212000000001"),
        ("security_key", "sk_test"),
        ("endpoint", "sandbox"),
    ]))
    .unwrap()
    .base_url(server.uri())
    .require_tls(false);

    let processor = PaymentProcessor::new(QualpayGateway::new(config).unwrap());
    (server, processor)
}

fn checkout() -> (CreditCard, PurchaseOptions) {
    (
        CreditCard::new("4111111111111111", 3, 2027, "999"),
        PurchaseOptions::new(BillingAddress::new("500 Market St", "94105")).order_id("R200"),
    )
}

// =============================================================================
// Setup Failures
// =============================================================================

#[test]
fn test_gateway_setup_requires_both_credentials() {
    let missing_key = QualpayGateway::from_options(&options_map(&[("merchant_id", "m")]));
    assert!(matches!(missing_key, Err(PaymentError::Config(_))));

    let missing_id = QualpayGateway::from_options(&options_map(&[("security_key", "k")]));
    assert!(matches!(missing_id, Err(PaymentError::Config(_))));

    let complete = QualpayGateway::from_options(&options_map(&[
        ("merchant_id", "m"),
        ("security_key", "k"),
    ]));
    assert!(complete.is_ok());
}

// =============================================================================
// Purchase Flow
// =============================================================================

#[tokio::test]
async fn test_checkout_approved() {
    let (_server, processor) = processor_replying(json!({
        "rcode": "000",
        "rmsg": "Approved",
        "auth_code": "AUTH42"
    }))
    .await;
    let (card, options) = checkout();

    let outcome = processor.purchase(1000, &card, &options).await.unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.message, "Approved");
    assert_eq!(outcome.authorization.as_deref(), Some("AUTH42"));
    assert_eq!(outcome.purchase_id, "R200");
    assert!(outcome.test);
}

#[tokio::test]
async fn test_checkout_declined() {
    let (_server, processor) = processor_replying(json!({
        "rcode": "301",
        "rmsg": "Insufficient funds"
    }))
    .await;
    let (card, options) = checkout();

    let outcome = processor.purchase(1000, &card, &options).await.unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.message, "Insufficient funds");
}

#[tokio::test]
async fn test_checkout_reply_without_rcode_fails() {
    let (_server, processor) = processor_replying(json!({"rmsg": "Approved"})).await;
    let (card, options) = checkout();

    let outcome = processor.purchase(1000, &card, &options).await.unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.message, "Approved");
}

// =============================================================================
// Transcripts
// =============================================================================

#[test]
fn test_support_transcript_is_scrubbed() {
    let gateway = QualpayGateway::new(QualpayConfig::new("m", "k")).unwrap();
    let processor = PaymentProcessor::new(gateway);

    let raw = "POST /pg/sale HTTP/1.1\nAuthorization: Basic abc123\n\ncard_num=4111111111111111&card_ccv2=999&amt_tran=1000";
    let scrubbed = processor.transcript(raw).unwrap();

    assert!(scrubbed.contains("Authorization: Basic [FILTERED]"));
    assert!(scrubbed.contains("card_num=[FILTERED]&card_ccv2=[FILTERED]&amt_tran=1000"));
    assert!(!scrubbed.contains("abc123"));
    assert!(!scrubbed.contains("4111111111111111"));
    assert_eq!(scrub_transcript(&scrubbed), scrubbed);
}

#[test]
fn test_log_sink_renders_scrubbed_transcript() {
    let line = qualpay::log::scrubbed_transcript_line("CARD_CCV2=999", scrub_transcript);
    assert_eq!(line, "transcript:\nCARD_CCV2=[FILTERED]");
}
