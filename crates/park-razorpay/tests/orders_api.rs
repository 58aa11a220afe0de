//! Integration tests for the Razorpay REST client against a mock server.

use park_core::{Currency, OrderRequest, OrderStatus, PaymentError, PaymentGateway};
use park_razorpay::{RazorpayConfig, RazorpayGateway};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> RazorpayGateway {
    let config = RazorpayConfig::new("rzp_test_abc123", "test_secret", "test_webhook_secret")
        .with_api_base_url(server.uri());
    RazorpayGateway::new(config)
}

#[tokio::test]
async fn create_order_sends_paise_and_maps_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/orders"))
        .and(header_exists("authorization"))
        .and(body_partial_json(json!({
            "amount": 10000,
            "currency": "INR",
            "notes": { "spot_name": "A1", "duration": "2h" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "order_N1234567890",
            "entity": "order",
            "amount": 10000,
            "amount_paid": 0,
            "currency": "INR",
            "receipt": "rcpt_abc",
            "status": "created",
            "notes": { "spot_name": "A1", "duration": "2h" },
            "created_at": 1724900000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let request = OrderRequest::new(100.0, Currency::INR)
        .with_note("spot_name", "A1")
        .with_note("duration", "2h");

    let order = gateway.create_order(&request).await.unwrap();

    assert_eq!(order.order_id, "order_N1234567890");
    assert_eq!(order.amount, 10000);
    assert_eq!(order.currency, Currency::INR);
    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.notes.get("spot_name").map(String::as_str), Some("A1"));
}

#[tokio::test]
async fn auth_failure_maps_to_sanitized_gateway_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/orders"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "code": "BAD_REQUEST_ERROR",
                "description": "Authentication failed: key_id rzp_test_abc123"
            }
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway
        .create_order(&OrderRequest::new(100.0, Currency::INR))
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::GatewayAuth));
    assert_eq!(err.status_code(), 500);
    // The key id from the provider response must not leak to callers
    assert!(!err.to_string().contains("rzp_test"));
}

#[tokio::test]
async fn bad_request_passes_provider_description_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/orders"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": "BAD_REQUEST_ERROR",
                "description": "Order amount less than minimum amount allowed"
            }
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway
        .create_order(&OrderRequest::new(100.0, Currency::INR))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert!(err.to_string().contains("minimum amount"));
}

#[tokio::test]
async fn upstream_5xx_maps_to_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/orders"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "code": "SERVER_ERROR", "description": "We are facing some trouble" }
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway
        .create_order(&OrderRequest::new(100.0, Currency::INR))
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::GatewayUnavailable { .. }));
    assert_eq!(err.status_code(), 503);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn fetch_order_reports_paid_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/orders/order_paid_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "order_paid_1",
            "amount": 30000,
            "amount_paid": 30000,
            "currency": "INR",
            "status": "paid",
            "notes": { "plate_number": "KA01AB1234" },
            "created_at": 1724900000
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let order = gateway.fetch_order("order_paid_1").await.unwrap();

    assert!(order.status.is_paid());
    assert_eq!(order.amount, 30000);
    assert_eq!(
        order.notes.get("plate_number").map(String::as_str),
        Some("KA01AB1234")
    );
}

#[tokio::test]
async fn create_checkout_link_returns_hosted_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_links"))
        .and(body_partial_json(json!({ "amount": 30000, "currency": "INR" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "plink_Nabc123",
            "short_url": "https://rzp.io/l/abc123",
            "amount": 30000,
            "currency": "INR",
            "status": "created",
            "created_at": 1724900000
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let product = park_core::Product::new(
        "full-day",
        "Full Day Pass",
        park_core::Price::from_minor_units(30000, Currency::INR),
        24,
    );
    let notes = std::collections::HashMap::from([(
        "plate_number".to_string(),
        "KA01AB1234".to_string(),
    )]);

    let link = gateway
        .create_checkout_link(&product, &notes, None)
        .await
        .unwrap();

    assert_eq!(link.link_id, "plink_Nabc123");
    assert_eq!(link.url, "https://rzp.io/l/abc123");
    assert_eq!(link.amount, 30000);
}
