//! # Razorpay Webhook Handling
//!
//! Razorpay signs the raw webhook body with HMAC-SHA256 using the shared
//! webhook secret and sends the hex digest in the `X-Razorpay-Signature`
//! header. Verification must run over the exact byte sequence received,
//! never over re-serialized JSON.

use crate::signature::{constant_time_eq, hmac_sha256_hex};
use chrono::{DateTime, Utc};
use park_core::{PaymentError, PaymentResult, WebhookEvent, WebhookEventType};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Razorpay webhook envelope
#[derive(Debug, Deserialize)]
struct RazorpayWebhookEnvelope {
    event: String,
    #[serde(default)]
    payload: serde_json::Value,
    #[serde(default)]
    created_at: Option<i64>,
}

/// Verify a webhook signature over the raw body bytes and parse the event.
pub fn verify_webhook(
    webhook_secret: &str,
    payload: &[u8],
    signature: &str,
) -> PaymentResult<WebhookEvent> {
    if signature.is_empty() {
        return Err(PaymentError::WebhookVerificationFailed(
            "Empty signature header".to_string(),
        ));
    }

    let expected = hmac_sha256_hex(webhook_secret, payload);
    if !constant_time_eq(signature, &expected) {
        return Err(PaymentError::WebhookVerificationFailed(
            "Signature mismatch".to_string(),
        ));
    }

    let envelope: RazorpayWebhookEnvelope = serde_json::from_slice(payload)
        .map_err(|e| PaymentError::WebhookParse(format!("Failed to parse webhook: {}", e)))?;

    debug!("Verified Razorpay webhook: event={}", envelope.event);

    let event_type = match envelope.event.as_str() {
        "order.paid" => WebhookEventType::OrderPaid,
        "payment.captured" => WebhookEventType::PaymentCaptured,
        "payment.failed" => WebhookEventType::PaymentFailed,
        "payment_link.paid" => WebhookEventType::CheckoutLinkPaid,
        other => WebhookEventType::Unknown(other.to_string()),
    };

    // Entities of interest live under payload.<entity>.entity
    let payment = entity(&envelope.payload, "payment");
    let order = entity(&envelope.payload, "order");

    let payment_id = payment
        .and_then(|p| p.get("id"))
        .and_then(|v| v.as_str())
        .map(String::from);

    let order_id = payment
        .and_then(|p| p.get("order_id"))
        .and_then(|v| v.as_str())
        .or_else(|| order.and_then(|o| o.get("id")).and_then(|v| v.as_str()))
        .map(String::from);

    let amount = payment
        .and_then(|p| p.get("amount"))
        .and_then(|v| v.as_i64())
        .or_else(|| order.and_then(|o| o.get("amount")).and_then(|v| v.as_i64()));

    let occurred_at = envelope
        .created_at
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .unwrap_or_else(Utc::now);

    Ok(WebhookEvent {
        event_type,
        provider: "razorpay".to_string(),
        order_id,
        payment_id,
        amount,
        raw_data: Some(envelope.payload),
        occurred_at,
    })
}

fn entity<'a>(payload: &'a serde_json::Value, name: &str) -> Option<&'a serde_json::Value> {
    payload.get(name).and_then(|e| e.get("entity"))
}

/// Webhook event handler trait.
///
/// Default implementations only log; no state mutation or downstream
/// action happens in this design.
#[allow(unused_variables)]
pub trait WebhookHandler: Send + Sync {
    /// Called when an order is fully paid
    fn on_order_paid(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!(
            "Order paid: order={:?}, amount={:?}",
            event.order_id, event.amount
        );
        Ok(())
    }

    /// Called when a payment is captured
    fn on_payment_captured(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!(
            "Payment captured: payment={:?}, order={:?}, amount={:?}",
            event.payment_id, event.order_id, event.amount
        );
        Ok(())
    }

    /// Called when a payment fails
    fn on_payment_failed(&self, event: &WebhookEvent) -> PaymentResult<()> {
        warn!(
            "Payment failed: payment={:?}, order={:?}",
            event.payment_id, event.order_id
        );
        Ok(())
    }

    /// Called when a hosted checkout link is paid
    fn on_checkout_link_paid(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!("Checkout link paid: payment={:?}", event.payment_id);
        Ok(())
    }

    /// Called for unknown/unhandled events
    fn on_unknown_event(&self, event: &WebhookEvent) -> PaymentResult<()> {
        debug!("Unhandled webhook event: {:?}", event.event_type);
        Ok(())
    }
}

/// Default no-op webhook handler (just logs events)
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch a verified webhook event to the appropriate handler method
pub fn dispatch_webhook_event(
    handler: &dyn WebhookHandler,
    event: &WebhookEvent,
) -> PaymentResult<()> {
    match &event.event_type {
        WebhookEventType::OrderPaid => handler.on_order_paid(event),
        WebhookEventType::PaymentCaptured => handler.on_payment_captured(event),
        WebhookEventType::PaymentFailed => handler.on_payment_failed(event),
        WebhookEventType::CheckoutLinkPaid => handler.on_checkout_link_paid(event),
        WebhookEventType::Unknown(_) => handler.on_unknown_event(event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_webhook_secret";

    fn signed_body(body: &str) -> (Vec<u8>, String) {
        let sig = hmac_sha256_hex(SECRET, body.as_bytes());
        (body.as_bytes().to_vec(), sig)
    }

    fn captured_event_body() -> String {
        serde_json::json!({
            "entity": "event",
            "event": "payment.captured",
            "created_at": 1724900000,
            "payload": {
                "payment": {
                    "entity": {
                        "id": "pay_test_123",
                        "order_id": "order_test_456",
                        "amount": 10000,
                        "status": "captured"
                    }
                }
            }
        })
        .to_string()
    }

    #[test]
    fn test_verify_and_parse_payment_captured() {
        let (body, sig) = signed_body(&captured_event_body());
        let event = verify_webhook(SECRET, &body, &sig).unwrap();

        assert_eq!(event.event_type, WebhookEventType::PaymentCaptured);
        assert_eq!(event.payment_id.as_deref(), Some("pay_test_123"));
        assert_eq!(event.order_id.as_deref(), Some("order_test_456"));
        assert_eq!(event.amount, Some(10000));
        assert_eq!(event.provider, "razorpay");
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let (body, _) = signed_body(&captured_event_body());
        let bad_sig = hmac_sha256_hex("wrong_secret", &body);

        let err = verify_webhook(SECRET, &body, &bad_sig).unwrap_err();
        assert!(matches!(err, PaymentError::WebhookVerificationFailed(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_tampered_body_rejected() {
        let (_, sig) = signed_body(&captured_event_body());
        let tampered = captured_event_body().replace("10000", "1");

        let err = verify_webhook(SECRET, tampered.as_bytes(), &sig).unwrap_err();
        assert!(matches!(err, PaymentError::WebhookVerificationFailed(_)));
    }

    #[test]
    fn test_order_paid_event_uses_order_entity() {
        let body = serde_json::json!({
            "event": "order.paid",
            "payload": {
                "order": {
                    "entity": { "id": "order_abc", "amount": 30000, "status": "paid" }
                }
            }
        })
        .to_string();
        let (body, sig) = signed_body(&body);

        let event = verify_webhook(SECRET, &body, &sig).unwrap();
        assert_eq!(event.event_type, WebhookEventType::OrderPaid);
        assert_eq!(event.order_id.as_deref(), Some("order_abc"));
        assert_eq!(event.amount, Some(30000));
    }

    #[test]
    fn test_unknown_event_type_still_verifies() {
        let body = r#"{"event":"refund.processed","payload":{}}"#;
        let (body, sig) = signed_body(body);

        let event = verify_webhook(SECRET, &body, &sig).unwrap();
        assert_eq!(
            event.event_type,
            WebhookEventType::Unknown("refund.processed".to_string())
        );
    }

    #[test]
    fn test_dispatch_webhook() {
        struct TestHandler {
            called: std::sync::atomic::AtomicBool,
        }

        impl WebhookHandler for TestHandler {
            fn on_payment_captured(&self, _event: &WebhookEvent) -> PaymentResult<()> {
                self.called.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            }
        }

        let handler = TestHandler {
            called: std::sync::atomic::AtomicBool::new(false),
        };

        let (body, sig) = signed_body(&captured_event_body());
        let event = verify_webhook(SECRET, &body, &sig).unwrap();
        dispatch_webhook_event(&handler, &event).unwrap();

        assert!(handler.called.load(std::sync::atomic::Ordering::SeqCst));
    }
}
