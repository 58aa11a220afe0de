//! # Razorpay REST Client
//!
//! Implementation of `PaymentGateway` against the Razorpay Orders and
//! Payment Links APIs. Each method makes exactly one gateway call and
//! never retries; failures are classified and surfaced immediately.

use crate::config::RazorpayConfig;
use crate::signature;
use crate::webhook;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use park_core::{
    CheckoutLink, Currency, GatewayOrder, OrderRequest, OrderStatus, PaymentConfirmation,
    PaymentError, PaymentGateway, PaymentResult, Product, WebhookEvent,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument};

/// Razorpay gateway client
pub struct RazorpayGateway {
    config: RazorpayConfig,
    client: Client,
}

impl RazorpayGateway {
    /// Create a new gateway client
    pub fn new(config: RazorpayConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = RazorpayConfig::from_env()?;
        Ok(Self::new(config))
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> PaymentResult<R> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(body)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        self.read_response(response).await
    }

    async fn get_json<R: for<'de> Deserialize<'de>>(&self, path: &str) -> PaymentResult<R> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        self.read_response(response).await
    }

    async fn read_response<R: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> PaymentResult<R> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Razorpay API error: status={}, body={}", status, body);
            return Err(classify_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Razorpay response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    #[instrument(skip(self, request), fields(receipt = %request.receipt))]
    async fn create_order(&self, request: &OrderRequest) -> PaymentResult<GatewayOrder> {
        let body = RazorpayOrderBody {
            amount: request.amount_minor_units(),
            currency: request.currency,
            receipt: Some(request.receipt.clone()),
            notes: request.notes.clone(),
        };

        debug!("Creating Razorpay order: amount={} paise", body.amount);

        let order: RazorpayOrderResponse = self.post_json("/v1/orders", &body).await?;

        info!(
            "Created Razorpay order: id={}, amount={}, status={}",
            order.id, order.amount, order.status
        );

        Ok(order.into_gateway_order())
    }

    #[instrument(skip(self, product, notes), fields(product_id = %product.id))]
    async fn create_checkout_link(
        &self,
        product: &Product,
        notes: &HashMap<String, String>,
        callback_url: Option<&str>,
    ) -> PaymentResult<CheckoutLink> {
        let body = RazorpayPaymentLinkBody {
            amount: product.price.amount,
            currency: product.price.currency,
            description: format!("{} ({})", product.name, product.duration_display()),
            notes: notes.clone(),
            callback_url: callback_url.map(String::from),
            callback_method: callback_url.map(|_| "get".to_string()),
        };

        debug!("Creating Razorpay payment link: amount={} paise", body.amount);

        let link: RazorpayPaymentLinkResponse =
            self.post_json("/v1/payment_links", &body).await?;

        info!(
            "Created Razorpay payment link: id={}, url={}",
            link.id, link.short_url
        );

        Ok(CheckoutLink {
            link_id: link.id,
            url: link.short_url,
            amount: link.amount,
            currency: link.currency,
            status: link.status,
            created_at: timestamp_or_now(link.created_at),
        })
    }

    #[instrument(skip(self))]
    async fn fetch_order(&self, order_id: &str) -> PaymentResult<GatewayOrder> {
        let order: RazorpayOrderResponse =
            self.get_json(&format!("/v1/orders/{}", order_id)).await?;

        debug!("Fetched Razorpay order: id={}, status={}", order.id, order.status);

        Ok(order.into_gateway_order())
    }

    fn verify_payment_signature(&self, confirmation: &PaymentConfirmation) -> PaymentResult<()> {
        signature::verify_payment_signature(
            &self.config.key_secret,
            &confirmation.order_id,
            &confirmation.payment_id,
            &confirmation.signature,
        )
    }

    fn verify_webhook(&self, payload: &[u8], signature: &str) -> PaymentResult<WebhookEvent> {
        webhook::verify_webhook(&self.config.webhook_secret, payload, signature)
    }

    fn provider_name(&self) -> &'static str {
        "razorpay"
    }
}

// =============================================================================
// Razorpay API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct RazorpayOrderBody {
    /// Amount in paise
    amount: i64,
    currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    notes: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
struct RazorpayPaymentLinkBody {
    amount: i64,
    currency: Currency,
    description: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    notes: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_method: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RazorpayOrderResponse {
    id: String,
    amount: i64,
    currency: Currency,
    status: String,
    #[serde(default)]
    receipt: Option<String>,
    /// Razorpay serializes empty notes as `[]` instead of `{}`
    #[serde(default)]
    notes: serde_json::Value,
    #[serde(default)]
    created_at: Option<i64>,
}

impl RazorpayOrderResponse {
    fn into_gateway_order(self) -> GatewayOrder {
        GatewayOrder {
            order_id: self.id,
            amount: self.amount,
            currency: self.currency,
            status: OrderStatus::parse(&self.status),
            receipt: self.receipt,
            notes: notes_to_map(&self.notes),
            created_at: timestamp_or_now(self.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RazorpayPaymentLinkResponse {
    id: String,
    short_url: String,
    amount: i64,
    currency: Currency,
    status: String,
    #[serde(default)]
    created_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorResponse {
    error: RazorpayApiError,
}

#[derive(Debug, Deserialize)]
struct RazorpayApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

fn notes_to_map(notes: &serde_json::Value) -> HashMap<String, String> {
    notes
        .as_object()
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

fn timestamp_or_now(ts: Option<i64>) -> DateTime<Utc> {
    ts.and_then(|t| DateTime::from_timestamp(t, 0))
        .unwrap_or_else(Utc::now)
}

// =============================================================================
// Error Classification
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GatewayErrorKind {
    /// Our credentials were rejected
    Auth,
    /// The gateway rejected the request as malformed
    BadRequest,
    /// Upstream failure, the caller may retry
    Unavailable,
}

/// Provider error code → internal kind.
/// Extend this table when Razorpay introduces new codes; call sites
/// stay untouched.
const ERROR_CODE_MAP: &[(&str, GatewayErrorKind)] = &[
    ("BAD_REQUEST_ERROR", GatewayErrorKind::BadRequest),
    ("GATEWAY_ERROR", GatewayErrorKind::Unavailable),
    ("SERVER_ERROR", GatewayErrorKind::Unavailable),
];

/// Classify a non-success Razorpay response into a `PaymentError`
fn classify_error(status: u16, body: &str) -> PaymentError {
    let parsed: Option<RazorpayErrorResponse> = serde_json::from_str(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|r| r.error.code.as_deref())
        .unwrap_or("");
    let description = parsed
        .as_ref()
        .and_then(|r| r.error.description.clone())
        .unwrap_or_else(|| format!("HTTP {status}"));

    if status == 401 {
        return PaymentError::GatewayAuth;
    }

    let kind = ERROR_CODE_MAP
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, k)| *k);

    match kind {
        Some(GatewayErrorKind::Auth) => PaymentError::GatewayAuth,
        Some(GatewayErrorKind::BadRequest) => PaymentError::GatewayRejected {
            message: description,
        },
        Some(GatewayErrorKind::Unavailable) => PaymentError::GatewayUnavailable {
            message: description,
        },
        None if status >= 500 => PaymentError::GatewayUnavailable {
            message: description,
        },
        None => PaymentError::Internal(description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_auth_error() {
        let body = r#"{"error":{"code":"BAD_REQUEST_ERROR","description":"Authentication failed"}}"#;
        let err = classify_error(401, body);
        assert!(matches!(err, PaymentError::GatewayAuth));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_classify_bad_request_passes_description_through() {
        let body = r#"{"error":{"code":"BAD_REQUEST_ERROR","description":"amount must be at least 100"}}"#;
        let err = classify_error(400, body);
        assert!(matches!(err, PaymentError::GatewayRejected { .. }));
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("amount must be at least 100"));
    }

    #[test]
    fn test_classify_server_error() {
        let body = r#"{"error":{"code":"SERVER_ERROR","description":"internal failure"}}"#;
        let err = classify_error(500, body);
        assert!(matches!(err, PaymentError::GatewayUnavailable { .. }));
        assert_eq!(err.status_code(), 503);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_classify_unparseable_5xx() {
        let err = classify_error(502, "<html>bad gateway</html>");
        assert!(matches!(err, PaymentError::GatewayUnavailable { .. }));
    }

    #[test]
    fn test_classify_unknown_falls_back_to_internal() {
        let err = classify_error(418, "teapot");
        assert!(matches!(err, PaymentError::Internal(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_notes_to_map_handles_empty_array() {
        // Razorpay returns [] for empty notes
        assert!(notes_to_map(&serde_json::json!([])).is_empty());

        let notes = notes_to_map(&serde_json::json!({"spot_name": "A1", "count": 2}));
        assert_eq!(notes.get("spot_name").map(String::as_str), Some("A1"));
        // Non-string values are dropped, not stringified
        assert!(notes.get("count").is_none());
    }
}
