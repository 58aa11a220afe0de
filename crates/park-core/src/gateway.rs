//! # Payment Gateway Trait
//!
//! The seam between the HTTP layer and a payment provider.
//! Each provider (Razorpay today, others later) implements
//! `PaymentGateway`, so the API crate never touches provider wire
//! formats directly.

use crate::error::PaymentResult;
use crate::order::{CheckoutLink, GatewayOrder, OrderRequest, PaymentConfirmation, WebhookEvent};
use crate::product::Product;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Core trait for payment provider implementations.
///
/// Implementations make at most one provider call per method and never
/// retry internally; failures surface immediately to the caller.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order at the gateway.
    ///
    /// The request amount is converted to minor units and its notes are
    /// forwarded verbatim for later correlation.
    async fn create_order(&self, request: &OrderRequest) -> PaymentResult<GatewayOrder>;

    /// Create a hosted checkout link for a catalog product.
    ///
    /// `notes` carries free-form metadata (vehicle data, booking details)
    /// attached to the link for later correlation.
    async fn create_checkout_link(
        &self,
        product: &Product,
        notes: &HashMap<String, String>,
        callback_url: Option<&str>,
    ) -> PaymentResult<CheckoutLink>;

    /// Fetch an order from the gateway by its id.
    async fn fetch_order(&self, order_id: &str) -> PaymentResult<GatewayOrder>;

    /// Verify a client-supplied payment signature.
    ///
    /// Pure computation over the shared key secret; no gateway call.
    fn verify_payment_signature(&self, confirmation: &PaymentConfirmation) -> PaymentResult<()>;

    /// Verify a webhook signature over the raw body bytes and parse the
    /// event. Pure computation; no gateway call.
    fn verify_webhook(&self, payload: &[u8], signature: &str) -> PaymentResult<WebhookEvent>;

    /// Provider name (for logging and response shaping).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared, dynamically dispatched gateway
pub type BoxedGateway = Arc<dyn PaymentGateway>;
