//! # Order Types
//!
//! Gateway order, checkout link, and webhook event types for parkpay.
//! Every value here is ephemeral: it lives for one request/response cycle
//! and is never persisted.

use crate::product::{Currency, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A validated request to create a gateway order for a parking spot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Amount in major currency units (rupees), as submitted by the caller
    pub amount: f64,

    /// Currency the order is charged in
    #[serde(default)]
    pub currency: Currency,

    /// Receipt identifier sent to the gateway for correlation
    pub receipt: String,

    /// Free-form metadata forwarded verbatim to the gateway
    /// (spot name, duration, plate number, owner, etc.)
    #[serde(default)]
    pub notes: HashMap<String, String>,
}

impl OrderRequest {
    /// Create a request with a generated receipt id
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount,
            currency,
            receipt: format!("rcpt_{}", Uuid::new_v4().simple()),
            notes: HashMap::new(),
        }
    }

    /// Builder: attach a metadata note
    pub fn with_note(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.notes.insert(key.into(), value.into());
        self
    }

    /// Amount converted to the smallest currency unit, rounded to the
    /// nearest integer
    pub fn amount_minor_units(&self) -> i64 {
        self.currency.to_minor_units(self.amount)
    }
}

/// Status of a gateway order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order created, no payment attempt yet
    Created,
    /// At least one payment attempt was made
    Attempted,
    /// Payment captured in full
    Paid,
    /// Anything the gateway reports that we do not model
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Attempted => "attempted",
            OrderStatus::Paid => "paid",
            OrderStatus::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "created" => OrderStatus::Created,
            "attempted" => OrderStatus::Attempted,
            "paid" => OrderStatus::Paid,
            _ => OrderStatus::Unknown,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, OrderStatus::Paid)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Created
    }
}

/// An order created by (or fetched from) the payment gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    /// Gateway-assigned order id (e.g., "order_...")
    pub order_id: String,

    /// Amount in smallest currency unit
    pub amount: i64,

    /// Currency
    pub currency: Currency,

    /// Order status as reported by the gateway
    #[serde(default)]
    pub status: OrderStatus,

    /// Our receipt id, echoed back by the gateway
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,

    /// Metadata echoed back by the gateway
    #[serde(default)]
    pub notes: HashMap<String, String>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl GatewayOrder {
    /// Order amount as a typed price
    pub fn price(&self) -> Price {
        Price::from_minor_units(self.amount, self.currency)
    }
}

/// A hosted checkout link created by the gateway for a catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutLink {
    /// Gateway-assigned link id (e.g., "plink_...")
    pub link_id: String,

    /// URL to redirect the customer to
    pub url: String,

    /// Amount in smallest currency unit
    pub amount: i64,

    /// Currency
    pub currency: Currency,

    /// Link status as reported by the gateway
    pub status: String,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

/// The tuple a client submits to confirm a completed payment
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    /// Gateway order id the payment belongs to
    pub order_id: String,
    /// Gateway payment id
    pub payment_id: String,
    /// HMAC signature over "{order_id}|{payment_id}"
    pub signature: String,
}

/// Webhook event types we care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// Order fully paid
    OrderPaid,
    /// Payment captured
    PaymentCaptured,
    /// Payment failed
    PaymentFailed,
    /// Hosted checkout link paid
    CheckoutLinkPaid,
    /// Unknown event (acknowledged, logged, ignored)
    Unknown(String),
}

/// A verified, parsed webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event type
    pub event_type: WebhookEventType,

    /// Provider name
    pub provider: String,

    /// Related order id (if present in the payload)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    /// Related payment id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,

    /// Amount in smallest unit, if the payload carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,

    /// Raw event payload (for logging and debugging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<serde_json::Value>,

    /// When the gateway says the event occurred
    pub occurred_at: DateTime<Utc>,
}
