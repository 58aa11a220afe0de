//! # park-razorpay
//!
//! Razorpay implementation of the parkpay `PaymentGateway` trait.
//!
//! This crate covers three inbound concerns:
//!
//! 1. **Order creation** via the Orders API (`POST /v1/orders`) with
//!    amounts in paise and free-form notes for correlation.
//! 2. **Hosted checkout** via the Payment Links API
//!    (`POST /v1/payment_links`), used for catalog-product checkout.
//! 3. **Verification** — client payment signatures
//!    (`HMAC-SHA256("{order_id}|{payment_id}")` with the key secret) and
//!    webhook signatures (HMAC over the raw body with the webhook
//!    secret).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use park_razorpay::RazorpayGateway;
//! use park_core::{Currency, OrderRequest, PaymentGateway};
//!
//! let gateway = RazorpayGateway::from_env()?;
//!
//! let request = OrderRequest::new(100.0, Currency::INR)
//!     .with_note("spot_name", "A1");
//! let order = gateway.create_order(&request).await?;
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use park_razorpay::{dispatch_webhook_event, LoggingWebhookHandler};
//!
//! let event = gateway.verify_webhook(&body, signature)?;
//! dispatch_webhook_event(&LoggingWebhookHandler, &event)?;
//! ```

pub mod client;
pub mod config;
pub mod signature;
pub mod webhook;

// Re-exports
pub use client::RazorpayGateway;
pub use config::RazorpayConfig;
pub use webhook::{dispatch_webhook_event, LoggingWebhookHandler, WebhookHandler};
