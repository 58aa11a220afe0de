//! # park-core
//!
//! Core types and traits for the parkpay payment backend.
//!
//! This crate provides:
//! - `PaymentGateway` trait for implementing payment providers
//! - `Product` and `ProductCatalog` for the parking-pass catalog
//! - `OrderRequest`, `GatewayOrder`, and `CheckoutLink` for the order flow
//! - `validate` helpers applied before any gateway call
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use park_core::{Currency, OrderRequest, PaymentGateway};
//!
//! let request = OrderRequest::new(100.0, Currency::INR)
//!     .with_note("spot_name", "A1")
//!     .with_note("duration", "2h");
//!
//! let order = gateway.create_order(&request).await?;
//! // Respond with order.order_id, order.amount, order.currency
//! ```

pub mod error;
pub mod gateway;
pub mod order;
pub mod product;
pub mod validate;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use gateway::{BoxedGateway, PaymentGateway};
pub use order::{
    CheckoutLink, GatewayOrder, OrderRequest, OrderStatus, PaymentConfirmation, WebhookEvent,
    WebhookEventType,
};
pub use product::{Currency, Price, Product, ProductCatalog};
pub use validate::MIN_ORDER_AMOUNT;
