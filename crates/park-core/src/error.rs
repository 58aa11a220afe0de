//! # Payment Error Types
//!
//! Typed error handling for the parkpay backend.
//! All payment operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data (missing or malformed field)
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Product not found in catalog
    #[error("Product not found")]
    ProductNotFound { product_id: String },

    /// Amount below the gateway minimum
    #[error("Minimum order amount is {minimum}")]
    AmountBelowMinimum { minimum: i64 },

    /// Gateway rejected our credentials
    #[error("Payment gateway authentication failed")]
    GatewayAuth,

    /// Gateway rejected the request as malformed (provider description passed through)
    #[error("{message}")]
    GatewayRejected { message: String },

    /// Gateway reported a server-side failure
    #[error("Payment gateway temporarily unavailable")]
    GatewayUnavailable { message: String },

    /// Network/HTTP error reaching the gateway
    #[error("Network error: {0}")]
    Network(String),

    /// Payment signature verification failed
    #[error("Payment signature verification failed")]
    SignatureMismatch,

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaymentError {
    /// Returns true if the caller may retry the same request
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentError::Network(_) | PaymentError::GatewayUnavailable { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::Validation(_) => 400,
            PaymentError::ProductNotFound { .. } => 404,
            PaymentError::AmountBelowMinimum { .. } => 400,
            PaymentError::GatewayAuth => 500,
            PaymentError::GatewayRejected { .. } => 400,
            PaymentError::GatewayUnavailable { .. } => 503,
            PaymentError::Network(_) => 503,
            PaymentError::SignatureMismatch => 400,
            PaymentError::WebhookVerificationFailed(_) => 400,
            PaymentError::WebhookParse(_) => 400,
            PaymentError::Serialization(_) => 500,
            PaymentError::Internal(_) => 500,
        }
    }

    /// Operator-only detail for errors whose display form is sanitized.
    ///
    /// Raw provider messages never reach a caller through `Display`; they
    /// are logged and, outside production, attached as a separate field.
    pub fn detail(&self) -> Option<&str> {
        match self {
            PaymentError::GatewayUnavailable { message } => Some(message),
            PaymentError::ProductNotFound { product_id } => Some(product_id),
            _ => None,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
