//! # Request Validation
//!
//! Pure validation checks applied before any gateway call.
//! Each function either passes the value through or returns a
//! `PaymentError` naming the offending field.

use crate::error::{PaymentError, PaymentResult};

/// Minimum order amount accepted by the gateway (inclusive),
/// checked against the amount as submitted by the caller.
pub const MIN_ORDER_AMOUNT: f64 = 50.0;

/// Require a string field to be present and non-empty.
pub fn require_non_empty<'a>(field: &str, value: &'a str) -> PaymentResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PaymentError::Validation(format!(
            "Missing required field: {field}"
        )));
    }
    Ok(trimmed)
}

/// Require an optional string field to be present and non-empty.
pub fn require_field<'a>(field: &str, value: Option<&'a str>) -> PaymentResult<&'a str> {
    match value {
        Some(v) => require_non_empty(field, v),
        None => Err(PaymentError::Validation(format!(
            "Missing required field: {field}"
        ))),
    }
}

/// Validate an order amount: finite, positive, and at or above the
/// gateway minimum.
pub fn validate_amount(amount: f64) -> PaymentResult<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(PaymentError::Validation(
            "Amount must be a positive number".to_string(),
        ));
    }
    if amount < MIN_ORDER_AMOUNT {
        return Err(PaymentError::AmountBelowMinimum {
            minimum: MIN_ORDER_AMOUNT as i64,
        });
    }
    Ok(amount)
}
