//! # Signature Verification
//!
//! HMAC-SHA256 helpers shared by payment verification and webhook
//! handling. Razorpay signs the string `"{order_id}|{payment_id}"` with
//! the key secret for client-side payment confirmation, and the raw
//! webhook body with the webhook secret for server events.

use park_core::{PaymentError, PaymentResult};

/// Compute an HMAC-SHA256 over `message` and return it hex-encoded
pub fn hmac_sha256_hex(secret: &str, message: &[u8]) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time string comparison
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Verify a client-supplied payment signature.
///
/// The expected signature is `HMAC-SHA256("{order_id}|{payment_id}")`
/// keyed with the API key secret. Verification is mandatory; an empty
/// signature never passes.
pub fn verify_payment_signature(
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> PaymentResult<()> {
    if signature.is_empty() {
        return Err(PaymentError::Validation(
            "Missing required field: razorpay_signature".to_string(),
        ));
    }

    let message = format!("{order_id}|{payment_id}");
    let expected = hmac_sha256_hex(key_secret, message.as_bytes());

    if !constant_time_eq(signature, &expected) {
        return Err(PaymentError::SignatureMismatch);
    }

    Ok(())
}
