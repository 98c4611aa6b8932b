//! Payment signature computation and verification.
//!
//! Razorpay checkout hands the client a signature computed as
//! `HMAC-SHA256(order_id + "|" + payment_id, key_secret)`, hex-encoded.
//! A capture request is only trusted after this signature checks out.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
#[error("failed to compute payment signature")]
pub struct SignatureError;

/// Compute the expected signature for an order/payment pair.
///
/// The payload is order-sensitive: order id first, then payment id,
/// joined by a pipe. Output is lowercase hex with no separators.
pub fn compute_signature(
    order_id: &str,
    payment_id: &str,
    secret: &str,
) -> Result<String, SignatureError> {
    let payload = format!("{}|{}", order_id, payment_id);
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError)?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Recompute the signature and compare it to the caller-supplied one.
pub fn verify(
    order_id: &str,
    payment_id: &str,
    secret: &str,
    supplied: &str,
) -> Result<bool, SignatureError> {
    let expected = compute_signature(order_id, payment_id, secret)?;
    Ok(expected == supplied)
}
