//! Payment capture flow.
//!
//! A linear sequence: verify the checkout signature, fetch the payment from
//! the gateway, then dig the status out of the payment's `Attributes` blob.
//! Verification runs before the fetch, so a bad signature short-circuits
//! without touching the gateway.

use crate::services::razorpay::{PaymentEnvelope, RazorpayClient};
use serde_json::Value;
use std::fmt;

/// Outcome of a capture attempt.
///
/// A closed set rather than free-form text: callers can only treat
/// `Status("captured")` as a completed payment, never one of the failure
/// variants. The HTTP boundary renders each variant to the status string
/// the public contract promises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The `status` field of the payment attributes, verbatim.
    Status(String),
    VerificationFailed,
    NotFound,
    AttributeMissing,
    AttributeEmpty,
    AttributeMalformed,
    UnknownStatus,
    StatusNotFound,
    ProcessingError,
}

impl fmt::Display for CaptureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CaptureOutcome::Status(status) => status.as_str(),
            CaptureOutcome::VerificationFailed => "Payment verification failed",
            CaptureOutcome::NotFound => "Payment not found",
            CaptureOutcome::AttributeMissing => "Invalid payment data: attribute missing",
            CaptureOutcome::AttributeEmpty => "Attribute is empty",
            CaptureOutcome::AttributeMalformed => "Invalid JSON format in attribute",
            CaptureOutcome::UnknownStatus => "Unknown Status",
            CaptureOutcome::StatusNotFound => "Status not found",
            CaptureOutcome::ProcessingError => "Payment processing error",
        };
        f.write_str(text)
    }
}

/// Capture a payment after checkout.
///
/// Never fails: any unexpected error in the sequence is logged and folded
/// into [`CaptureOutcome::ProcessingError`], so the caller always gets a
/// resolved outcome.
pub async fn capture_payment(
    razorpay: &RazorpayClient,
    payment_id: &str,
    order_id: &str,
    signature: &str,
) -> CaptureOutcome {
    match run(razorpay, payment_id, order_id, signature).await {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(
                payment_id,
                order_id,
                error = %err,
                "Payment capture failed unexpectedly"
            );
            CaptureOutcome::ProcessingError
        }
    }
}

async fn run(
    razorpay: &RazorpayClient,
    payment_id: &str,
    order_id: &str,
    signature: &str,
) -> anyhow::Result<CaptureOutcome> {
    if !razorpay.verify_payment_signature(order_id, payment_id, signature)? {
        return Ok(CaptureOutcome::VerificationFailed);
    }

    let Some(payment) = razorpay.fetch_payment(payment_id).await? else {
        tracing::warn!(payment_id, "Payment not found at gateway");
        return Ok(CaptureOutcome::NotFound);
    };

    Ok(extract_status(payment))
}

/// Pull the payment status out of the envelope's `Attributes` blob.
fn extract_status(payment: PaymentEnvelope) -> CaptureOutcome {
    let Some(raw) = payment.attributes else {
        return CaptureOutcome::AttributeMissing;
    };

    if raw.is_empty() {
        return CaptureOutcome::AttributeEmpty;
    }

    let attributes: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(_) => return CaptureOutcome::AttributeMalformed,
    };

    match attributes.get("status") {
        Some(Value::Null) => CaptureOutcome::UnknownStatus,
        Some(Value::String(status)) => CaptureOutcome::Status(status.clone()),
        Some(other) => CaptureOutcome::Status(other.to_string()),
        None => CaptureOutcome::StatusNotFound,
    }
}
