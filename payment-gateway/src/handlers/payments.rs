//! Payment handlers: order creation and payment capture.

use anyhow::anyhow;
use axum::{extract::State, Json};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, services, AppState};

/// Request to create a new payment order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount in whole currency units (rupees), e.g. `100.00`.
    pub amount: Decimal,
}

/// Response after creating an order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    /// Razorpay order id (use this in frontend checkout).
    pub order_id: String,
    /// Razorpay key id (for frontend initialization).
    pub razorpay_key: String,
    /// Amount as submitted by the caller.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Request to capture a payment after checkout.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturePaymentRequest {
    pub payment_id: String,
    pub order_id: String,
    pub signature: String,
}

/// Create a new order at the gateway.
///
/// The amount is validated before any upstream call; each order gets a
/// fresh receipt id, so repeated calls create distinct upstream orders.
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    if payload.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest(anyhow!(
            "Amount must be greater than zero"
        )));
    }

    let paise = to_paise(payload.amount)
        .ok_or_else(|| AppError::BadRequest(anyhow!("Amount is out of range")))?;
    let receipt = Uuid::new_v4().to_string();

    tracing::info!(amount = %payload.amount, receipt = %receipt, "Creating Razorpay order");

    let order = state
        .razorpay
        .create_order(paise, &receipt)
        .await
        .map_err(AppError::UpstreamError)?;

    Ok(Json(OrderResponse {
        order_id: order.id,
        razorpay_key: state.razorpay.key_id().to_string(),
        amount: payload.amount,
    }))
}

/// Capture a payment after Razorpay checkout completion.
///
/// Always responds 200 with a plain-text status string; failures are
/// reported as sentinel statuses in the body, not as HTTP errors.
pub async fn capture_payment(
    State(state): State<AppState>,
    Json(payload): Json<CapturePaymentRequest>,
) -> String {
    tracing::info!(
        payment_id = %payload.payment_id,
        order_id = %payload.order_id,
        "Capturing Razorpay payment"
    );

    let outcome = services::capture_payment(
        &state.razorpay,
        &payload.payment_id,
        &payload.order_id,
        &payload.signature,
    )
    .await;

    tracing::info!(
        payment_id = %payload.payment_id,
        outcome = %outcome,
        "Payment capture completed"
    );

    outcome.to_string()
}

/// Convert whole currency units to paise, truncating toward zero.
/// Returns `None` when the amount does not fit, including when the
/// multiplication itself would overflow.
fn to_paise(amount: Decimal) -> Option<u64> {
    amount.checked_mul(Decimal::from(100))?.trunc().to_u64()
}
