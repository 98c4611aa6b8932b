//! Razorpay gateway client.
//!
//! Implements the two upstream operations the facade needs: order creation
//! and payment lookup, both over Razorpay's basic-auth REST API.

use crate::config::RazorpayConfig;
use crate::services::signature::{self, SignatureError};
use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Orders are always created in INR; multi-currency is out of scope.
const CURRENCY: &str = "INR";

#[derive(Clone)]
pub struct RazorpayClient {
    client: Client,
    config: RazorpayConfig,
}

/// Request to create a Razorpay order.
#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    /// Amount in the smallest currency unit (paise for INR).
    amount: u64,
    currency: &'a str,
    receipt: &'a str,
}

/// Order as returned by the gateway.
#[derive(Debug, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    pub status: String,
    pub receipt: Option<String>,
}

/// Payment record as returned by the gateway.
///
/// The record is an envelope whose `Attributes` member carries the actual
/// payment fields as a JSON-encoded string, which callers parse in a
/// second step.
#[derive(Debug, Deserialize)]
pub struct PaymentEnvelope {
    #[serde(rename = "Attributes")]
    pub attributes: Option<String>,
}

/// Razorpay API error response.
#[derive(Debug, Deserialize)]
struct RazorpayApiError {
    error: RazorpayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorDetail {
    code: String,
    description: String,
}

impl RazorpayClient {
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Key id handed to the checkout frontend. Never the secret.
    pub fn key_id(&self) -> &str {
        &self.config.key_id
    }

    /// Create a new order in Razorpay.
    ///
    /// `amount` is in paise; `receipt` is a caller-generated tracking id.
    pub async fn create_order(&self, amount: u64, receipt: &str) -> Result<RazorpayOrder> {
        let body = CreateOrderBody {
            amount,
            currency: CURRENCY,
            receipt,
        };

        let url = format!("{}/orders", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, "Razorpay create order response");

        if status.is_success() {
            let order: RazorpayOrder = serde_json::from_str(&body)?;
            tracing::info!(
                order_id = %order.id,
                amount = order.amount,
                currency = %order.currency,
                "Razorpay order created"
            );
            Ok(order)
        } else {
            let error: RazorpayApiError =
                serde_json::from_str(&body).unwrap_or_else(|_| RazorpayApiError {
                    error: RazorpayErrorDetail {
                        code: "UNKNOWN".to_string(),
                        description: body.clone(),
                    },
                });
            tracing::error!(
                code = %error.error.code,
                description = %error.error.description,
                "Razorpay order creation failed"
            );
            Err(anyhow!(
                "Razorpay error: {} - {}",
                error.error.code,
                error.error.description
            ))
        }
    }

    /// Fetch a payment by id. Returns `None` when the gateway has no
    /// record of it.
    pub async fn fetch_payment(&self, payment_id: &str) -> Result<Option<PaymentEnvelope>> {
        let url = format!("{}/payments/{}", self.config.api_base_url, payment_id);

        let response = self
            .client
            .get(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.text().await?;

        if status.is_success() {
            let payment: PaymentEnvelope = serde_json::from_str(&body)?;
            Ok(Some(payment))
        } else {
            Err(anyhow!("Failed to fetch Razorpay payment: {}", body))
        }
    }

    /// Verify a payment signature from Razorpay checkout.
    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        supplied: &str,
    ) -> Result<bool, SignatureError> {
        let is_valid = signature::verify(
            order_id,
            payment_id,
            self.config.key_secret.expose_secret(),
            supplied,
        )?;

        if is_valid {
            tracing::info!(order_id, payment_id, "Payment signature verified");
        } else {
            tracing::warn!(order_id, payment_id, "Payment signature verification failed");
        }

        Ok(is_valid)
    }
}
