pub mod payments;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "payment-gateway",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
