mod common;

use common::TestApp;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

const ORDER_ID: &str = "order_ABC";
const PAYMENT_ID: &str = "pay_123";

async fn capture(app: &TestApp, signature: &str) -> (reqwest::StatusCode, String) {
    let response = reqwest::Client::new()
        .post(format!("{}/api/payments/CapturePayment", app.address))
        .json(&json!({
            "paymentId": PAYMENT_ID,
            "orderId": ORDER_ID,
            "signature": signature
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let body = response.text().await.expect("Failed to read body");
    (status, body)
}

async fn mount_payment(app: &TestApp, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/payments/{}", PAYMENT_ID)))
        .respond_with(response)
        .expect(1)
        .mount(&app.gateway)
        .await;
}

#[tokio::test]
async fn captured_status_is_returned_verbatim() {
    let app = TestApp::spawn().await;
    mount_payment(
        &app,
        ResponseTemplate::new(200).set_body_json(json!({
            "Attributes": r#"{"status":"captured"}"#
        })),
    )
    .await;

    let (status, body) = capture(&app, &TestApp::sign(ORDER_ID, PAYMENT_ID)).await;
    assert_eq!(status, 200);
    assert_eq!(body, "captured");
}

#[tokio::test]
async fn failed_status_is_returned_verbatim() {
    let app = TestApp::spawn().await;
    mount_payment(
        &app,
        ResponseTemplate::new(200).set_body_json(json!({
            "Attributes": r#"{"status":"failed"}"#
        })),
    )
    .await;

    let (status, body) = capture(&app, &TestApp::sign(ORDER_ID, PAYMENT_ID)).await;
    assert_eq!(status, 200);
    assert_eq!(body, "failed");
}

#[tokio::test]
async fn bad_signature_short_circuits_before_fetch() {
    let app = TestApp::spawn().await;

    // Even an existing payment must not be fetched when the signature is bad.
    Mock::given(method("GET"))
        .and(path(format!("/payments/{}", PAYMENT_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Attributes": r#"{"status":"captured"}"#
        })))
        .expect(0)
        .mount(&app.gateway)
        .await;

    let (status, body) = capture(&app, "not-the-right-signature").await;
    assert_eq!(status, 200);
    assert_eq!(body, "Payment verification failed");
}

#[tokio::test]
async fn unknown_payment_reports_not_found() {
    let app = TestApp::spawn().await;
    mount_payment(
        &app,
        ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": "BAD_REQUEST_ERROR",
                "description": "The id provided does not exist"
            }
        })),
    )
    .await;

    let (status, body) = capture(&app, &TestApp::sign(ORDER_ID, PAYMENT_ID)).await;
    assert_eq!(status, 200);
    assert_eq!(body, "Payment not found");
}

#[tokio::test]
async fn missing_attribute_key() {
    let app = TestApp::spawn().await;
    mount_payment(
        &app,
        ResponseTemplate::new(200).set_body_json(json!({ "entity": "payment" })),
    )
    .await;

    let (_, body) = capture(&app, &TestApp::sign(ORDER_ID, PAYMENT_ID)).await;
    assert_eq!(body, "Invalid payment data: attribute missing");
}

#[tokio::test]
async fn empty_attribute_blob() {
    let app = TestApp::spawn().await;
    mount_payment(
        &app,
        ResponseTemplate::new(200).set_body_json(json!({ "Attributes": "" })),
    )
    .await;

    let (_, body) = capture(&app, &TestApp::sign(ORDER_ID, PAYMENT_ID)).await;
    assert_eq!(body, "Attribute is empty");
}

#[tokio::test]
async fn malformed_attribute_blob() {
    let app = TestApp::spawn().await;
    mount_payment(
        &app,
        ResponseTemplate::new(200).set_body_json(json!({ "Attributes": "{bad" })),
    )
    .await;

    let (_, body) = capture(&app, &TestApp::sign(ORDER_ID, PAYMENT_ID)).await;
    assert_eq!(body, "Invalid JSON format in attribute");
}

#[tokio::test]
async fn null_status_reports_unknown() {
    let app = TestApp::spawn().await;
    mount_payment(
        &app,
        ResponseTemplate::new(200).set_body_json(json!({
            "Attributes": r#"{"status":null}"#
        })),
    )
    .await;

    let (_, body) = capture(&app, &TestApp::sign(ORDER_ID, PAYMENT_ID)).await;
    assert_eq!(body, "Unknown Status");
}

#[tokio::test]
async fn absent_status_is_reported() {
    let app = TestApp::spawn().await;
    mount_payment(
        &app,
        ResponseTemplate::new(200).set_body_json(json!({
            "Attributes": r#"{"amount":500,"currency":"INR"}"#
        })),
    )
    .await;

    let (_, body) = capture(&app, &TestApp::sign(ORDER_ID, PAYMENT_ID)).await;
    assert_eq!(body, "Status not found");
}

#[tokio::test]
async fn gateway_fault_never_surfaces_as_http_error() {
    let app = TestApp::spawn().await;
    mount_payment(
        &app,
        ResponseTemplate::new(500).set_body_string("internal gateway failure"),
    )
    .await;

    let (status, body) = capture(&app, &TestApp::sign(ORDER_ID, PAYMENT_ID)).await;
    assert_eq!(status, 200);
    assert_eq!(body, "Payment processing error");
}
