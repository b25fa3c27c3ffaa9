//! Vendor-contract tests for the Pesapal provider against a mock API.

use pesapal_core::provider::{
    InitiatePaymentInput, PaymentContext, PaymentInput, PaymentProvider, PesapalOptions,
    PesapalProvider, ProviderError, RefundPaymentInput, WebhookPayload,
};
use pesapal_core::session::{PaymentSessionStatus, SessionData, WebhookAction};
use rust_decimal::Decimal;
use serde_json::json;
use std::error::Error as _;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CALLBACK_URL: &str = "https://shop.example.com/store/pesapal/webhook";

fn provider_for(server: &MockServer) -> PesapalProvider {
    let options = PesapalOptions {
        consumer_key: "ck_test".to_string(),
        consumer_secret: "cs_test".to_string(),
        currency: "KES".to_string(),
        merchant_name: Some("Duka".to_string()),
        ipn_url: Some(CALLBACK_URL.to_string()),
        ..Default::default()
    }
    .with_base_url(Some(Url::parse(&server.uri()).unwrap()));
    PesapalProvider::new(options).unwrap()
}

fn expiry_in(offset: time::Duration) -> String {
    (OffsetDateTime::now_utc() + offset).format(&Rfc3339).unwrap()
}

async fn mount_token(server: &MockServer, expiry: String, times: u64) {
    Mock::given(method("POST"))
        .and(path("/api/Auth/RequestToken"))
        .and(body_partial_json(json!({
            "consumer_key": "ck_test",
            "consumer_secret": "cs_test"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-1",
            "expiryDate": expiry,
            "error": null,
            "status": "200",
            "message": "Request processed successfully"
        })))
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, tracking_id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/Transactions/GetTransactionStatus"))
        .and(query_param("orderTrackingId", tracking_id))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn status_body(status_code: i64) -> serde_json::Value {
    json!({
        "payment_method": "MpesaKE",
        "amount": 100.5,
        "created_date": "2024-05-01T10:00:00.000",
        "confirmation_code": "QAB1CD2EF3",
        "payment_status_description": "Completed",
        "description": null,
        "message": "Request processed successfully",
        "payment_account": "2547****0001",
        "call_back_url": CALLBACK_URL,
        "status_code": status_code,
        "merchant_reference": "order_1714557600000_abc123xyz",
        "payment_status_code": "",
        "currency": "KES",
        "error": {"error_type": null, "code": null, "message": null, "call_back_url": null},
        "status": "200"
    })
}

fn session(tracking_id: &str) -> SessionData {
    let mut data = SessionData::new();
    data.insert("order_tracking_id".into(), json!(tracking_id));
    data.insert("merchant_reference".into(), json!("order_1714557600000_abc123xyz"));
    data
}

#[tokio::test]
async fn test_initiate_registers_ipn_and_submits_order() {
    let server = MockServer::start().await;
    mount_token(&server, expiry_in(time::Duration::minutes(5)), 1).await;

    Mock::given(method("GET"))
        .and(path("/api/URLSetup/GetIpnList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"url": "https://elsewhere.example.com/ipn", "ipn_id": "other", "ipn_status": 1, "ipn_status_description": "Active"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/URLSetup/RegisterIPN"))
        .and(body_partial_json(json!({
            "url": CALLBACK_URL,
            "ipn_notification_type": "GET"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": CALLBACK_URL,
            "created_date": "2024-05-01T10:00:00.000Z",
            "ipn_id": "ipn-new",
            "error": null,
            "status": "200"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/Transactions/SubmitOrderRequest"))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_partial_json(json!({
            "currency": "KES",
            "amount": 125.5,
            "callback_url": CALLBACK_URL,
            "notification_id": "ipn-new",
            "billing_address": {
                "email_address": "buyer@example.com",
                "country_code": "KE",
                "first_name": "Customer"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "order_tracking_id": "b945e4af-80a5-4ec1-8706-e03f8332fb04",
            "merchant_reference": "order_1714557600000_abc123xyz",
            "redirect_url": "https://cybqa.pesapal.com/iframe/PesapalIframe3/Index?OrderTrackingId=b945e4af",
            "error": null,
            "status": "200"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let output = provider
        .initiate_payment(InitiatePaymentInput {
            amount: Decimal::from(12550),
            currency_code: "kes".to_string(),
            context: Some(PaymentContext {
                customer: Some(pesapal_core::provider::Customer {
                    email: Some("buyer@example.com".to_string()),
                    ..Default::default()
                }),
                billing_address: None,
            }),
        })
        .await
        .unwrap();

    assert_eq!(output.id, "b945e4af-80a5-4ec1-8706-e03f8332fb04");
    assert_eq!(output.data["order_tracking_id"], output.id.as_str());
    assert_eq!(output.data["merchant_reference"], "order_1714557600000_abc123xyz");
    assert_eq!(output.data["amount"], 12550);
    assert_eq!(output.data["currency"], "kes");
    assert_eq!(output.data["status"], "pending");
    assert!(
        output.data["redirect_url"]
            .as_str()
            .unwrap()
            .contains("OrderTrackingId")
    );
}

#[tokio::test]
async fn test_active_ipn_is_reused_and_resolved_once() {
    let server = MockServer::start().await;
    mount_token(&server, expiry_in(time::Duration::minutes(5)), 1).await;

    Mock::given(method("GET"))
        .and(path("/api/URLSetup/GetIpnList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"url": CALLBACK_URL, "ipn_id": "ipn-inactive", "ipn_status": 0, "ipn_status_description": "Inactive"},
            {"url": CALLBACK_URL, "ipn_id": "ipn-existing", "ipn_status": 1, "ipn_status_description": "Active"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/URLSetup/RegisterIPN"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    assert_eq!(provider.ipn_id().await.unwrap(), "ipn-existing");
    assert_eq!(provider.ipn_id().await.unwrap(), "ipn-existing");
}

#[tokio::test]
async fn test_unexpired_token_is_reused() {
    let server = MockServer::start().await;
    mount_token(&server, expiry_in(time::Duration::minutes(5)), 1).await;
    mount_status(&server, "track-1", status_body(1)).await;

    let provider = provider_for(&server);
    provider
        .authorize_payment(PaymentInput::new(session("track-1")))
        .await
        .unwrap();
    provider
        .retrieve_payment(PaymentInput::new(session("track-1")))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_expired_token_is_refreshed() {
    let server = MockServer::start().await;
    mount_token(&server, expiry_in(time::Duration::minutes(-1)), 2).await;
    mount_status(&server, "track-1", status_body(1)).await;

    let provider = provider_for(&server);
    for _ in 0..2 {
        provider
            .authorize_payment(PaymentInput::new(session("track-1")))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_authorize_maps_gateway_codes() {
    let cases = [
        (0, PaymentSessionStatus::Pending),
        (1, PaymentSessionStatus::Authorized),
        (2, PaymentSessionStatus::Captured),
        (3, PaymentSessionStatus::Canceled),
        (7, PaymentSessionStatus::Error),
    ];

    for (code, expected) in cases {
        let server = MockServer::start().await;
        mount_token(&server, expiry_in(time::Duration::minutes(5)), 1).await;
        mount_status(&server, "track-1", status_body(code)).await;

        let output = provider_for(&server)
            .authorize_payment(PaymentInput::new(session("track-1")))
            .await
            .unwrap();
        assert_eq!(output.status, expected, "status code {code}");
        assert_eq!(output.data["status"], expected.as_str());
        assert_eq!(output.data["confirmation_code"], "QAB1CD2EF3");
        assert_eq!(output.data["payment_method"], "MpesaKE");
        assert_eq!(output.data["payment_status"], "Completed");
        assert_eq!(output.data["merchant_reference"], "order_1714557600000_abc123xyz");
    }
}

#[tokio::test]
async fn test_capture_and_retrieve_merge_vendor_fields() {
    let server = MockServer::start().await;
    mount_token(&server, expiry_in(time::Duration::minutes(5)), 1).await;
    mount_status(&server, "track-1", status_body(2)).await;
    let provider = provider_for(&server);

    let captured = provider
        .capture_payment(PaymentInput::new(session("track-1")))
        .await
        .unwrap();
    assert_eq!(captured.data["status"], "captured");
    assert_eq!(captured.data["confirmation_code"], "QAB1CD2EF3");

    let retrieved = provider
        .retrieve_payment(PaymentInput::new(session("track-1")))
        .await
        .unwrap();
    assert_eq!(retrieved.data["amount"], 100.5);
    assert_eq!(retrieved.data["currency"], "KES");
    assert_eq!(retrieved.data["payment_account"], "2547****0001");
    assert_eq!(retrieved.data["created_date"], "2024-05-01T10:00:00.000");
}

#[tokio::test]
async fn test_status_poll_swallows_vendor_failures() {
    let server = MockServer::start().await;
    mount_token(&server, expiry_in(time::Duration::minutes(5)), 1).await;
    Mock::given(method("GET"))
        .and(path("/api/Transactions/GetTransactionStatus"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let data = session("track-1");
    let output = provider_for(&server)
        .get_payment_status(PaymentInput::new(data.clone()))
        .await
        .unwrap();
    assert_eq!(output.status, PaymentSessionStatus::Pending);
    assert_eq!(output.data, data);
}

#[tokio::test]
async fn test_status_poll_reports_mapped_state() {
    let server = MockServer::start().await;
    mount_token(&server, expiry_in(time::Duration::minutes(5)), 1).await;
    mount_status(&server, "track-1", status_body(3)).await;

    let output = provider_for(&server)
        .get_payment_status(PaymentInput::new(session("track-1")))
        .await
        .unwrap();
    assert_eq!(output.status, PaymentSessionStatus::Canceled);
    assert_eq!(output.data["status"], "canceled");
}

#[tokio::test]
async fn test_webhook_translates_to_action_with_minor_amount() {
    let server = MockServer::start().await;
    mount_token(&server, expiry_in(time::Duration::minutes(5)), 1).await;
    mount_status(&server, "track-1", status_body(1)).await;

    let mut data = SessionData::new();
    data.insert("OrderTrackingId".into(), json!("track-1"));
    data.insert("OrderMerchantReference".into(), json!("order_1714557600000_abc123xyz"));

    let result = provider_for(&server)
        .get_webhook_action_and_data(WebhookPayload {
            data,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(result.action, WebhookAction::Authorized);
    let action_data = result.data.unwrap();
    assert_eq!(action_data.session_id, "order_1714557600000_abc123xyz");
    assert_eq!(action_data.amount, Decimal::from(10050));
}

#[tokio::test]
async fn test_webhook_lookup_failure_is_failed_action() {
    let server = MockServer::start().await;
    mount_token(&server, expiry_in(time::Duration::minutes(5)), 1).await;
    Mock::given(method("GET"))
        .and(path("/api/Transactions/GetTransactionStatus"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut data = SessionData::new();
    data.insert("OrderTrackingId".into(), json!("missing"));

    let result = provider_for(&server)
        .get_webhook_action_and_data(WebhookPayload {
            data,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(result.action, WebhookAction::Failed);
    assert!(result.data.is_none());
}

#[tokio::test]
async fn test_oversized_webhook_amount_is_failed_action() {
    let server = MockServer::start().await;
    mount_token(&server, expiry_in(time::Duration::minutes(5)), 1).await;
    let mut body = status_body(1);
    body["amount"] = json!(1e27);
    mount_status(&server, "track-big", body).await;

    let mut data = SessionData::new();
    data.insert("OrderTrackingId".into(), json!("track-big"));
    data.insert("OrderMerchantReference".into(), json!("order_1714557600000_abc123xyz"));

    let result = provider_for(&server)
        .get_webhook_action_and_data(WebhookPayload {
            data,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(result.action, WebhookAction::Failed);
    assert!(result.data.is_none());
}

#[tokio::test]
async fn test_refund_sends_major_units_and_merchant_name() {
    let server = MockServer::start().await;
    mount_token(&server, expiry_in(time::Duration::minutes(5)), 1).await;
    Mock::given(method("POST"))
        .and(path("/api/Transactions/RefundRequest"))
        .and(body_partial_json(json!({
            "confirmation_code": "QAB1CD2EF3",
            "amount": 50.25,
            "username": "Duka",
            "remarks": "Refund for payment QAB1CD2EF3"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "200",
            "message": "Refund request successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = session("track-1");
    data.insert("confirmation_code".into(), json!("QAB1CD2EF3"));
    let output = provider_for(&server)
        .refund_payment(RefundPaymentInput {
            amount: Decimal::from(5025),
            data,
        })
        .await
        .unwrap();
    assert_eq!(output.data["refund_status"], "refunded");
    assert_eq!(output.data["refund_amount"], 5025);
    assert_eq!(output.data["refund_response"]["status"], "200");
    assert_eq!(output.data["order_tracking_id"], "track-1");
}

#[tokio::test]
async fn test_rejected_refund_is_an_error() {
    let server = MockServer::start().await;
    mount_token(&server, expiry_in(time::Duration::minutes(5)), 1).await;
    Mock::given(method("POST"))
        .and(path("/api/Transactions/RefundRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "500",
            "message": "Refund amount exceeds the paid amount"
        })))
        .mount(&server)
        .await;

    let mut data = session("track-1");
    data.insert("confirmation_code".into(), json!("QAB1CD2EF3"));
    let err = provider_for(&server)
        .refund_payment(RefundPaymentInput {
            amount: Decimal::from(999_999),
            data,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Refund(_)));
    assert_eq!(err.to_string(), "failed to refund payment");
}

#[tokio::test]
async fn test_bad_credentials_fail_initiate_with_fixed_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Auth/RequestToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": null,
            "expiryDate": null,
            "error": {"error_type": "api_error", "code": "invalid_consumer_key_or_secret_provided", "message": ""},
            "status": "500",
            "message": "Invalid consumer key or secret"
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .initiate_payment(InitiatePaymentInput {
            amount: Decimal::from(1000),
            currency_code: "KES".to_string(),
            context: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Initiate(_)));
    assert_eq!(err.to_string(), "failed to initiate payment");

    let mut chain = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    assert!(chain.iter().any(|m| m == "failed to authenticate with Pesapal"));
    assert!(chain.iter().any(|m| m.contains("Invalid consumer key or secret")));
}

#[tokio::test]
async fn test_authorize_without_tracking_id_does_not_call_vendor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Auth/RequestToken"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .authorize_payment(PaymentInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Authorize(_)));
}
