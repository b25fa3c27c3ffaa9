use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use pesapal_core::provider::{PaymentProvider, WebhookPayload};
use pesapal_core::session::{SessionData, WebhookAction};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::state::AppState;

/// Query string of a GET notification.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct IpnQuery {
    #[serde(rename = "OrderTrackingId", default)]
    order_tracking_id: Option<String>,
    #[serde(rename = "OrderMerchantReference", default)]
    order_merchant_reference: Option<String>,
    #[serde(rename = "OrderNotificationType", default)]
    order_notification_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WebhookData {
    #[serde(rename = "OrderTrackingId")]
    order_tracking_id: String,
    #[serde(
        rename = "OrderMerchantReference",
        skip_serializing_if = "Option::is_none"
    )]
    order_merchant_reference: Option<String>,
    timestamp: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct WebhookResponse<T> {
    message: &'static str,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<WebhookAction>,
}

#[derive(Debug)]
pub(crate) enum WebhookError {
    MissingTrackingId,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        match self {
            WebhookError::MissingTrackingId => (
                StatusCode::BAD_REQUEST,
                Json(json!({"message": "Missing OrderTrackingId parameter"})),
            )
                .into_response(),
        }
    }
}

/// `GET /webhook`: IPN notification.
///
/// When a live provider is configured the notification is translated into
/// a session action, which is logged and echoed back.
pub async fn receive_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<IpnQuery>,
) -> Result<impl IntoResponse, WebhookError> {
    let order_tracking_id = query
        .order_tracking_id
        .filter(|id| !id.is_empty())
        .ok_or(WebhookError::MissingTrackingId)?;

    let data = WebhookData {
        order_tracking_id,
        order_merchant_reference: query.order_merchant_reference,
        timestamp: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
    };
    tracing::info!(
        order_tracking_id = %data.order_tracking_id,
        merchant_reference = ?data.order_merchant_reference,
        notification_type = ?query.order_notification_type,
        "Pesapal webhook received"
    );

    let action = match state.live_provider().await {
        Some(provider) => {
            let payload = WebhookPayload {
                data: session_data(&data),
                raw_data: None,
                headers: header_map(&headers),
            };
            // Translation never fails; lookup errors come back as `failed`.
            let result = provider.get_webhook_action_and_data(payload).await.ok();
            if let Some(result) = &result {
                tracing::info!(
                    order_tracking_id = %data.order_tracking_id,
                    action = ?result.action,
                    session_id = ?result.data.as_ref().map(|d| d.session_id.as_str()),
                    "Pesapal webhook translated"
                );
            }
            result.map(|r| r.action)
        }
        None => {
            tracing::debug!("No live Pesapal provider, webhook not translated");
            None
        }
    };

    Ok(Json(WebhookResponse {
        message: "Webhook processed successfully",
        data,
        action,
    }))
}

/// `POST /webhook`: logs and echoes the notification body.
pub async fn receive_post(Json(body): Json<Value>) -> impl IntoResponse {
    tracing::info!(body = %body, "Pesapal POST webhook received");
    Json(WebhookResponse {
        message: "POST webhook processed successfully",
        data: body,
        action: None,
    })
}

fn session_data(data: &WebhookData) -> SessionData {
    let mut session = SessionData::new();
    session.insert("OrderTrackingId".into(), json!(data.order_tracking_id));
    if let Some(reference) = &data.order_merchant_reference {
        session.insert("OrderMerchantReference".into(), json!(reference));
    }
    session
}

fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
