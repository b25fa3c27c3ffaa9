use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pesapal_sdk::client::{ClientError, PesapalClient};
use pesapal_sdk::objects::VendorResponse;
use serde::Serialize;

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

use super::{CREDENTIALS_REQUIRED, ConfigEnvelope};

#[derive(Debug, Serialize)]
pub(crate) struct TestResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_expires: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug)]
pub(crate) enum TestConnectionError {
    MissingCredentials,
    Rejected(String),
    Request(ClientError),
}

impl IntoResponse for TestConnectionError {
    fn into_response(self) -> Response {
        let (status, message, error) = match self {
            TestConnectionError::MissingCredentials => {
                (StatusCode::BAD_REQUEST, CREDENTIALS_REQUIRED.to_string(), None)
            }
            TestConnectionError::Rejected(reason) => (
                StatusCode::BAD_REQUEST,
                format!("Authentication failed: {reason}"),
                None,
            ),
            TestConnectionError::Request(e) => {
                tracing::error!(error = %e, "Failed to test Pesapal connection");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to test connection".to_string(),
                    Some(e.to_string()),
                )
            }
        };
        let body = TestResponse {
            success: false,
            message,
            token_expires: None,
            error,
        };
        (status, Json(body)).into_response()
    }
}

/// `POST /test`: request a token with the submitted credentials.
///
/// Nothing is stored; an unknown environment is tested against sandbox.
pub async fn test_connection(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(ConfigEnvelope { config: input }): Json<ConfigEnvelope>,
) -> Result<impl IntoResponse, TestConnectionError> {
    if input.consumer_key().is_empty() || input.consumer_secret().is_empty() {
        return Err(TestConnectionError::MissingCredentials);
    }
    let environment = input.environment().unwrap_or_default();

    let client = match state.config.gateway.read().await.api_base_url.clone() {
        Some(base_url) => PesapalClient::with_base_url(base_url),
        None => PesapalClient::new(environment),
    }
    .with_http_client(state.http.clone());

    let response = client
        .request_token(input.consumer_key(), input.consumer_secret())
        .await
        .map_err(TestConnectionError::Request)?;

    if response.usable_token().is_none() {
        let reason = response
            .failure_reason()
            .unwrap_or_else(|| "Invalid credentials".to_string());
        tracing::warn!(environment = %environment, reason = %reason, "Pesapal connection test rejected");
        return Err(TestConnectionError::Rejected(reason));
    }

    tracing::info!(environment = %environment, "Pesapal connection test succeeded");
    Ok(Json(TestResponse {
        success: true,
        message: format!("Successfully connected to Pesapal {environment} environment"),
        token_expires: response.expiry_date,
        error: None,
    }))
}
