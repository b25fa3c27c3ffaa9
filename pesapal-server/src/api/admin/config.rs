use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pesapal_core::config::ConfigFileError;
use pesapal_sdk::config::{GatewayConfig, MASKED_SECRET};
use serde::Serialize;

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

use super::{CREDENTIALS_REQUIRED, ConfigEnvelope, MessageBody};

#[derive(Debug, Serialize)]
pub(crate) struct ConfigResponse {
    config: GatewayConfig,
}

#[derive(Debug, Serialize)]
pub(crate) struct SavedResponse {
    message: &'static str,
    config: GatewayConfig,
}

#[derive(Debug)]
pub(crate) enum ConfigApiError {
    MissingCredentials,
    InvalidEnvironment,
    Save(ConfigFileError),
}

impl IntoResponse for ConfigApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ConfigApiError::MissingCredentials => (
                StatusCode::BAD_REQUEST,
                MessageBody {
                    message: CREDENTIALS_REQUIRED,
                    error: None,
                },
            ),
            ConfigApiError::InvalidEnvironment => (
                StatusCode::BAD_REQUEST,
                MessageBody {
                    message: "Environment must be either 'sandbox' or 'live'",
                    error: None,
                },
            ),
            ConfigApiError::Save(e) => {
                tracing::error!(error = %e, "Failed to save Pesapal config");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    MessageBody {
                        message: "Failed to save configuration",
                        error: Some(e.to_string()),
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// `GET /config`: the stored record with the secret masked, or the
/// default record when nothing is stored.
pub async fn get_config(State(state): State<AppState>, _auth: AdminAuth) -> impl IntoResponse {
    let record = state
        .gateway_file()
        .await
        .load()
        .await
        .unwrap_or_default();

    Json(ConfigResponse {
        config: record.masked(),
    })
}

/// `POST /config`: validate, persist and activate a gateway record.
///
/// Sending the masked secret back keeps the stored one.
pub async fn save_config(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(ConfigEnvelope { config: input }): Json<ConfigEnvelope>,
) -> Result<impl IntoResponse, ConfigApiError> {
    let file = state.gateway_file().await;

    let consumer_secret = if input.consumer_secret() == MASKED_SECRET {
        file.load()
            .await
            .map(|stored| stored.consumer_secret)
            .unwrap_or_default()
    } else {
        input.consumer_secret().to_string()
    };

    if input.consumer_key().is_empty() || consumer_secret.is_empty() {
        return Err(ConfigApiError::MissingCredentials);
    }
    let environment = input
        .environment()
        .map_err(|_| ConfigApiError::InvalidEnvironment)?;

    let record = input.into_record(consumer_secret, environment);
    file.save(&record).await.map_err(ConfigApiError::Save)?;
    tracing::info!(
        environment = %record.environment,
        enabled = record.enabled,
        "Pesapal configuration saved"
    );

    let masked = record.masked();
    state.gateway.update(record);

    Ok(Json(SavedResponse {
        message: "Configuration saved successfully",
        config: masked,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::extractors::ADMIN_AUTH_HEADER;
    use crate::api::test_support::{json_body, json_request};
    use crate::server::build_router;
    use crate::state::tests::test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use pesapal_core::config::GatewayConfigFile;
    use pesapal_sdk::config::{Environment, GatewayConfig};
    use serde_json::json;
    use tower::ServiceExt;

    const CONFIG_URI: &str = "/admin/custom/pesapal/config";

    fn get_request() -> Request<Body> {
        Request::get(CONFIG_URI)
            .header(ADMIN_AUTH_HEADER, crate::state::tests::ADMIN_SECRET)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_without_stored_record_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let router = build_router(test_state(&dir.path().join("gw.json"), None));

        let response = router.oneshot(get_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "config": {
                    "consumer_key": "",
                    "consumer_secret": "",
                    "environment": "sandbox",
                    "currency": "KES",
                    "merchant_name": "",
                    "ipn_url": "",
                    "enabled": false
                }
            })
        );
    }

    #[tokio::test]
    async fn test_get_masks_stored_secret() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gw.json");
        GatewayConfigFile::new(&path)
            .save(&GatewayConfig {
                consumer_key: "ck".to_string(),
                consumer_secret: "cs".to_string(),
                environment: Environment::Live,
                ..Default::default()
            })
            .await
            .unwrap();
        let router = build_router(test_state(&path, None));

        let body = json_body(router.oneshot(get_request()).await.unwrap()).await;
        assert_eq!(body["config"]["consumer_key"], "ck");
        assert_eq!(body["config"]["consumer_secret"], "****");
        assert_eq!(body["config"]["environment"], "live");
    }

    #[tokio::test]
    async fn test_requires_admin_secret() {
        let dir = tempfile::tempdir().unwrap();
        let router = build_router(test_state(&dir.path().join("gw.json"), None));

        let response = router
            .oneshot(Request::get(CONFIG_URI).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_save_persists_and_updates_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gw.json");
        let state = test_state(&path, None);
        let router = build_router(state.clone());

        let response = router
            .oneshot(json_request(
                "POST",
                CONFIG_URI,
                json!({"config": {
                    "consumer_key": "ck",
                    "consumer_secret": "cs",
                    "environment": "live",
                    "currency": "UGX",
                    "merchant_name": "Duka",
                    "ipn_url": "",
                    "enabled": true
                }}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Configuration saved successfully");
        assert_eq!(body["config"]["consumer_secret"], "****");
        assert_eq!(body["config"]["currency"], "UGX");

        let stored = GatewayConfigFile::new(&path).load().await.unwrap();
        assert_eq!(stored.consumer_secret, "cs");
        assert_eq!(stored.environment, Environment::Live);
        assert!(stored.enabled);
        assert_eq!(state.gateway.snapshot(), stored);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"consumer_key\": \"ck\""));
    }

    #[tokio::test]
    async fn test_masked_secret_keeps_stored_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gw.json");
        GatewayConfigFile::new(&path)
            .save(&GatewayConfig {
                consumer_key: "ck".to_string(),
                consumer_secret: "stored-secret".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let router = build_router(test_state(&path, None));

        let response = router
            .oneshot(json_request(
                "POST",
                CONFIG_URI,
                json!({"config": {
                    "consumer_key": "ck2",
                    "consumer_secret": "****",
                    "environment": "sandbox",
                    "currency": "KES",
                    "enabled": false
                }}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stored = GatewayConfigFile::new(&path).load().await.unwrap();
        assert_eq!(stored.consumer_key, "ck2");
        assert_eq!(stored.consumer_secret, "stored-secret");
    }

    #[tokio::test]
    async fn test_save_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gw.json");
        let router = build_router(test_state(&path, None));

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                CONFIG_URI,
                json!({"config": {"consumer_key": "ck", "consumer_secret": "", "environment": "sandbox"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"message": "Consumer key and consumer secret are required"})
        );

        // A masked secret with nothing stored behind it is no secret at all.
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                CONFIG_URI,
                json!({"config": {"consumer_key": "ck", "consumer_secret": "****", "environment": "sandbox"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = router
            .oneshot(json_request(
                "POST",
                CONFIG_URI,
                json!({"config": {"consumer_key": "ck", "consumer_secret": "cs", "environment": "staging"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"message": "Environment must be either 'sandbox' or 'live'"})
        );

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_save_failure_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("gw.json");
        let router = build_router(test_state(&path, None));

        let response = router
            .oneshot(json_request(
                "POST",
                CONFIG_URI,
                json!({"config": {"consumer_key": "ck", "consumer_secret": "cs", "environment": "sandbox"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Failed to save configuration");
        assert!(body["error"].is_string());
    }
}
