//! Admin API handlers.
//!
//! These endpoints back the admin panel's Pesapal settings page and require
//! the `Pesapal-Admin-Authorization` header with the plaintext admin secret.
//!
//! # Endpoints
//!
//! - `GET  /config` – stored gateway record, secret masked
//! - `POST /config` – validate and persist a gateway record
//! - `POST /test`   – request a token with the submitted credentials

use axum::{
    Router,
    routing::{get, post},
};
use pesapal_sdk::config::{Environment, GatewayConfig, UnknownEnvironment};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

mod config;
mod test_connection;

/// Build the Admin API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/config", get(config::get_config).post(config::save_config))
        .route("/test", post(test_connection::test_connection))
}

// ---------------------------------------------------------------------------
// Shared request types
// ---------------------------------------------------------------------------

pub(crate) const CREDENTIALS_REQUIRED: &str = "Consumer key and consumer secret are required";

/// `{ "config": { ... } }` as sent by the admin panel.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ConfigEnvelope {
    #[serde(default)]
    pub config: ConfigInput,
}

/// A gateway record as submitted: every field may be missing or null.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ConfigInput {
    #[serde(default)]
    pub consumer_key: Option<String>,
    #[serde(default)]
    pub consumer_secret: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub ipn_url: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl ConfigInput {
    pub fn consumer_key(&self) -> &str {
        self.consumer_key.as_deref().unwrap_or_default()
    }

    pub fn consumer_secret(&self) -> &str {
        self.consumer_secret.as_deref().unwrap_or_default()
    }

    pub fn environment(&self) -> Result<Environment, UnknownEnvironment> {
        self.environment.as_deref().unwrap_or_default().parse()
    }

    /// The record this input describes, with `consumer_secret` given
    /// explicitly.
    pub fn into_record(
        self,
        consumer_secret: String,
        environment: Environment,
    ) -> GatewayConfig {
        let defaults = GatewayConfig::default();
        GatewayConfig {
            consumer_key: self.consumer_key.unwrap_or_default(),
            consumer_secret,
            environment,
            currency: self
                .currency
                .filter(|c| !c.is_empty())
                .unwrap_or(defaults.currency),
            merchant_name: self.merchant_name.unwrap_or_default(),
            ipn_url: self.ipn_url.unwrap_or_default(),
            enabled: self.enabled.unwrap_or_default(),
        }
    }
}

/// `{ "message": ... }` body used by the admin error responses.
#[derive(Debug, Serialize)]
pub(crate) struct MessageBody {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
