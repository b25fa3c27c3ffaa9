use crate::config::Environment;
use serde::{Deserialize, Serialize};

/// Placeholder shown instead of a stored consumer secret.
pub const MASKED_SECRET: &str = "****";

/// The flat gateway configuration record persisted by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub consumer_key: String,
    #[serde(default)]
    pub consumer_secret: String,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub merchant_name: String,
    #[serde(default)]
    pub ipn_url: String,
    #[serde(default)]
    pub enabled: bool,
}

fn default_currency() -> String {
    "KES".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            consumer_key: String::new(),
            consumer_secret: String::new(),
            environment: Environment::Sandbox,
            currency: default_currency(),
            merchant_name: String::new(),
            ipn_url: String::new(),
            enabled: false,
        }
    }
}

impl GatewayConfig {
    /// Both consumer credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.consumer_key.is_empty() && !self.consumer_secret.is_empty()
    }

    /// Copy safe to hand to clients: a non-empty secret becomes
    /// [`MASKED_SECRET`], an empty one stays empty.
    pub fn masked(&self) -> Self {
        let consumer_secret = if self.consumer_secret.is_empty() {
            String::new()
        } else {
            MASKED_SECRET.to_string()
        };
        Self {
            consumer_secret,
            ..self.clone()
        }
    }
}
