use pesapal_sdk::config::{Environment, GatewayConfig};
use url::Url;

/// Path the server mounts the webhook receiver on.
pub const WEBHOOK_PATH: &str = "/store/pesapal/webhook";

const DEFAULT_REFUND_USERNAME: &str = "merchant";

/// Settings a [`PesapalProvider`](super::PesapalProvider) is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PesapalOptions {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub environment: Environment,
    /// Fallback when the host does not send a currency code.
    pub currency: String,
    pub merchant_name: Option<String>,
    pub ipn_url: Option<String>,
    /// Public URL of this backend; the callback URL is derived from it when
    /// no `ipn_url` is set.
    pub backend_url: Option<String>,
    /// Overrides the environment's base URL.
    pub base_url: Option<Url>,
}

impl PesapalOptions {
    pub fn from_gateway_config(config: &GatewayConfig) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
            environment: config.environment,
            currency: config.currency.clone(),
            merchant_name: non_empty(&config.merchant_name),
            ipn_url: non_empty(&config.ipn_url),
            backend_url: None,
            base_url: None,
        }
    }

    pub fn with_backend_url(mut self, backend_url: Option<String>) -> Self {
        self.backend_url = backend_url.filter(|u| !u.is_empty());
        self
    }

    pub fn with_base_url(mut self, base_url: Option<Url>) -> Self {
        self.base_url = base_url;
        self
    }

    /// URL the vendor redirects to and notifies.
    pub fn callback_url(&self) -> Option<String> {
        if let Some(ipn_url) = self.ipn_url.as_deref().filter(|u| !u.is_empty()) {
            return Some(ipn_url.to_string());
        }
        self.backend_url
            .as_deref()
            .map(|backend| format!("{}{}", backend.trim_end_matches('/'), WEBHOOK_PATH))
    }

    /// Name sent as `username` on refund requests.
    pub fn refund_username(&self) -> &str {
        self.merchant_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_REFUND_USERNAME)
    }
}
