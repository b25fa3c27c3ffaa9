//! Application state shared across all request handlers.

use crate::config::runtime::{GatewaySettings, SharedConfig};
use pesapal_core::config::{ConfigStore, GatewayConfigFile};
use pesapal_core::provider::{PesapalOptions, PesapalProvider};
use pesapal_sdk::config::GatewayConfig;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: SharedConfig,
    /// The stored gateway record; every update rebuilds the live provider.
    pub gateway: ConfigStore<GatewayConfig>,
    /// Provider built from the current record, if it is enabled and complete.
    pub provider: Arc<RwLock<Option<Arc<PesapalProvider>>>>,
    /// Client shared by the provider and the connection test.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: SharedConfig, record: GatewayConfig) -> Self {
        Self {
            config,
            gateway: ConfigStore::new(record),
            provider: Arc::new(RwLock::new(None)),
            http: reqwest::Client::new(),
        }
    }

    /// The gateway record file at the currently configured path.
    pub async fn gateway_file(&self) -> GatewayConfigFile {
        GatewayConfigFile::new(&self.config.gateway.read().await.config_path)
    }

    pub async fn live_provider(&self) -> Option<Arc<PesapalProvider>> {
        self.provider.read().await.clone()
    }

    /// Rebuild the live provider from `record`.
    pub async fn refresh_provider(&self, record: &GatewayConfig) {
        let settings = self.config.gateway.read().await.clone();
        let provider = build_provider(record, &settings, &self.http).map(Arc::new);
        match &provider {
            Some(p) => tracing::info!(
                environment = %p.options().environment,
                "Pesapal provider ready"
            ),
            None => tracing::info!("Pesapal provider disabled"),
        }
        *self.provider.write().await = provider;
    }
}

fn build_provider(
    record: &GatewayConfig,
    settings: &GatewaySettings,
    http: &reqwest::Client,
) -> Option<PesapalProvider> {
    if !record.enabled {
        return None;
    }
    if !record.has_credentials() {
        tracing::warn!("Gateway is enabled but has no consumer key or secret");
        return None;
    }
    let options = PesapalOptions::from_gateway_config(record)
        .with_backend_url(settings.backend_url.clone())
        .with_base_url(settings.api_base_url.clone());
    match PesapalProvider::new(options) {
        Ok(provider) => Some(provider.with_http_client(http.clone())),
        Err(e) => {
            tracing::warn!(error = %e, "Gateway is enabled but cannot be used");
            None
        }
    }
}

/// Keep the live provider in step with the gateway record.
pub fn spawn_provider_sync(state: AppState) -> JoinHandle<()> {
    let mut watcher = state.gateway.subscribe();
    tokio::spawn(async move {
        while let Some(record) = watcher.changed().await {
            state.refresh_provider(&record).await;
        }
        tracing::debug!("Provider sync stopped");
    })
}
