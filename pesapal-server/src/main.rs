//! Pesapal Gateway Server
//!
//! Admin configuration endpoints and the IPN webhook receiver for the
//! Pesapal payment provider.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, Overrides};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use state::{AppState, spawn_provider_sync};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Pesapal gateway server - admin configuration and payment notifications
#[derive(Parser, Debug)]
#[command(name = "pesapal-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./pesapal-server.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:9000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Override the path of the gateway credential file
    #[arg(long)]
    gateway_config: Option<PathBuf>,

    /// Public URL of this backend, used to derive the IPN callback URL
    #[arg(long, env = "BACKEND_URL")]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting pesapal-server v{}", env!("CARGO_PKG_VERSION"));

    let overrides = Overrides {
        listen: args.listen,
        gateway_config: args.gateway_config,
        backend_url: args.backend_url,
    };
    let config_loader = Arc::new(ConfigLoader::new(&args.config, overrides));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    let shared_config = loaded_config.into_shared();
    let gateway_file =
        pesapal_core::config::GatewayConfigFile::new(&shared_config.gateway.read().await.config_path);
    let record = match gateway_file.load().await {
        Some(record) => {
            tracing::info!(path = ?gateway_file.path(), "Gateway configuration loaded");
            record
        }
        None => {
            tracing::info!(path = ?gateway_file.path(), "No gateway configuration stored yet");
            Default::default()
        }
    };

    let state = AppState::new(shared_config, record.clone());
    state.refresh_provider(&record).await;
    let _provider_sync = spawn_provider_sync(state.clone());

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    let router = build_router(state);

    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    shutdown_notify.notify_one();
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
