//! Validated runtime configuration shared by handlers.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

/// Admin authentication settings.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    secret_hash: String,
}

impl AdminConfig {
    pub fn new(secret_hash: String) -> Self {
        Self { secret_hash }
    }

    /// Check a plaintext secret against the stored argon2 hash.
    pub fn verify(&self, plaintext: &str) -> bool {
        let Ok(hash) = PasswordHash::new(&self.secret_hash) else {
            tracing::error!("Stored admin secret hash is not a valid PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &hash)
            .is_ok()
    }
}

/// Where the gateway record lives and how the provider is wired.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub config_path: PathBuf,
    pub backend_url: Option<String>,
    pub api_base_url: Option<Url>,
}

/// Shared configuration state with separate locks for each section.
#[derive(Clone)]
pub struct SharedConfig {
    pub server: Arc<RwLock<ServerConfig>>,
    pub admin: Arc<RwLock<AdminConfig>>,
    pub gateway: Arc<RwLock<GatewaySettings>>,
}
