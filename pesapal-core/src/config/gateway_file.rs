//! JSON file holding the gateway configuration record.

use pesapal_sdk::config::GatewayConfig;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Where the record lives unless configured otherwise.
pub const DEFAULT_GATEWAY_CONFIG_PATH: &str = "./pesapal-config.json";

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to write gateway config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize gateway config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("gateway config writer task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Reads and writes the gateway record at a fixed path.
#[derive(Debug, Clone)]
pub struct GatewayConfigFile {
    path: PathBuf,
}

impl GatewayConfigFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored record.
    ///
    /// A missing, unreadable or malformed file means "nothing stored".
    pub async fn load(&self) -> Option<GatewayConfig> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = ?self.path, error = %e, "Gateway config file unreadable");
                }
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Gateway config file is not valid JSON");
                None
            }
        }
    }

    /// Persist the record as pretty-printed JSON.
    ///
    /// Each call writes its own uniquely named sibling and renames it over
    /// the target, so concurrent saves never share a temporary file.
    pub async fn save(&self, config: &GatewayConfig) -> Result<(), ConfigFileError> {
        let json = serde_json::to_string_pretty(config)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, json.as_bytes())).await??;
        Ok(())
    }
}

fn write_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
