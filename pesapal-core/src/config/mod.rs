//! Shared configuration state and gateway record persistence.

mod config_store;
mod gateway_file;

pub use config_store::{ConfigStore, ConfigWatcher};
pub use gateway_file::{ConfigFileError, DEFAULT_GATEWAY_CONFIG_PATH, GatewayConfigFile};
