//! Configuration types shared by the connector crates.
//!
//! The gateway record is what the admin panel edits and what the server
//! persists to disk; the environment decides which vendor host is used.

mod environment;
mod gateway;

pub use environment::{Environment, UnknownEnvironment};
pub use gateway::{GatewayConfig, MASKED_SECRET};
