//! Pesapal SDK
//!
//! Wire types for the Pesapal v3 payments API, the persisted gateway
//! configuration record, and (behind the `client` feature) a typed HTTP
//! client for the vendor endpoints.

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod objects;
