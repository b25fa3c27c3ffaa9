//! HTTP API handlers.
//!
//! - `admin` – gateway configuration and connection test (admin secret required)
//! - `store` – public webhook receiver for Pesapal IPN callbacks

pub mod admin;
pub mod extractors;
pub mod store;
