//! Request and response bodies exchanged with the Pesapal v3 API.
//!
//! Field names follow the vendor's JSON exactly. Response fields are
//! optional throughout because the vendor omits or nulls them freely,
//! especially on failures.

pub mod auth;
pub mod error;
pub mod ipn;
pub mod lenient;
pub mod order;
pub mod refund;
pub mod transaction;

pub use auth::{TokenRequest, TokenResponse};
pub use error::{VendorError, VendorResponse};
pub use ipn::{IpnNotificationType, IpnRegistration, RegisterIpnRequest};
pub use order::{BillingAddress, SubmitOrderRequest, SubmitOrderResponse};
pub use refund::{RefundRequest, RefundResponse};
pub use transaction::TransactionStatus;
