use crate::objects::error::{self, VendorError, VendorResponse};
use crate::objects::lenient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/Transactions/RefundRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundRequest {
    pub confirmation_code: String,
    /// Amount in the major currency unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub username: String,
    pub remarks: String,
}

/// Response of `POST /api/Transactions/RefundRequest`.
///
/// The vendor reports `"200"` for an accepted refund and `"500"` otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundResponse {
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(
        default,
        deserialize_with = "error::present_error",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<VendorError>,
}

impl RefundResponse {
    /// A refund is rejected when the vendor says so explicitly.
    pub fn is_rejected(&self) -> bool {
        self.error.is_some() || self.status.as_deref().is_some_and(|s| s != "200")
    }
}

impl VendorResponse for RefundResponse {
    fn vendor_error(&self) -> Option<&VendorError> {
        self.error.as_ref()
    }

    fn vendor_message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
