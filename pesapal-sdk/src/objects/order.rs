use crate::objects::error::{self, VendorError, VendorResponse};
use crate::objects::lenient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/Transactions/SubmitOrderRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOrderRequest {
    /// Merchant reference, unique per payment attempt.
    pub id: String,
    pub currency: String,
    /// Amount in the major currency unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub callback_url: String,
    pub notification_id: String,
    pub billing_address: BillingAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
    pub email_address: String,
    pub phone_number: String,
    pub country_code: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub line_1: String,
    pub line_2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub zip_code: String,
}

/// Response of `POST /api/Transactions/SubmitOrderRequest`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOrderResponse {
    #[serde(default)]
    pub order_tracking_id: Option<String>,
    #[serde(default)]
    pub merchant_reference: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default, deserialize_with = "error::present_error")]
    pub error: Option<VendorError>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl VendorResponse for SubmitOrderResponse {
    fn vendor_error(&self) -> Option<&VendorError> {
        self.error.as_ref()
    }

    fn vendor_message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
