use crate::objects::error::{self, VendorError, VendorResponse};
use crate::objects::lenient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Response of `GET /api/Transactions/GetTransactionStatus`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionStatus {
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Amount in the major currency unit.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub confirmation_code: Option<String>,
    #[serde(default)]
    pub payment_status_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub payment_account: Option<String>,
    #[serde(default)]
    pub call_back_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_code")]
    pub status_code: Option<i64>,
    #[serde(default)]
    pub merchant_reference: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub payment_status_code: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "error::present_error")]
    pub error: Option<VendorError>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub status: Option<String>,
}

impl TransactionStatus {
    /// The numeric gateway status code.
    ///
    /// `status_code` wins; `payment_status_code` is consulted only when the
    /// numeric field is absent.
    pub fn gateway_code(&self) -> Option<i64> {
        self.status_code.or_else(|| {
            self.payment_status_code
                .as_deref()
                .and_then(|code| code.trim().parse().ok())
        })
    }
}

impl VendorResponse for TransactionStatus {
    fn vendor_error(&self) -> Option<&VendorError> {
        self.error.as_ref()
    }

    fn vendor_message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
