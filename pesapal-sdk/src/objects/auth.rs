use crate::objects::error::{self, VendorError, VendorResponse};
use crate::objects::lenient;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Body of `POST /api/Auth/RequestToken`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRequest<'a> {
    pub consumer_key: &'a str,
    pub consumer_secret: &'a str,
}

/// Response of `POST /api/Auth/RequestToken`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
    /// ISO-8601 expiry, e.g. `2021-08-26T12:29:30.5177702Z`.
    #[serde(default, rename = "expiryDate")]
    pub expiry_date: Option<String>,
    #[serde(default, deserialize_with = "error::present_error")]
    pub error: Option<VendorError>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl TokenResponse {
    /// The bearer token, if the vendor issued a usable one.
    pub fn usable_token(&self) -> Option<&str> {
        if self.error.is_some() {
            return None;
        }
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// Parse `expiryDate`.
    ///
    /// Accepts RFC 3339 and, as a fallback, the same layout without an
    /// offset (interpreted as UTC).
    pub fn parse_expiry(&self) -> Option<OffsetDateTime> {
        let raw = self.expiry_date.as_deref()?.trim();
        if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
            return Some(parsed);
        }
        let layout = time::format_description::parse(
            "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]",
        )
        .ok()?;
        PrimitiveDateTime::parse(raw, &layout)
            .ok()
            .map(PrimitiveDateTime::assume_utc)
    }
}

impl VendorResponse for TokenResponse {
    fn vendor_error(&self) -> Option<&VendorError> {
        self.error.as_ref()
    }

    fn vendor_message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
