use crate::objects::error::{self, VendorError, VendorResponse};
use crate::objects::lenient;
use serde::{Deserialize, Serialize};

/// How the vendor should deliver notifications to the registered URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IpnNotificationType {
    Get,
    Post,
}

/// Body of `POST /api/URLSetup/RegisterIPN`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterIpnRequest<'a> {
    pub url: &'a str,
    pub ipn_notification_type: IpnNotificationType,
}

/// An IPN registration, as listed by `GET /api/URLSetup/GetIpnList` and
/// returned by `POST /api/URLSetup/RegisterIPN`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpnRegistration {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub ipn_id: Option<String>,
    #[serde(default)]
    pub ipn_notification_type_description: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_code")]
    pub ipn_status: Option<i64>,
    #[serde(default)]
    pub ipn_status_description: Option<String>,
    #[serde(default, deserialize_with = "error::present_error")]
    pub error: Option<VendorError>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl IpnRegistration {
    /// Whether the registration is currently active.
    pub fn is_active(&self) -> bool {
        let says_active = |s: &Option<String>| {
            s.as_deref()
                .is_some_and(|s| s.trim().eq_ignore_ascii_case("active"))
        };
        self.ipn_status == Some(1)
            || says_active(&self.ipn_status_description)
            || says_active(&self.status)
    }

    /// The IPN id, when non-empty.
    pub fn id(&self) -> Option<&str> {
        self.ipn_id.as_deref().filter(|id| !id.is_empty())
    }
}

impl VendorResponse for IpnRegistration {
    fn vendor_error(&self) -> Option<&VendorError> {
        self.error.as_ref()
    }

    fn vendor_message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
