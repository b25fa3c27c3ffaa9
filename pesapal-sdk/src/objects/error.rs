use serde::{Deserialize, Deserializer, Serialize};

/// The `error` member of a vendor response.
///
/// Pesapal sends either a bare string or an object with a type, code and
/// message. A present, non-null value always means the call failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VendorError {
    Detailed {
        #[serde(default)]
        error_type: Option<String>,
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
    Text(String),
}

impl std::fmt::Display for VendorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VendorError::Text(text) => write!(f, "{text}"),
            VendorError::Detailed {
                error_type,
                code,
                message,
            } => {
                let text = message
                    .as_deref()
                    .or(code.as_deref())
                    .or(error_type.as_deref())
                    .unwrap_or("unknown error");
                write!(f, "{text}")
            }
        }
    }
}

impl VendorError {
    /// True when the vendor sent the member but left every part of it empty.
    ///
    /// Successful responses routinely carry
    /// `{"error_type": null, "code": null, "message": null}`.
    pub fn is_blank(&self) -> bool {
        let blank = |part: &Option<String>| part.as_deref().is_none_or(str::is_empty);
        match self {
            VendorError::Text(text) => text.is_empty(),
            VendorError::Detailed {
                error_type,
                code,
                message,
            } => blank(error_type) && blank(code) && blank(message),
        }
    }
}

/// Deserialize an optional `error` member, dropping blank ones.
pub fn present_error<'de, D>(deserializer: D) -> Result<Option<VendorError>, D::Error>
where
    D: Deserializer<'de>,
{
    let error = Option::<VendorError>::deserialize(deserializer)?;
    Ok(error.filter(|e| !e.is_blank()))
}

/// Common accessors for responses that may carry a vendor error.
pub trait VendorResponse {
    fn vendor_error(&self) -> Option<&VendorError>;

    fn vendor_message(&self) -> Option<&str>;

    /// Human readable failure reason: the top-level message first, then the
    /// error member.
    fn failure_reason(&self) -> Option<String> {
        self.vendor_message()
            .filter(|m| !m.is_empty())
            .map(ToOwned::to_owned)
            .or_else(|| self.vendor_error().map(ToString::to_string))
    }
}
