//! Payment session states and webhook actions of the host platform.

use serde::{Deserialize, Serialize};

/// Untyped session data the host stores alongside a payment session.
pub type SessionData = serde_json::Map<String, serde_json::Value>;

/// State of a payment session as the host understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSessionStatus {
    Pending,
    Authorized,
    Captured,
    Canceled,
    Error,
}

impl PaymentSessionStatus {
    /// Map a Pesapal status code. Unknown or absent codes are errors.
    pub fn from_gateway_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => PaymentSessionStatus::Pending,
            Some(1) => PaymentSessionStatus::Authorized,
            Some(2) => PaymentSessionStatus::Captured,
            Some(3) => PaymentSessionStatus::Canceled,
            _ => PaymentSessionStatus::Error,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentSessionStatus::Pending => "pending",
            PaymentSessionStatus::Authorized => "authorized",
            PaymentSessionStatus::Captured => "captured",
            PaymentSessionStatus::Canceled => "canceled",
            PaymentSessionStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for PaymentSessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the host should do in response to a provider webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookAction {
    Authorized,
    Captured,
    Failed,
    NotSupported,
}

impl From<PaymentSessionStatus> for WebhookAction {
    fn from(status: PaymentSessionStatus) -> Self {
        match status {
            PaymentSessionStatus::Authorized => WebhookAction::Authorized,
            PaymentSessionStatus::Captured => WebhookAction::Captured,
            PaymentSessionStatus::Error => WebhookAction::Failed,
            PaymentSessionStatus::Pending | PaymentSessionStatus::Canceled => {
                WebhookAction::NotSupported
            }
        }
    }
}
