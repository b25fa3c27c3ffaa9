use crate::session::{PaymentSessionStatus, SessionData, WebhookAction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Customer details the host attaches to a new session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Billing address in the host's shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address_1: Option<String>,
    #[serde(default)]
    pub address_2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentContext {
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub billing_address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiatePaymentInput {
    /// Minor currency units.
    pub amount: Decimal,
    pub currency_code: String,
    #[serde(default)]
    pub context: Option<PaymentContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiatePaymentOutput {
    /// Provider-side session id (the order tracking id).
    pub id: String,
    pub data: SessionData,
}

/// Input of every operation that only needs the stored session data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentInput {
    #[serde(default)]
    pub data: SessionData,
}

impl PaymentInput {
    pub fn new(data: SessionData) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundPaymentInput {
    /// Minor currency units.
    pub amount: Decimal,
    #[serde(default)]
    pub data: SessionData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOutput {
    pub data: SessionData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatusOutput {
    pub status: PaymentSessionStatus,
    pub data: SessionData,
}

/// A webhook as the host hands it to the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Parsed query string or body.
    #[serde(default)]
    pub data: SessionData,
    #[serde(default)]
    pub raw_data: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookActionData {
    pub session_id: String,
    /// Minor currency units.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookActionResult {
    pub action: WebhookAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<WebhookActionData>,
}

impl WebhookActionResult {
    pub fn without_data(action: WebhookAction) -> Self {
        Self { action, data: None }
    }
}
