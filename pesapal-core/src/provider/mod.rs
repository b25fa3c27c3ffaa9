//! The host platform's payment-provider contract.
//!
//! The host drives a payment session through these operations and stores
//! whatever session data the provider hands back. Amounts crossing this
//! boundary are in minor currency units.

mod error;
mod options;
mod pesapal;
mod types;

pub use error::{GatewayFailure, ProviderError};
pub use options::{PesapalOptions, WEBHOOK_PATH};
pub use pesapal::PesapalProvider;
pub use types::{
    Address, Customer, InitiatePaymentInput, InitiatePaymentOutput, PaymentContext, PaymentInput,
    PaymentOutput, PaymentStatusOutput, RefundPaymentInput, WebhookActionData,
    WebhookActionResult, WebhookPayload,
};

use async_trait::async_trait;

/// Operations a payment provider exposes to the host.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Identifier the host registers the provider under.
    fn identifier(&self) -> &'static str;

    async fn initiate_payment(
        &self,
        input: InitiatePaymentInput,
    ) -> Result<InitiatePaymentOutput, ProviderError>;

    async fn update_payment(&self, input: PaymentInput) -> Result<PaymentOutput, ProviderError>;

    async fn authorize_payment(
        &self,
        input: PaymentInput,
    ) -> Result<PaymentStatusOutput, ProviderError>;

    async fn capture_payment(&self, input: PaymentInput) -> Result<PaymentOutput, ProviderError>;

    async fn refund_payment(
        &self,
        input: RefundPaymentInput,
    ) -> Result<PaymentOutput, ProviderError>;

    async fn cancel_payment(&self, input: PaymentInput) -> Result<PaymentOutput, ProviderError>;

    async fn delete_payment(&self, input: PaymentInput) -> Result<PaymentOutput, ProviderError>;

    async fn retrieve_payment(&self, input: PaymentInput)
    -> Result<PaymentOutput, ProviderError>;

    /// Poll the current status of a session.
    async fn get_payment_status(
        &self,
        input: PaymentInput,
    ) -> Result<PaymentStatusOutput, ProviderError>;

    /// Translate a provider webhook into a host action.
    async fn get_webhook_action_and_data(
        &self,
        payload: WebhookPayload,
    ) -> Result<WebhookActionResult, ProviderError>;
}
