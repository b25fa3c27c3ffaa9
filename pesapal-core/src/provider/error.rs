use pesapal_sdk::client::ClientError;
use thiserror::Error;

/// Errors surfaced to the host. Each carries a fixed message; the cause
/// is available through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("pesapal consumer_key and consumer_secret are required")]
    MissingCredentials,

    #[error("failed to authenticate with Pesapal")]
    Authentication(#[source] GatewayFailure),

    #[error("failed to set up IPN registration")]
    IpnRegistration(#[source] GatewayFailure),

    #[error("failed to initiate payment")]
    Initiate(#[source] GatewayFailure),

    #[error("failed to authorize payment")]
    Authorize(#[source] GatewayFailure),

    #[error("failed to capture payment")]
    Capture(#[source] GatewayFailure),

    #[error("failed to refund payment")]
    Refund(#[source] GatewayFailure),

    #[error("failed to retrieve payment")]
    Retrieve(#[source] GatewayFailure),
}

/// Why a vendor interaction failed.
#[derive(Debug, Error)]
pub enum GatewayFailure {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("pesapal rejected the request: {0}")]
    Rejected(String),

    #[error("session data has no {0}")]
    MissingField(&'static str),

    #[error("amount {0} is out of range")]
    AmountOutOfRange(rust_decimal::Decimal),

    #[error("no callback url: set ipn_url or a backend url")]
    NoCallbackUrl,

    #[error(transparent)]
    Provider(Box<ProviderError>),
}

impl From<ProviderError> for GatewayFailure {
    fn from(err: ProviderError) -> Self {
        GatewayFailure::Provider(Box::new(err))
    }
}
