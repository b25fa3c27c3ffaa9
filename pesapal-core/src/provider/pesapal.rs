//! Pesapal implementation of the payment-provider contract.
//!
//! Pesapal has no separate authorize/capture split: a completed payment is
//! already settled, so capture only re-reads the transaction. Cancel,
//! update and delete are bookkeeping on the host side and never reach the
//! vendor.

use async_trait::async_trait;
use pesapal_sdk::client::PesapalClient;
use pesapal_sdk::objects::{
    BillingAddress, IpnRegistration, RefundRequest, SubmitOrderRequest, TransactionStatus,
    VendorResponse,
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use super::types::{Address, Customer};
use super::{
    GatewayFailure, InitiatePaymentInput, InitiatePaymentOutput, PaymentInput, PaymentOutput,
    PaymentProvider, PaymentStatusOutput, PesapalOptions, ProviderError, RefundPaymentInput,
    WebhookActionData, WebhookActionResult, WebhookPayload,
};
use crate::session::{PaymentSessionStatus, SessionData, WebhookAction};
use crate::token::{AuthToken, DEFAULT_TOKEN_TTL, TokenCache};
use crate::utils::amount::{to_json_number, to_major, to_minor};
use crate::utils::reference::new_merchant_reference;

const FALLBACK_EMAIL: &str = "customer@example.com";
const FALLBACK_COUNTRY: &str = "KE";
const FALLBACK_FIRST_NAME: &str = "Customer";

/// Payment provider backed by the Pesapal v3 API.
pub struct PesapalProvider {
    options: PesapalOptions,
    client: PesapalClient,
    tokens: TokenCache,
    ipn_id: OnceCell<String>,
}

impl PesapalProvider {
    pub const IDENTIFIER: &str = "pesapal";

    pub fn new(options: PesapalOptions) -> Result<Self, ProviderError> {
        if options.consumer_key.is_empty() || options.consumer_secret.is_empty() {
            return Err(ProviderError::MissingCredentials);
        }
        let client = match &options.base_url {
            Some(base_url) => PesapalClient::with_base_url(base_url.clone()),
            None => PesapalClient::new(options.environment),
        };
        Ok(Self {
            options,
            client,
            tokens: TokenCache::new(),
            ipn_id: OnceCell::new(),
        })
    }

    /// Replace the default `reqwest::Client`.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.client = self.client.with_http_client(http);
        self
    }

    pub fn options(&self) -> &PesapalOptions {
        &self.options
    }

    /// Bearer token for the next vendor call, reusing the cached one while
    /// it has not expired.
    pub async fn auth_token(&self) -> Result<String, ProviderError> {
        self.tokens
            .get_or_refresh(|| self.request_token())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to get Pesapal auth token");
                ProviderError::Authentication(e)
            })
    }

    async fn request_token(&self) -> Result<AuthToken, GatewayFailure> {
        debug!(environment = %self.options.environment, "Requesting Pesapal auth token");
        let response = self
            .client
            .request_token(&self.options.consumer_key, &self.options.consumer_secret)
            .await?;

        let Some(token) = response.usable_token() else {
            let reason = response
                .failure_reason()
                .unwrap_or_else(|| "no token issued".to_string());
            return Err(GatewayFailure::Rejected(reason));
        };

        let expires_at = response.parse_expiry().unwrap_or_else(|| {
            warn!(
                expiry = ?response.expiry_date,
                "Unparseable Pesapal token expiry, assuming default lifetime"
            );
            OffsetDateTime::now_utc() + DEFAULT_TOKEN_TTL
        });

        Ok(AuthToken {
            token: token.to_string(),
            expires_at,
        })
    }

    /// IPN id for this provider's callback URL.
    ///
    /// Reuses an active registration for the same URL when the vendor has
    /// one, registers the URL otherwise. Resolved once per instance.
    pub async fn ipn_id(&self) -> Result<String, ProviderError> {
        self.ipn_id
            .get_or_try_init(|| self.resolve_ipn_id())
            .await
            .cloned()
            .map_err(|e| {
                error!(error = %e, "Failed to get/register IPN");
                ProviderError::IpnRegistration(e)
            })
    }

    async fn resolve_ipn_id(&self) -> Result<String, GatewayFailure> {
        let callback_url = self
            .options
            .callback_url()
            .ok_or(GatewayFailure::NoCallbackUrl)?;
        let token = self.auth_token().await?;

        let registrations = self.client.ipn_list(&token).await?;
        if let Some(id) = registrations
            .iter()
            .filter(|r| r.url.as_deref() == Some(callback_url.as_str()) && r.is_active())
            .find_map(IpnRegistration::id)
        {
            debug!(ipn_id = id, url = %callback_url, "Reusing registered Pesapal IPN");
            return Ok(id.to_string());
        }

        let registered = self.client.register_ipn(&token, &callback_url).await?;
        if registered.vendor_error().is_some() {
            return Err(GatewayFailure::Rejected(
                registered.failure_reason().unwrap_or_default(),
            ));
        }
        let id = registered
            .id()
            .ok_or_else(|| GatewayFailure::Rejected("no ipn_id returned".to_string()))?;
        info!(ipn_id = id, url = %callback_url, "Registered Pesapal IPN URL");
        Ok(id.to_string())
    }

    async fn transaction_status(
        &self,
        order_tracking_id: &str,
    ) -> Result<TransactionStatus, GatewayFailure> {
        let token = self.auth_token().await?;
        // Failed payments come back with a populated `error` member, so the
        // body is returned as-is and only the status code is interpreted.
        Ok(self
            .client
            .transaction_status(&token, order_tracking_id)
            .await?)
    }

    async fn status_for_session(
        &self,
        data: &SessionData,
    ) -> Result<TransactionStatus, GatewayFailure> {
        let order_tracking_id = order_tracking_id(data)?;
        self.transaction_status(order_tracking_id).await
    }

    async fn submit_order(
        &self,
        input: &InitiatePaymentInput,
    ) -> Result<InitiatePaymentOutput, GatewayFailure> {
        let merchant_reference = new_merchant_reference();
        let callback_url = self
            .options
            .callback_url()
            .ok_or(GatewayFailure::NoCallbackUrl)?;
        let notification_id = self.ipn_id().await?;
        let currency = if input.currency_code.is_empty() {
            self.options.currency.to_uppercase()
        } else {
            input.currency_code.to_uppercase()
        };

        let order = SubmitOrderRequest {
            id: merchant_reference.clone(),
            currency,
            amount: to_major(input.amount),
            description: format!("Payment for order {merchant_reference}"),
            callback_url,
            notification_id,
            billing_address: billing_address(
                input.context.as_ref().and_then(|c| c.customer.as_ref()),
                input.context.as_ref().and_then(|c| c.billing_address.as_ref()),
            ),
        };

        let token = self.auth_token().await?;
        let response = self.client.submit_order(&token, &order).await?;
        if response.vendor_error().is_some() {
            return Err(GatewayFailure::Rejected(
                response.failure_reason().unwrap_or_default(),
            ));
        }
        let order_tracking_id = response
            .order_tracking_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GatewayFailure::Rejected("no order_tracking_id returned".to_string()))?;

        info!(
            order_tracking_id = %order_tracking_id,
            merchant_reference = %merchant_reference,
            "Pesapal order submitted"
        );

        let mut data = SessionData::new();
        data.insert("order_tracking_id".into(), json!(order_tracking_id));
        data.insert(
            "merchant_reference".into(),
            json!(response.merchant_reference.unwrap_or(merchant_reference)),
        );
        data.insert("redirect_url".into(), json!(response.redirect_url));
        data.insert("amount".into(), to_json_number(input.amount));
        data.insert("currency".into(), json!(input.currency_code));
        data.insert(
            "status".into(),
            json!(PaymentSessionStatus::Pending.as_str()),
        );

        Ok(InitiatePaymentOutput {
            id: order_tracking_id,
            data,
        })
    }

    async fn request_refund(
        &self,
        input: &RefundPaymentInput,
    ) -> Result<PaymentOutput, GatewayFailure> {
        let confirmation_code = input
            .data
            .get("confirmation_code")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .ok_or(GatewayFailure::MissingField("confirmation_code"))?;

        let refund = RefundRequest {
            confirmation_code: confirmation_code.to_string(),
            amount: to_major(input.amount),
            username: self.options.refund_username().to_string(),
            remarks: format!("Refund for payment {confirmation_code}"),
        };

        let token = self.auth_token().await?;
        let response = self.client.refund(&token, &refund).await?;
        if response.is_rejected() {
            return Err(GatewayFailure::Rejected(
                response
                    .failure_reason()
                    .unwrap_or_else(|| "refund rejected".to_string()),
            ));
        }
        info!(confirmation_code, amount = %input.amount, "Pesapal refund requested");

        Ok(PaymentOutput {
            data: merged(
                &input.data,
                [
                    ("refund_status", json!("refunded")),
                    ("refund_amount", to_json_number(input.amount)),
                    ("refund_response", serde_json::to_value(&response).unwrap_or_default()),
                ],
            ),
        })
    }

    async fn webhook_action(
        &self,
        payload: &WebhookPayload,
    ) -> Result<WebhookActionResult, GatewayFailure> {
        let Some(order_tracking_id) = payload
            .data
            .get("OrderTrackingId")
            .and_then(value_as_string)
            .filter(|id| !id.is_empty())
        else {
            return Ok(WebhookActionResult::without_data(WebhookAction::NotSupported));
        };

        let status = self.transaction_status(&order_tracking_id).await?;
        let session_status = PaymentSessionStatus::from_gateway_code(status.gateway_code());
        let action = WebhookAction::from(session_status);
        let session_id = payload
            .data
            .get("OrderMerchantReference")
            .and_then(value_as_string)
            .unwrap_or_default();

        debug!(
            order_tracking_id = %order_tracking_id,
            status = %session_status,
            action = ?action,
            "Translated Pesapal webhook"
        );

        let major = status.amount.unwrap_or(Decimal::ZERO);
        let amount = to_minor(major).ok_or(GatewayFailure::AmountOutOfRange(major))?;

        Ok(WebhookActionResult {
            action,
            data: Some(WebhookActionData { session_id, amount }),
        })
    }
}

#[async_trait]
impl PaymentProvider for PesapalProvider {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    async fn initiate_payment(
        &self,
        input: InitiatePaymentInput,
    ) -> Result<InitiatePaymentOutput, ProviderError> {
        self.submit_order(&input).await.map_err(|e| {
            error!(error = %e, "Failed to initiate Pesapal payment");
            ProviderError::Initiate(e)
        })
    }

    async fn update_payment(&self, input: PaymentInput) -> Result<PaymentOutput, ProviderError> {
        Ok(PaymentOutput { data: input.data })
    }

    async fn authorize_payment(
        &self,
        input: PaymentInput,
    ) -> Result<PaymentStatusOutput, ProviderError> {
        let status = self.status_for_session(&input.data).await.map_err(|e| {
            error!(error = %e, "Failed to authorize Pesapal payment");
            ProviderError::Authorize(e)
        })?;
        let session_status = PaymentSessionStatus::from_gateway_code(status.gateway_code());

        Ok(PaymentStatusOutput {
            status: session_status,
            data: merged(
                &input.data,
                [
                    ("payment_status", json!(status.payment_status_description)),
                    ("confirmation_code", json!(status.confirmation_code)),
                    ("payment_method", json!(status.payment_method)),
                    ("payment_account", json!(status.payment_account)),
                    ("status", json!(session_status.as_str())),
                ],
            ),
        })
    }

    async fn capture_payment(&self, input: PaymentInput) -> Result<PaymentOutput, ProviderError> {
        let status = self.status_for_session(&input.data).await.map_err(|e| {
            error!(error = %e, "Failed to capture Pesapal payment");
            ProviderError::Capture(e)
        })?;

        Ok(PaymentOutput {
            data: merged(
                &input.data,
                [
                    ("payment_status", json!(status.payment_status_description)),
                    ("confirmation_code", json!(status.confirmation_code)),
                    ("status", json!(PaymentSessionStatus::Captured.as_str())),
                ],
            ),
        })
    }

    async fn refund_payment(
        &self,
        input: RefundPaymentInput,
    ) -> Result<PaymentOutput, ProviderError> {
        self.request_refund(&input).await.map_err(|e| {
            error!(error = %e, "Failed to refund Pesapal payment");
            ProviderError::Refund(e)
        })
    }

    async fn cancel_payment(&self, input: PaymentInput) -> Result<PaymentOutput, ProviderError> {
        let canceled_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        Ok(PaymentOutput {
            data: merged(
                &input.data,
                [
                    ("status", json!(PaymentSessionStatus::Canceled.as_str())),
                    ("canceled_at", json!(canceled_at)),
                ],
            ),
        })
    }

    async fn delete_payment(&self, input: PaymentInput) -> Result<PaymentOutput, ProviderError> {
        Ok(PaymentOutput { data: input.data })
    }

    async fn retrieve_payment(
        &self,
        input: PaymentInput,
    ) -> Result<PaymentOutput, ProviderError> {
        let status = self.status_for_session(&input.data).await.map_err(|e| {
            error!(error = %e, "Failed to retrieve Pesapal payment");
            ProviderError::Retrieve(e)
        })?;

        Ok(PaymentOutput {
            data: merged(
                &input.data,
                [
                    ("payment_status", json!(status.payment_status_description)),
                    ("confirmation_code", json!(status.confirmation_code)),
                    ("payment_method", json!(status.payment_method)),
                    ("payment_account", json!(status.payment_account)),
                    ("amount", status.amount.map(to_json_number).unwrap_or(Value::Null)),
                    ("currency", json!(status.currency)),
                    ("created_date", json!(status.created_date)),
                ],
            ),
        })
    }

    /// Never fails: any error is logged and reported as `pending`.
    async fn get_payment_status(
        &self,
        input: PaymentInput,
    ) -> Result<PaymentStatusOutput, ProviderError> {
        let status = match self.status_for_session(&input.data).await {
            Ok(status) => status,
            Err(e) => {
                error!(error = %e, "Failed to get Pesapal payment status");
                return Ok(PaymentStatusOutput {
                    status: PaymentSessionStatus::Pending,
                    data: input.data,
                });
            }
        };
        let session_status = PaymentSessionStatus::from_gateway_code(status.gateway_code());

        Ok(PaymentStatusOutput {
            status: session_status,
            data: merged(
                &input.data,
                [
                    ("payment_status", json!(status.payment_status_description)),
                    ("confirmation_code", json!(status.confirmation_code)),
                    ("status", json!(session_status.as_str())),
                ],
            ),
        })
    }

    /// Never fails: lookup errors become [`WebhookAction::Failed`].
    async fn get_webhook_action_and_data(
        &self,
        payload: WebhookPayload,
    ) -> Result<WebhookActionResult, ProviderError> {
        Ok(self.webhook_action(&payload).await.unwrap_or_else(|e| {
            error!(error = %e, "Failed to process Pesapal webhook");
            WebhookActionResult::without_data(WebhookAction::Failed)
        }))
    }
}

/// `order_tracking_id` from session data.
fn order_tracking_id(data: &SessionData) -> Result<&str, GatewayFailure> {
    data.get("order_tracking_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or(GatewayFailure::MissingField("order_tracking_id"))
}

/// Strings pass through, numbers are rendered; anything else is absent.
fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Copy of `base` with `entries` inserted over it.
fn merged<const N: usize>(base: &SessionData, entries: [(&str, Value); N]) -> SessionData {
    let mut data = base.clone();
    for (key, value) in entries {
        data.insert(key.to_string(), value);
    }
    data
}

fn billing_address(customer: Option<&Customer>, address: Option<&Address>) -> BillingAddress {
    let from_address = |pick: fn(&Address) -> &Option<String>| {
        address
            .and_then(|a| pick(a).as_deref())
            .filter(|s| !s.is_empty())
    };
    let from_customer = |pick: fn(&Customer) -> &Option<String>| {
        customer
            .and_then(|c| pick(c).as_deref())
            .filter(|s| !s.is_empty())
    };
    let owned = |value: Option<&str>, fallback: &str| value.unwrap_or(fallback).to_string();

    let postal_code = owned(from_address(|a| &a.postal_code), "");
    let line_2 = owned(from_address(|a| &a.address_2), "");

    BillingAddress {
        email_address: owned(
            from_customer(|c| &c.email).or_else(|| from_address(|a| &a.email)),
            FALLBACK_EMAIL,
        ),
        phone_number: owned(
            from_address(|a| &a.phone).or_else(|| from_customer(|c| &c.phone)),
            "",
        ),
        country_code: owned(from_address(|a| &a.country_code), FALLBACK_COUNTRY),
        first_name: owned(
            from_address(|a| &a.first_name).or_else(|| from_customer(|c| &c.first_name)),
            FALLBACK_FIRST_NAME,
        ),
        middle_name: line_2.clone(),
        last_name: owned(
            from_address(|a| &a.last_name).or_else(|| from_customer(|c| &c.last_name)),
            "",
        ),
        line_1: owned(from_address(|a| &a.address_1), ""),
        line_2,
        city: owned(from_address(|a| &a.city), ""),
        state: owned(from_address(|a| &a.province), ""),
        postal_code: postal_code.clone(),
        zip_code: postal_code,
    }
}
