//! Typed calls against the Pesapal v3 endpoints.
//!
//! Every call except the token request needs a bearer token; obtaining
//! and caching that token is the caller's concern.

use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use url::Url;

use super::{ClientError, parse_response};
use crate::config::Environment;
use crate::objects::{
    IpnNotificationType, IpnRegistration, RefundRequest, RefundResponse, RegisterIpnRequest,
    SubmitOrderRequest, SubmitOrderResponse, TokenRequest, TokenResponse, TransactionStatus,
};

const REQUEST_TOKEN: &str = "/api/Auth/RequestToken";
const SUBMIT_ORDER: &str = "/api/Transactions/SubmitOrderRequest";
const TRANSACTION_STATUS: &str = "/api/Transactions/GetTransactionStatus";
const REFUND_REQUEST: &str = "/api/Transactions/RefundRequest";
const IPN_LIST: &str = "/api/URLSetup/GetIpnList";
const REGISTER_IPN: &str = "/api/URLSetup/RegisterIPN";

/// Typed HTTP client for the Pesapal v3 API.
#[derive(Debug, Clone)]
pub struct PesapalClient {
    http: Client,
    base_url: String,
}

impl PesapalClient {
    /// Client for the fixed base URL of `environment`.
    pub fn new(environment: Environment) -> Self {
        Self {
            http: Client::new(),
            base_url: environment.base_url().to_string(),
        }
    }

    /// Client for an arbitrary base URL (a proxy, or a mock server in tests).
    ///
    /// The URL may carry a path prefix such as `/pesapalv3`; endpoint paths
    /// are appended to it.
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    /// `POST /api/Auth/RequestToken`.
    ///
    /// The vendor reports bad credentials inside a JSON body, sometimes with
    /// a non-2xx status; such bodies are returned rather than turned into
    /// [`ClientError::Api`] so callers can surface the vendor's message.
    pub async fn request_token(
        &self,
        consumer_key: &str,
        consumer_secret: &str,
    ) -> Result<TokenResponse, ClientError> {
        let resp = self
            .http
            .post(self.endpoint(REQUEST_TOKEN)?)
            .header(ACCEPT, "application/json")
            .json(&TokenRequest {
                consumer_key,
                consumer_secret,
            })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        match serde_json::from_str::<TokenResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(ClientError::Api { status, body }),
            Err(e) => Err(ClientError::Json(e)),
        }
    }

    /// `POST /api/Transactions/SubmitOrderRequest`.
    pub async fn submit_order(
        &self,
        token: &str,
        order: &SubmitOrderRequest,
    ) -> Result<SubmitOrderResponse, ClientError> {
        self.post(token, SUBMIT_ORDER, order).await
    }

    /// `GET /api/Transactions/GetTransactionStatus?orderTrackingId=…`.
    pub async fn transaction_status(
        &self,
        token: &str,
        order_tracking_id: &str,
    ) -> Result<TransactionStatus, ClientError> {
        let resp = self
            .http
            .get(self.endpoint(TRANSACTION_STATUS)?)
            .query(&[("orderTrackingId", order_tracking_id)])
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST /api/Transactions/RefundRequest`.
    pub async fn refund(
        &self,
        token: &str,
        refund: &RefundRequest,
    ) -> Result<RefundResponse, ClientError> {
        self.post(token, REFUND_REQUEST, refund).await
    }

    /// `GET /api/URLSetup/GetIpnList`.
    pub async fn ipn_list(&self, token: &str) -> Result<Vec<IpnRegistration>, ClientError> {
        let resp = self
            .http
            .get(self.endpoint(IPN_LIST)?)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST /api/URLSetup/RegisterIPN` with GET delivery.
    pub async fn register_ipn(
        &self,
        token: &str,
        url: &str,
    ) -> Result<IpnRegistration, ClientError> {
        let body = RegisterIpnRequest {
            url,
            ipn_notification_type: IpnNotificationType::Get,
        };
        self.post(token, REGISTER_IPN, &body).await
    }

    async fn post<B, T>(&self, token: &str, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        tracing::debug!(endpoint = path, "Pesapal request");
        let resp = self
            .http
            .post(self.endpoint(path)?)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        parse_response(resp).await
    }
}
