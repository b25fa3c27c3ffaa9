//! HTTP client for the Pesapal v3 API.
//!
//! Only compiled with the `client` feature; the wire types in
//! [`crate::objects`] have no HTTP dependency.

mod pesapal;

pub use pesapal::PesapalClient;

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response, or its body could not be read.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx reply; the raw body is kept for diagnostics.
    #[error("pesapal api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Decode a 2xx reply as `T`, or keep status and body of anything else.
async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        tracing::debug!(%status, "Pesapal returned an error status");
        return Err(ClientError::Api { status, body });
    }
    Ok(serde_json::from_str(&body)?)
}
