//! Tripay payment gateway client.
//!
//! Implements Tripay's transaction API for payment creation and status
//! lookup, with HMAC-SHA256 request signing.

use crate::config::TripayConfig;
use anyhow::{anyhow, Result};
use axum::response::{IntoResponse, Response};
use axum::Json;
use hmac::{Hmac, Mac};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use sha2::Sha256;

/// Tripay client for interacting with the Tripay API.
#[derive(Clone)]
pub struct TripayClient {
    client: Client,
    config: TripayConfig,
}

/// Outbound payload for Tripay's transaction-creation endpoint.
#[derive(Debug, Serialize)]
pub struct CreateTransactionPayload {
    /// Payment channel code (e.g., "QRIS2").
    pub method: String,
    /// Merchant-supplied unique transaction reference.
    pub merchant_ref: String,
    /// Amount in smallest currency unit.
    pub amount: u64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    /// Line items, forwarded to the gateway unchanged.
    pub order_items: serde_json::Value,
    /// Expiry timestamp in unix seconds.
    pub expired_time: i64,
    /// HMAC-SHA256 digest authenticating the payload.
    pub signature: String,
}

/// Verbatim gateway answer: upstream status plus upstream body.
///
/// A 4xx/5xx from Tripay is still a successful transport outcome and is
/// relayed to the caller unchanged; only transport failures are errors.
#[derive(Debug)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl TripayClient {
    /// Create a new Tripay client.
    pub fn new(config: TripayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Check if the API key is set. Status lookups need nothing else.
    pub fn is_configured(&self) -> bool {
        !self.config.api_key.expose_secret().is_empty()
    }

    /// Check if every credential needed to create transactions is set.
    pub fn is_configured_for_create(&self) -> bool {
        self.is_configured()
            && !self.config.private_key.expose_secret().is_empty()
            && !self.config.merchant_code.is_empty()
    }

    /// Compute the transaction-creation signature.
    ///
    /// The signature is computed as:
    /// `HMAC-SHA256(merchant_code + merchant_ref + amount, private_key)`
    /// and rendered as lowercase hex.
    pub fn signature(&self, merchant_ref: &str, amount: u64) -> Result<String> {
        let payload = format!("{}{}{}", self.config.merchant_code, merchant_ref, amount);
        compute_signature(&payload, self.config.private_key.expose_secret())
    }

    /// Create a new transaction in Tripay.
    pub async fn create_transaction(
        &self,
        payload: &CreateTransactionPayload,
    ) -> Result<GatewayResponse> {
        let url = format!("{}/transaction/create", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(payload)
            .send()
            .await?;

        self.capture(response).await
    }

    /// Fetch transaction details by merchant reference.
    pub async fn transaction_detail(&self, reference: &str) -> Result<GatewayResponse> {
        let url = format!("{}/transaction/detail", self.config.api_base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("reference", reference)])
            .bearer_auth(self.config.api_key.expose_secret())
            .send()
            .await?;

        self.capture(response).await
    }

    async fn capture(&self, response: reqwest::Response) -> Result<GatewayResponse> {
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(status = %status, body = %text, "Tripay response");

        // Tripay answers its errors with a JSON body too; anything that does
        // not parse is relayed as a JSON string.
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));

        Ok(GatewayResponse { status, body })
    }
}

/// Compute an HMAC-SHA256 signature as lowercase hex.
fn compute_signature(payload: &str, secret: &str) -> Result<String> {
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| anyhow!("Invalid key length"))?;
    mac.update(payload.as_bytes());
    let result = mac.finalize();
    Ok(hex::encode(result.into_bytes()))
}
