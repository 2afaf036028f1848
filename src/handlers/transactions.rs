//! Transaction proxy handlers.
//!
//! Implements transaction creation and status lookup against the Tripay
//! gateway. Validation and configuration checks run before any network call;
//! the gateway's own status and body are then relayed to the caller
//! unchanged, whatever they are.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::error::AppError;
use crate::services::tripay::{CreateTransactionPayload, GatewayResponse};
use crate::startup::AppState;

/// Transaction expiry window: 24 hours.
const EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Request to create a new Tripay transaction.
///
/// Every field except `method` is mandatory. Fields are modelled as options
/// so absence is reported as a validation failure rather than a
/// deserialization error.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Merchant-supplied unique transaction reference.
    pub merchant_ref: Option<String>,
    /// Amount in smallest currency unit.
    pub amount: Option<u64>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    /// Line items, forwarded to the gateway unchanged.
    pub order_items: Option<serde_json::Value>,
    /// Payment channel code.
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "QRIS2".to_string()
}

/// Query parameters for a transaction status lookup.
#[derive(Debug, Deserialize)]
pub struct CheckTransactionQuery {
    pub reference: Option<String>,
}

/// Create a new transaction via the Tripay gateway.
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<GatewayResponse, AppError> {
    if !state.tripay.is_configured_for_create() {
        tracing::error!("Tripay credentials not configured");
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "TRIPAY_API_KEY, TRIPAY_PRIVATE_KEY and TRIPAY_MERCHANT_CODE must be set"
        )));
    }

    let (
        Some(merchant_ref),
        Some(amount),
        Some(customer_name),
        Some(customer_email),
        Some(customer_phone),
        Some(order_items),
    ) = (
        non_empty(payload.merchant_ref),
        payload.amount.filter(|a| *a > 0),
        non_empty(payload.customer_name),
        non_empty(payload.customer_email),
        non_empty(payload.customer_phone),
        payload.order_items,
    )
    else {
        tracing::warn!("Transaction creation rejected: missing required fields");
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Missing required fields"
        )));
    };

    let expired_time = Utc::now().timestamp() + EXPIRY_SECONDS;
    let signature = state.tripay.signature(&merchant_ref, amount)?;

    let outbound = CreateTransactionPayload {
        method: payload.method,
        merchant_ref,
        amount,
        customer_name,
        customer_email,
        customer_phone,
        order_items,
        expired_time,
        signature,
    };

    tracing::info!(
        merchant_ref = %outbound.merchant_ref,
        amount = outbound.amount,
        method = %outbound.method,
        "Creating Tripay transaction"
    );

    state
        .tripay
        .create_transaction(&outbound)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to reach Tripay");
            AppError::InternalError(e)
        })
}

/// Look up a transaction's status by merchant reference.
pub async fn check_transaction(
    State(state): State<AppState>,
    Query(query): Query<CheckTransactionQuery>,
) -> Result<GatewayResponse, AppError> {
    if !state.tripay.is_configured() {
        tracing::error!("TRIPAY_API_KEY not configured");
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "TRIPAY_API_KEY must be set"
        )));
    }

    let Some(reference) = non_empty(query.reference) else {
        tracing::warn!("Transaction lookup rejected: missing reference");
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Missing required parameter: reference"
        )));
    };

    tracing::info!(reference = %reference, "Checking Tripay transaction");

    state
        .tripay
        .transaction_detail(&reference)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to reach Tripay");
            AppError::InternalError(e)
        })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
