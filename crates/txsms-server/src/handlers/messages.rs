//! Message handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{AppError, AppState};
use txsms_core::{Outcome, TransactionRecord};

/// Request body for submitting a message
#[derive(Debug, Deserialize)]
pub struct SubmitMessage {
    /// Raw SMS text
    pub m: String,
}

#[derive(Serialize)]
pub struct IgnoredResponse {
    pub status: &'static str,
    pub reason: &'static str,
}

/// GET /v1/messages - List stored records in insertion order
pub async fn list_messages(State(state): State<Arc<AppState>>) -> Json<Vec<TransactionRecord>> {
    Json(state.store.all())
}

/// POST /v1/messages - Parse a forwarded SMS and store the record
///
/// The body is read as JSON whatever the Content-Type header says.
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request: SubmitMessage = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "Rejected malformed message body");
        AppError::bad_request(&format!("Invalid request body: {}", e))
    })?;

    match state.parser.parse(&request.m) {
        Ok(Outcome::NotFinancial) => {
            debug!("Ignored non-financial message");
            Ok(Json(IgnoredResponse {
                status: "ignored",
                reason: "not a bank notification",
            })
            .into_response())
        }
        Ok(Outcome::Transaction { record, date_error }) => {
            let body = serde_json::to_value(&record)?;
            info!(
                bank = %record.bank,
                tx_type = %record.tx_type,
                amount = record.amount,
                date_fallback = date_error.is_some(),
                "Stored transaction"
            );
            state.store.append(record);
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
        Err(e) => {
            warn!(error = %e, "Failed to extract transaction");
            Err(AppError::internal(e.diagnostic()))
        }
    }
}
