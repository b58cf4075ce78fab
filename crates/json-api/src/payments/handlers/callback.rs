//! Payment Callback Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use duka_app::{domain::payments::data::CallbackSettlement, mpesa::CallbackEnvelope};

use crate::{extensions::*, observability::observe_payment_callback, state::State};

const PROCESSED: &str = "Callback received and processed successfully.";
const FAILED: &str = "Callback received, transaction failed.";
const RECEIVED: &str = "Callback received.";

/// Acknowledgement returned to the gateway.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CallbackResponse {
    pub message: String,
}

impl CallbackResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Payment Callback Handler
///
/// Receives the STK push result from the gateway. Always answers `200` so
/// the gateway does not retry; unusable payloads are logged and dropped.
#[endpoint(
    tags("payments"),
    summary = "Payment Callback",
    responses(
        (status_code = StatusCode::OK, description = "Callback acknowledged"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CallbackResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let envelope = match req.payload().await {
        Ok(payload) => serde_json::from_slice::<CallbackEnvelope>(payload),
        Err(source) => {
            warn!("failed to read payment callback body: {source}");
            observe_payment_callback("invalid");

            return Ok(CallbackResponse::new(RECEIVED));
        }
    };

    let callback = match envelope {
        Ok(envelope) => envelope.body.stk_callback,
        Err(source) => {
            warn!("ignoring malformed payment callback: {source}");
            observe_payment_callback("invalid");

            return Ok(CallbackResponse::new(RECEIVED));
        }
    };

    let checkout_request_id = callback.checkout_request_id.clone();

    let settlement = match state.app.payments.settle_callback(callback).await {
        Ok(settlement) => settlement,
        Err(source) => {
            error!(
                checkout_request_id = %checkout_request_id,
                "failed to process payment callback: {source}"
            );
            observe_payment_callback("error");

            return Ok(CallbackResponse::new(RECEIVED));
        }
    };

    info!(
        checkout_request_id = %checkout_request_id,
        outcome = settlement.as_str(),
        "payment callback processed"
    );
    observe_payment_callback(settlement.as_str());

    let message = match settlement {
        CallbackSettlement::Paid { .. } => PROCESSED,
        CallbackSettlement::Failed { .. } => FAILED,
        CallbackSettlement::UnknownCheckoutRequest
        | CallbackSettlement::Replayed
        | CallbackSettlement::MissingReceipt
        | CallbackSettlement::PaidAfterExpiry { .. } => RECEIVED,
    };

    Ok(CallbackResponse::new(message))
}
