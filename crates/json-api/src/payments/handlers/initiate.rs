//! Initiate Payment Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use duka_app::{domain::payments::data::NewPaymentIntent, mpesa::StkPushAcknowledgement};

use crate::{extensions::*, payments::errors::into_status_error, state::State};

/// Initiate Payment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InitiatePaymentRequest {
    /// Amount to charge in whole shillings
    pub amount: u64,

    /// Customer phone, `07…`, `+254…` or `254…`
    pub phone: String,

    /// Client-chosen reference the order will quote as `payment_reference`
    pub order_id: String,
}

impl From<InitiatePaymentRequest> for NewPaymentIntent {
    fn from(request: InitiatePaymentRequest) -> Self {
        NewPaymentIntent {
            correlation_id: request.order_id,
            amount: request.amount,
            phone: request.phone,
        }
    }
}

/// The gateway's acknowledgement that the customer was prompted.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InitiatePaymentResponse {
    pub merchant_request_id: String,
    pub checkout_request_id: String,
    pub response_code: String,
    pub response_description: String,
    pub customer_message: String,
}

impl From<StkPushAcknowledgement> for InitiatePaymentResponse {
    fn from(ack: StkPushAcknowledgement) -> Self {
        Self {
            merchant_request_id: ack.merchant_request_id,
            checkout_request_id: ack.checkout_request_id,
            response_code: ack.response_code,
            response_description: ack.response_description,
            customer_message: ack.customer_message,
        }
    }
}

/// Initiate Payment Handler
///
/// Sends an STK push prompt to the customer's phone. The payment result is
/// delivered later through the gateway callback.
#[endpoint(
    tags("payments"),
    summary = "Initiate Payment",
    responses(
        (status_code = StatusCode::OK, description = "Customer prompted"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing or invalid amount, phone or order id"),
        (status_code = StatusCode::CONFLICT, description = "Order id already used"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Gateway did not accept the prompt"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<InitiatePaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<InitiatePaymentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let initiation = state
        .app
        .payments
        .initiate_payment(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(initiation.acknowledgement.into()))
}
