//! Checkout Summary Handler

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duka_app::domain::checkout::{Cart, CartLine, CheckoutSummary, DeliveryZone, summarize};

use crate::checkout::errors::into_status_error;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineRequest {
    pub product_uuid: Uuid,
    pub name: String,

    /// Unit price in whole shillings
    pub price: u64,

    pub quantity: u32,
}

/// Checkout Summary Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutSummaryRequest {
    pub items: Vec<CartLineRequest>,

    /// `nairobi` or `outside`
    pub delivery_zone: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutSummaryResponse {
    pub subtotal: u64,
    pub delivery_zone: String,
    pub delivery_fee: u64,

    /// Amount to record on the order
    pub total: u64,
}

impl From<CheckoutSummary> for CheckoutSummaryResponse {
    fn from(summary: CheckoutSummary) -> Self {
        Self {
            subtotal: summary.subtotal,
            delivery_zone: summary.delivery_zone.as_str().to_string(),
            delivery_fee: summary.delivery_fee,
            total: summary.total,
        }
    }
}

/// Checkout Summary Handler
///
/// Prices a cart for the chosen delivery zone.
#[endpoint(
    tags("checkout"),
    summary = "Checkout Summary",
    responses(
        (status_code = StatusCode::OK, description = "Cart priced"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart or unknown delivery zone"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutSummaryRequest>,
) -> Result<Json<CheckoutSummaryResponse>, StatusError> {
    let request = json.into_inner();

    let zone = request
        .delivery_zone
        .parse::<DeliveryZone>()
        .map_err(into_status_error)?;

    let cart = Cart::new(
        request
            .items
            .into_iter()
            .map(|line| CartLine {
                product_uuid: line.product_uuid.into(),
                name: line.name,
                price: line.price,
                quantity: line.quantity,
            })
            .collect(),
    );

    let summary = summarize(&cart, zone).map_err(into_status_error)?;

    Ok(Json(summary.into()))
}
