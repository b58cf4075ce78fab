//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duka_app::domain::orders::records::{OrderItemRecord, OrderRecord};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub product_uuid: Uuid,
    pub name: String,
    pub quantity: u32,

    /// Unit price at the time of ordering
    pub price: u64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        Self {
            product_uuid: item.product_uuid.into_uuid(),
            name: item.name,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Short order number shown to customers
    pub reference: String,

    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub delivery_location: String,
    pub items: Vec<OrderItemResponse>,

    /// Items plus delivery fee, in whole shillings
    pub total_amount: u64,
    pub delivery_fee: u64,
    pub payment_method: String,

    /// `pending`, `paid` or `failed`
    pub payment_status: String,

    /// M-Pesa receipt number once paid
    pub transaction_id: Option<String>,

    pub payment_reference: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            reference: order.short_reference(),
            customer_name: order.customer_name,
            email: order.email,
            phone: order.phone,
            delivery_location: order.delivery_location,
            items: order.items.into_iter().map(Into::into).collect(),
            total_amount: order.total_amount,
            delivery_fee: order.delivery_fee,
            payment_method: order.payment_method,
            payment_status: order.payment_status.as_str().to_string(),
            transaction_id: order.transaction_id,
            payment_reference: order.payment_reference,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Get Order Handler
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid admin token"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.admin_or_401()?;

    let order = state
        .app
        .orders
        .get_order(order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
