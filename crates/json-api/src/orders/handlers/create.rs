//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duka_app::domain::{
    orders::{
        data::{NewOrder, NewOrderItem},
        records::{OrderItemUuid, OrderUuid},
    },
    products::records::ProductUuid,
};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderItemRequest {
    pub product_uuid: Uuid,
    pub name: String,
    pub quantity: u32,

    /// Unit price in whole shillings
    pub price: u64,
}

impl From<CreateOrderItemRequest> for NewOrderItem {
    fn from(item: CreateOrderItemRequest) -> Self {
        NewOrderItem {
            uuid: OrderItemUuid::new(),
            product_uuid: ProductUuid::from_uuid(item.product_uuid),
            name: item.name,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub delivery_location: String,
    pub items: Vec<CreateOrderItemRequest>,

    /// Items plus delivery fee, in whole shillings
    pub total_amount: u64,

    #[serde(default)]
    pub delivery_fee: u64,

    /// The `order_id` used when the payment was initiated
    pub payment_reference: Option<String>,

    /// Receipt number, only honoured in sandbox mode
    pub transaction_id: Option<String>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            uuid: OrderUuid::new(),
            customer_name: request.customer_name,
            email: request.email,
            phone: request.phone,
            delivery_location: request.delivery_location,
            items: request.items.into_iter().map(Into::into).collect(),
            total_amount: request.total_amount,
            delivery_fee: request.delivery_fee,
            payment_reference: request.payment_reference,
            transaction_id: request.transaction_id,
        }
    }
}

/// Create Order Handler
///
/// Records an order against an initiated payment. The payment status comes
/// from the payment itself, never from the request.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order or payment reference"),
        (status_code = StatusCode::CONFLICT, description = "Payment declined or already used"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .create_order(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
