//! Order Records

use jiff::Timestamp;

use crate::{
    domain::{payments::records::PaymentStatus, products::records::ProductUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// The only payment method orders are taken with.
pub const PAYMENT_METHOD_MPESA: &str = "M-Pesa";

/// Order Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub delivery_location: String,
    pub items: Vec<OrderItemRecord>,

    /// Items plus delivery fee, in whole shillings.
    pub total_amount: u64,
    pub delivery_fee: u64,
    pub payment_method: String,
    pub payment_status: PaymentStatus,

    /// Gateway receipt number once paid.
    pub transaction_id: Option<String>,

    /// Correlation id of the payment intent paying for this order.
    pub payment_reference: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderRecord {
    /// Short order number shown to people, the last six hex characters.
    #[must_use]
    pub fn short_reference(&self) -> String {
        self.uuid.short(6)
    }
}

/// Order Item Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub quantity: u32,

    /// Unit price at the time of ordering.
    pub price: u64,
}
