//! Orders Data

use crate::domain::{
    checkout::{Cart, CartLine, CheckoutError},
    orders::records::{OrderItemUuid, OrderUuid},
    products::records::ProductUuid,
};

/// New Order Data
///
/// The payment status is never supplied by the client; it is derived from the
/// referenced payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub delivery_location: String,
    pub items: Vec<NewOrderItem>,
    pub total_amount: u64,
    pub delivery_fee: u64,
    pub payment_reference: Option<String>,
    pub transaction_id: Option<String>,
}

/// New Order Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub quantity: u32,
    pub price: u64,
}

impl NewOrder {
    /// Required text fields that are blank.
    pub(crate) fn has_blank_required_fields(&self) -> bool {
        [
            &self.customer_name,
            &self.email,
            &self.phone,
            &self.delivery_location,
        ]
        .iter()
        .any(|value| value.trim().is_empty())
    }

    /// Items total plus delivery fee.
    pub(crate) fn expected_total(&self) -> Result<u64, CheckoutError> {
        let cart = Cart::new(
            self.items
                .iter()
                .map(|item| CartLine {
                    product_uuid: item.product_uuid,
                    name: item.name.clone(),
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
        );

        cart.subtotal()?
            .checked_add(self.delivery_fee)
            .ok_or(CheckoutError::AmountOverflow)
    }

    /// Payment reference with surrounding whitespace removed, `None` when blank.
    pub(crate) fn payment_reference(&self) -> Option<&str> {
        non_blank(self.payment_reference.as_deref())
    }

    /// Transaction id with surrounding whitespace removed, `None` when blank.
    pub(crate) fn transaction_id(&self) -> Option<&str> {
        non_blank(self.transaction_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
