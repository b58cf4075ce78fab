//! Checkout errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("cart line quantity must be at least 1")]
    InvalidQuantity,

    #[error("unknown delivery zone")]
    UnknownDeliveryZone,

    #[error("cart total is out of range")]
    AmountOverflow,
}
