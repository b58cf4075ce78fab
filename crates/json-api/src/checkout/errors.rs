//! Checkout Errors

use salvo::http::StatusError;

use duka_app::domain::checkout::CheckoutError;

pub(crate) fn into_status_error(error: CheckoutError) -> StatusError {
    match error {
        CheckoutError::EmptyCart => StatusError::bad_request().brief("Your cart is empty"),
        CheckoutError::InvalidQuantity => {
            StatusError::bad_request().brief("Item quantities must be at least 1")
        }
        CheckoutError::UnknownDeliveryZone => {
            StatusError::bad_request().brief("Delivery zone must be nairobi or outside")
        }
        CheckoutError::AmountOverflow => StatusError::bad_request().brief("Cart total is too large"),
    }
}
