//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use duka_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::EmptyOrder => StatusError::bad_request().brief("No order items"),
        OrdersServiceError::TotalMismatch { expected, actual } => StatusError::bad_request()
            .brief("Order total does not match items and delivery fee")
            .detail(format!("expected {expected}, got {actual}")),
        OrdersServiceError::PriceMismatch { listed, submitted } => StatusError::bad_request()
            .brief("Item price does not match the catalog")
            .detail(format!("listed {listed}, got {submitted}")),
        OrdersServiceError::MissingPaymentReference => {
            StatusError::bad_request().brief("Payment reference is required")
        }
        OrdersServiceError::MissingRequiredData | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::InvalidReference => {
            StatusError::bad_request().brief("Unknown payment reference or product")
        }
        OrdersServiceError::AmountMismatch { .. } => {
            StatusError::bad_request().brief("Payment amount does not match order total")
        }
        OrdersServiceError::PaymentDeclined => {
            StatusError::conflict().brief("Payment was declined or has expired")
        }
        OrdersServiceError::AlreadyExists => {
            StatusError::conflict().brief("Order already exists for this payment")
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
