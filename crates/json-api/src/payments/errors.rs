//! Payment Errors

use salvo::http::StatusError;
use tracing::error;

use duka_app::domain::payments::PaymentsServiceError;

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::Gateway(source) => {
            error!("payment initiation failed: {source}");

            StatusError::bad_gateway().brief("Payment initiation failed. Please try again.")
        }
        PaymentsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Payment already initiated for this order")
        }
        PaymentsServiceError::MissingRequiredData | PaymentsServiceError::InvalidData => {
            StatusError::bad_request().brief("Amount, phone and order id are required")
        }
        PaymentsServiceError::InvalidReference => {
            StatusError::bad_request().brief("Invalid payment reference")
        }
        PaymentsServiceError::NotFound => StatusError::not_found().brief("Payment not found"),
        PaymentsServiceError::Sql(source) => {
            error!("payment storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
