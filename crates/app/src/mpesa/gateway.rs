//! Payment gateway seam.

use async_trait::async_trait;
use mockall::automock;

use crate::mpesa::errors::MpesaError;

/// STK push charge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StkPush {
    /// Amount in whole shillings.
    pub amount: u64,

    /// Normalised `254…` phone number to prompt.
    pub phone: String,

    /// Client correlation identifier, embedded in the account reference.
    pub order_reference: String,
}

/// The gateway's acknowledgement that a prompt was sent.
///
/// This is not a payment result; that arrives later on the callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StkPushAcknowledgement {
    pub merchant_request_id: String,
    pub checkout_request_id: String,
    pub response_code: String,
    pub response_description: String,
    pub customer_message: String,
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Prompt the customer's phone for payment.
    ///
    /// Only accepted requests return `Ok`; a non-zero response code is an error.
    async fn request_stk_push(&self, push: &StkPush) -> Result<StkPushAcknowledgement, MpesaError>;
}
