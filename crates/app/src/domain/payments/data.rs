//! Payments Data

use crate::{
    domain::{orders::records::OrderUuid, payments::records::PaymentIntentRecord},
    mpesa::StkPushAcknowledgement,
};

/// Request to charge a customer through an STK push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentIntent {
    /// Client-chosen identifier the order will later reference.
    pub correlation_id: String,

    /// Amount to charge in whole shillings.
    pub amount: u64,

    /// Phone number as entered by the customer.
    pub phone: String,
}

/// A persisted intent and the gateway's acknowledgement of its prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInitiation {
    pub intent: PaymentIntentRecord,
    pub acknowledgement: StkPushAcknowledgement,
}

/// What processing a gateway callback did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackSettlement {
    /// No intent carries the callback's checkout request id.
    UnknownCheckoutRequest,

    /// The intent had already left `Pending`; nothing changed.
    Replayed,

    /// A success callback without a receipt number; nothing changed.
    MissingReceipt,

    Paid {
        receipt_number: String,
        order: Option<OrderUuid>,
    },

    /// A success callback for an intent that had already failed. The
    /// receipt is kept on the intent for reconciliation.
    PaidAfterExpiry {
        receipt_number: String,
    },

    Failed {
        result_code: i64,
        order: Option<OrderUuid>,
    },
}

impl CallbackSettlement {
    /// Stable label used for logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownCheckoutRequest => "unknown",
            Self::Replayed => "replayed",
            Self::MissingReceipt => "missing_receipt",
            Self::Paid { .. } => "paid",
            Self::PaidAfterExpiry { .. } => "paid_after_expiry",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Counts of records moved to `Failed` by a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiredPayments {
    pub intents: u64,
    pub orders: u64,
}
