//! STK push result callback envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const RECEIPT_ITEM: &str = "MpesaReceiptNumber";
const AMOUNT_ITEM: &str = "Amount";
const PHONE_ITEM: &str = "PhoneNumber";

/// Result code reported for a completed payment.
pub const SUCCESS_RESULT_CODE: i64 = 0;

/// Body posted by the gateway to the callback URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackEnvelope {
    #[serde(rename = "Body")]
    pub body: CallbackBody,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackBody {
    #[serde(rename = "stkCallback")]
    pub stk_callback: StkCallback,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkCallback {
    #[serde(rename = "MerchantRequestID")]
    pub merchant_request_id: String,
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,
    pub result_code: i64,
    #[serde(default)]
    pub result_desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_metadata: Option<CallbackMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CallbackMetadata {
    #[serde(rename = "Item", default)]
    pub items: Vec<CallbackItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CallbackItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// What a callback says happened to the payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Paid {
        receipt_number: String,
        amount: Option<u64>,
        phone: Option<String>,
    },
    Failed {
        result_code: i64,
        result_description: String,
    },

    /// Reported success without a receipt number.
    MissingReceipt,
}

impl StkCallback {
    #[must_use]
    pub fn outcome(&self) -> CallbackOutcome {
        if self.result_code != SUCCESS_RESULT_CODE {
            return CallbackOutcome::Failed {
                result_code: self.result_code,
                result_description: self.result_desc.clone(),
            };
        }

        let Some(receipt_number) = self.item(RECEIPT_ITEM).and_then(value_to_string) else {
            return CallbackOutcome::MissingReceipt;
        };

        CallbackOutcome::Paid {
            receipt_number,
            amount: self.item(AMOUNT_ITEM).and_then(value_to_amount),
            phone: self.item(PHONE_ITEM).and_then(value_to_string),
        }
    }

    fn item(&self, name: &str) -> Option<&Value> {
        self.callback_metadata
            .as_ref()?
            .items
            .iter()
            .find(|item| item.name == name)?
            .value
            .as_ref()
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

// Amounts arrive as JSON numbers, sometimes with a fractional part of zero.
fn value_to_amount(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|amount| amount.fract().abs() < f64::EPSILON && amount.is_sign_positive())
            .map(|amount| format!("{amount:.0}"))
            .and_then(|amount| amount.parse().ok())
    })
}
