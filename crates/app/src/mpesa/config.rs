//! M-Pesa client configuration.

/// Daraja sandbox base URL.
pub const SANDBOX_BASE_URL: &str = "https://sandbox.safaricom.co.ke";

/// Credentials and merchant settings for STK push requests.
#[derive(Clone)]
pub struct MpesaConfig {
    /// Daraja API base URL, without a trailing slash.
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,

    /// Paybill or till number receiving the payment.
    pub business_shortcode: String,
    pub passkey: String,

    /// Public HTTPS URL the gateway posts payment results to.
    pub callback_url: String,

    /// Prefix of the account reference shown to the customer, `{prefix}-{order}`.
    pub account_reference_prefix: String,
    pub transaction_desc: String,
}

impl std::fmt::Debug for MpesaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MpesaConfig")
            .field("base_url", &self.base_url)
            .field("consumer_key", &"**redacted**")
            .field("consumer_secret", &"**redacted**")
            .field("business_shortcode", &self.business_shortcode)
            .field("passkey", &"**redacted**")
            .field("callback_url", &self.callback_url)
            .field("account_reference_prefix", &self.account_reference_prefix)
            .field("transaction_desc", &self.transaction_desc)
            .finish()
    }
}

impl MpesaConfig {
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    pub(crate) fn account_reference(&self, order_reference: &str) -> String {
        format!("{}-{order_reference}", self.account_reference_prefix)
    }
}
