//! M-Pesa Config

use clap::Args;

use duka_app::mpesa::{MpesaConfig, SANDBOX_BASE_URL};

/// M-Pesa (Daraja) STK push settings.
#[derive(Debug, Args)]
pub struct MpesaSettings {
    /// Daraja API base URL
    #[arg(long, env = "MPESA_BASE_URL", default_value = SANDBOX_BASE_URL)]
    pub mpesa_base_url: String,

    /// Daraja consumer key
    #[arg(long, env = "MPESA_CONSUMER_KEY", hide_env_values = true)]
    pub mpesa_consumer_key: String,

    /// Daraja consumer secret
    #[arg(long, env = "MPESA_CONSUMER_SECRET", hide_env_values = true)]
    pub mpesa_consumer_secret: String,

    /// Paybill or till number receiving payments
    #[arg(
        long = "mpesa-business-shortcode",
        env = "MPESA_BUSINESS_SHORTCODE",
        default_value = "174379"
    )]
    pub business_shortcode: String,

    /// Lipa na M-Pesa online passkey
    #[arg(long, env = "MPESA_PASSKEY", hide_env_values = true)]
    pub mpesa_passkey: String,

    /// Public URL the gateway posts payment results to
    #[arg(long, env = "MPESA_CALLBACK_URL")]
    pub mpesa_callback_url: String,

    /// Account reference prefix shown on the customer's prompt
    #[arg(
        long,
        env = "MPESA_ACCOUNT_REFERENCE_PREFIX",
        default_value = "DukaOrder"
    )]
    pub mpesa_account_reference_prefix: String,

    /// Transaction description sent with each prompt
    #[arg(
        long,
        env = "MPESA_TRANSACTION_DESC",
        default_value = "Duka Online Payment"
    )]
    pub mpesa_transaction_desc: String,
}

impl MpesaSettings {
    pub(crate) fn to_mpesa_config(&self) -> MpesaConfig {
        MpesaConfig {
            base_url: self.mpesa_base_url.clone(),
            consumer_key: self.mpesa_consumer_key.clone(),
            consumer_secret: self.mpesa_consumer_secret.clone(),
            business_shortcode: self.business_shortcode.clone(),
            passkey: self.mpesa_passkey.clone(),
            callback_url: self.mpesa_callback_url.clone(),
            account_reference_prefix: self.mpesa_account_reference_prefix.clone(),
            transaction_desc: self.mpesa_transaction_desc.clone(),
        }
    }
}
