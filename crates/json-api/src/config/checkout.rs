//! Checkout Config

use clap::Args;

/// Checkout and payment lifecycle settings.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Accept gateway sandbox payments that cannot be matched to an intent
    #[arg(long, env = "CHECKOUT_SANDBOX_MODE", default_value_t = false)]
    pub sandbox_mode: bool,

    /// Age in seconds after which pending payments are failed; the sweep
    /// is disabled when unset
    #[arg(
        long,
        env = "PENDING_PAYMENT_TTL_SECONDS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub pending_payment_ttl_seconds: Option<u32>,

    /// How often the pending payment sweep runs, in seconds
    #[arg(
        long,
        env = "PAYMENT_SWEEP_INTERVAL_SECONDS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub payment_sweep_interval_seconds: u32,
}
