//! Background expiry of stale pending payments.

use std::{sync::Arc, time::Duration};

use jiff::SignedDuration;
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{error, info};

use duka_app::domain::payments::PaymentSweepService;

use crate::config::checkout::CheckoutConfig;

/// Spawn the sweep when a pending payment TTL is configured.
pub(crate) fn spawn(
    sweep: Arc<dyn PaymentSweepService>,
    config: &CheckoutConfig,
) -> Option<JoinHandle<()>> {
    let ttl = config.pending_payment_ttl_seconds?;
    let every = Duration::from_secs(u64::from(config.payment_sweep_interval_seconds));

    info!(
        ttl_seconds = ttl,
        interval_seconds = config.payment_sweep_interval_seconds,
        "starting pending payment sweep"
    );

    Some(tokio::spawn(run(
        sweep,
        SignedDuration::from_secs(i64::from(ttl)),
        every,
    )))
}

async fn run(sweep: Arc<dyn PaymentSweepService>, older_than: SignedDuration, every: Duration) {
    let mut interval = time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        if let Err(source) = sweep.expire_stale_payments(older_than).await {
            error!("pending payment sweep failed: {source}");
        }
    }
}
