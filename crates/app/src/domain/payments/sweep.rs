//! Stale payment sweep.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        orders::repositories::PgOrdersRepository,
        payments::{
            data::ExpiredPayments, errors::PaymentsServiceError,
            repository::PgPaymentIntentsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgPaymentSweepService {
    db: Db,
    intents: PgPaymentIntentsRepository,
    orders: PgOrdersRepository,
}

impl PgPaymentSweepService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            intents: PgPaymentIntentsRepository::new(),
            orders: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl PaymentSweepService for PgPaymentSweepService {
    async fn expire_stale_payments(
        &self,
        older_than: SignedDuration,
    ) -> Result<ExpiredPayments, PaymentsServiceError> {
        if older_than.is_negative() {
            return Err(PaymentsServiceError::InvalidData);
        }

        let cutoff = Timestamp::now()
            .checked_sub(older_than)
            .map_err(|_overflow| PaymentsServiceError::InvalidData)?;

        let mut tx = self.db.begin().await?;

        let references = self.intents.expire_stale_intents(&mut tx, cutoff).await?;

        let orders = if references.is_empty() {
            0
        } else {
            self.orders
                .expire_orders_by_reference(&mut tx, &references)
                .await?
        };

        tx.commit().await?;

        let expired = ExpiredPayments {
            intents: u64::try_from(references.len()).unwrap_or(u64::MAX),
            orders,
        };

        if expired.intents > 0 {
            info!(
                intents = expired.intents,
                orders = expired.orders,
                %cutoff,
                "expired stale pending payments"
            );
        }

        Ok(expired)
    }
}

#[automock]
#[async_trait]
pub trait PaymentSweepService: Send + Sync {
    /// Fail `Pending` intents created more than `older_than` ago, together
    /// with their `Pending` orders.
    async fn expire_stale_payments(
        &self,
        older_than: SignedDuration,
    ) -> Result<ExpiredPayments, PaymentsServiceError>;
}
