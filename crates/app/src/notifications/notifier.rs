//! Notifier seam.

use async_trait::async_trait;
use mockall::automock;

use crate::{domain::orders::records::OrderRecord, notifications::errors::NotificationError};

#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tell the shop a paid order needs fulfilling.
    async fn notify_admin(&self, order: &OrderRecord) -> Result<(), NotificationError>;

    /// Confirm a paid order to the customer.
    async fn notify_customer(&self, order: &OrderRecord) -> Result<(), NotificationError>;
}
