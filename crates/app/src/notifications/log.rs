//! Log-only notifier.

use async_trait::async_trait;
use tracing::info;

use crate::{
    domain::orders::records::OrderRecord,
    notifications::{
        errors::NotificationError,
        messages::{admin_message, customer_message},
        notifier::Notifier,
    },
};

/// Writes notifications to the log instead of sending them, for deployments
/// without a mail relay.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    admin_email: String,
    shop_name: String,
}

impl LogNotifier {
    #[must_use]
    pub fn new(admin_email: String, shop_name: String) -> Self {
        Self {
            admin_email,
            shop_name,
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_admin(&self, order: &OrderRecord) -> Result<(), NotificationError> {
        let message = admin_message(order, &self.admin_email);

        info!(to = %message.to, subject = %message.subject, "admin notification");

        Ok(())
    }

    async fn notify_customer(&self, order: &OrderRecord) -> Result<(), NotificationError> {
        let message = customer_message(order, &self.shop_name);

        info!(to = %message.to, subject = %message.subject, "customer notification");

        Ok(())
    }
}
