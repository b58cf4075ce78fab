//! Paid order notification dispatch.

use tracing::{error, info};

use crate::{domain::orders::records::OrderRecord, notifications::notifier::Notifier};

/// Send the admin and customer notifications for a paid order.
///
/// Each notification is attempted once. Failures are logged and never
/// propagated, so one failing does not stop the other.
pub async fn notify_paid_order(notifier: &dyn Notifier, order: &OrderRecord) {
    match notifier.notify_admin(order).await {
        Ok(()) => info!(order = %order.uuid, "admin notification sent"),
        Err(err) => error!(order = %order.uuid, error = %err, "admin notification failed"),
    }

    match notifier.notify_customer(order).await {
        Ok(()) => info!(order = %order.uuid, "customer notification sent"),
        Err(err) => error!(order = %order.uuid, error = %err, "customer notification failed"),
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use crate::{
        domain::{
            orders::records::{OrderUuid, PAYMENT_METHOD_MPESA},
            payments::records::PaymentStatus,
        },
        notifications::{MockNotifier, NotificationError},
    };

    use super::*;

    fn paid_order() -> OrderRecord {
        OrderRecord {
            uuid: OrderUuid::new(),
            customer_name: "Wanjiru Kamau".to_string(),
            email: "wanjiru@example.com".to_string(),
            phone: "0712345678".to_string(),
            delivery_location: "Nakuru".to_string(),
            items: Vec::new(),
            total_amount: 1500,
            delivery_fee: 500,
            payment_method: PAYMENT_METHOD_MPESA.to_string(),
            payment_status: PaymentStatus::Paid,
            transaction_id: Some("ABC123".to_string()),
            payment_reference: Some("order-1".to_string()),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn admin_failure_does_not_skip_customer() {
        let order = paid_order();
        let uuid = order.uuid;

        let mut notifier = MockNotifier::new();

        notifier
            .expect_notify_admin()
            .once()
            .returning(|_| Err(NotificationError::UnexpectedResponse("503".to_string())));

        notifier
            .expect_notify_customer()
            .once()
            .withf(move |order| order.uuid == uuid)
            .returning(|_| Ok(()));

        notify_paid_order(&notifier, &order).await;
    }

    #[tokio::test]
    async fn each_notification_is_attempted_once() {
        let mut notifier = MockNotifier::new();

        notifier.expect_notify_admin().once().returning(|_| Ok(()));
        notifier
            .expect_notify_customer()
            .once()
            .returning(|_| Err(NotificationError::UnexpectedResponse("500".to_string())));

        notify_paid_order(&notifier, &paid_order()).await;
    }
}
