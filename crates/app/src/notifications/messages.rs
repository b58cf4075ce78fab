//! Notification message bodies.

use crate::domain::orders::records::OrderRecord;

/// A plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

fn ksh(amount: u64) -> String {
    format!("KSH {amount}.00")
}

/// New paid order notice for the shop.
#[must_use]
pub fn admin_message(order: &OrderRecord, admin_email: &str) -> EmailMessage {
    let mut lines = vec![
        "New paid order details".to_string(),
        format!("Order id: {}", order.uuid),
        String::new(),
        format!("Name: {}", order.customer_name),
        format!("Email: {}", order.email),
        format!("Phone: {}", order.phone),
        format!("Delivery location: {}", order.delivery_location),
        String::new(),
        format!("Total paid: {}", ksh(order.total_amount)),
        format!("Delivery fee: {}", ksh(order.delivery_fee)),
        format!("Payment status: {}", order.payment_status),
        format!(
            "M-Pesa id: {}",
            order.transaction_id.as_deref().unwrap_or("N/A")
        ),
        String::new(),
        "Items:".to_string(),
    ];

    lines.extend(
        order
            .items
            .iter()
            .map(|item| format!("{} x {} ({})", item.quantity, item.name, ksh(item.price))),
    );

    EmailMessage {
        to: admin_email.to_string(),
        subject: format!("NEW PAID ORDER RECEIVED: #{}", order.short_reference()),
        text: lines.join("\n"),
    }
}

/// Order confirmation for the customer.
#[must_use]
pub fn customer_message(order: &OrderRecord, shop_name: &str) -> EmailMessage {
    let lines = [
        format!("Dear {},", order.customer_name),
        String::new(),
        format!(
            "We have received your order and payment of {}.",
            ksh(order.total_amount)
        ),
        format!(
            "Your order will be delivered to {}. We will get back to you within 24 hours to confirm the delivery time.",
            order.delivery_location
        ),
        String::new(),
        format!("Thank you for choosing {shop_name}."),
    ];

    EmailMessage {
        to: order.email.clone(),
        subject: format!(
            "Order #{} Confirmation - {shop_name}",
            order.short_reference()
        ),
        text: lines.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use uuid::Uuid;

    use crate::domain::{
        orders::records::{OrderItemRecord, OrderItemUuid, OrderUuid, PAYMENT_METHOD_MPESA},
        payments::records::PaymentStatus,
        products::records::ProductUuid,
    };

    use super::*;

    fn order() -> OrderRecord {
        let uuid = OrderUuid::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_00ab_cdef));

        OrderRecord {
            uuid,
            customer_name: "Wanjiru".to_string(),
            email: "wanjiru@example.com".to_string(),
            phone: "254712345678".to_string(),
            delivery_location: "Nakuru".to_string(),
            items: vec![OrderItemRecord {
                uuid: OrderItemUuid::new(),
                order_uuid: uuid,
                product_uuid: ProductUuid::new(),
                name: "Shuka".to_string(),
                quantity: 2,
                price: 500,
            }],
            total_amount: 1500,
            delivery_fee: 500,
            payment_method: PAYMENT_METHOD_MPESA.to_string(),
            payment_status: PaymentStatus::Paid,
            transaction_id: Some("ABC123".to_string()),
            payment_reference: Some("X".to_string()),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn admin_subject_uses_short_reference() {
        let message = admin_message(&order(), "shop@example.com");

        assert_eq!(message.to, "shop@example.com");
        assert_eq!(message.subject, "NEW PAID ORDER RECEIVED: #abcdef");
    }

    #[test]
    fn admin_text_lists_items_and_receipt() {
        let message = admin_message(&order(), "shop@example.com");

        assert!(message.text.contains("2 x Shuka (KSH 500.00)"), "{}", message.text);
        assert!(message.text.contains("M-Pesa id: ABC123"), "{}", message.text);
    }

    #[test]
    fn customer_message_goes_to_order_email() {
        let message = customer_message(&order(), "Duka");

        assert_eq!(message.to, "wanjiru@example.com");
        assert_eq!(message.subject, "Order #abcdef Confirmation - Duka");
        assert!(message.text.contains("KSH 1500.00"), "{}", message.text);
    }
}
