//! Test Helpers

use serde_json::json;

use crate::{
    domain::{
        orders::{
            data::{NewOrder, NewOrderItem},
            records::{OrderItemUuid, OrderUuid},
        },
        payments::{PaymentsService, data::NewPaymentIntent, records::PaymentIntentRecord},
        products::{
            ProductsService,
            data::{DEFAULT_STOCK_COUNT, NewProduct},
            records::{ProductRecord, ProductUuid},
        },
    },
    mpesa::{
        CallbackItem, CallbackMetadata, MockPaymentGateway, StkCallback, StkPushAcknowledgement,
    },
    notifications::MockNotifier,
    test::TestContext,
};

pub(crate) fn new_product(uuid: ProductUuid, category: &str, price: u64) -> NewProduct {
    NewProduct {
        uuid,
        name: format!("Test {category}"),
        description: "A test product".to_string(),
        category: category.to_string(),
        price,
        image_url: "/images/test.jpg".to_string(),
        count_in_stock: DEFAULT_STOCK_COUNT,
    }
}

pub(crate) async fn create_product(ctx: &TestContext, price: u64) -> ProductRecord {
    ctx.products
        .create_product(new_product(ProductUuid::new(), "beadwork", price))
        .await
        .expect("Failed to create test product")
}

/// An order for `quantity` of `product`, totalled correctly for the fee.
pub(crate) fn new_order(
    product: &ProductRecord,
    quantity: u32,
    delivery_fee: u64,
    payment_reference: Option<&str>,
) -> NewOrder {
    NewOrder {
        uuid: OrderUuid::new(),
        customer_name: "Wanjiru Kamau".to_string(),
        email: "wanjiru@example.com".to_string(),
        phone: "0712345678".to_string(),
        delivery_location: "Westlands, Nairobi".to_string(),
        items: vec![NewOrderItem {
            uuid: OrderItemUuid::new(),
            product_uuid: product.uuid,
            name: product.name.clone(),
            quantity,
            price: product.price,
        }],
        total_amount: product.price * u64::from(quantity) + delivery_fee,
        delivery_fee,
        payment_reference: payment_reference.map(str::to_string),
        transaction_id: None,
    }
}

pub(crate) fn acknowledgement(checkout_request_id: &str) -> StkPushAcknowledgement {
    StkPushAcknowledgement {
        merchant_request_id: format!("merchant-{checkout_request_id}"),
        checkout_request_id: checkout_request_id.to_string(),
        response_code: "0".to_string(),
        response_description: "Success. Request accepted for processing".to_string(),
        customer_message: "Success. Request accepted for processing".to_string(),
    }
}

/// A gateway that acknowledges exactly one prompt with the given id.
pub(crate) fn acknowledging_gateway(checkout_request_id: &str) -> MockPaymentGateway {
    let ack = acknowledgement(checkout_request_id);

    let mut gateway = MockPaymentGateway::new();

    gateway
        .expect_request_stk_push()
        .times(1)
        .returning(move |_| Ok(ack.clone()));

    gateway
}

/// A notifier expecting `times` successful admin and customer notifications.
pub(crate) fn notifier_expecting(times: usize) -> MockNotifier {
    let mut notifier = MockNotifier::new();

    notifier
        .expect_notify_admin()
        .times(times)
        .returning(|_| Ok(()));

    notifier
        .expect_notify_customer()
        .times(times)
        .returning(|_| Ok(()));

    notifier
}

/// A result callback; `receipt` is only attached to successful results.
pub(crate) fn callback(
    checkout_request_id: &str,
    result_code: i64,
    receipt: Option<&str>,
) -> StkCallback {
    let callback_metadata = receipt.map(|receipt| CallbackMetadata {
        items: vec![
            CallbackItem {
                name: "Amount".to_string(),
                value: Some(json!(1)),
            },
            CallbackItem {
                name: "MpesaReceiptNumber".to_string(),
                value: Some(json!(receipt)),
            },
            CallbackItem {
                name: "PhoneNumber".to_string(),
                value: Some(json!(254_712_345_678_u64)),
            },
        ],
    });

    StkCallback {
        merchant_request_id: format!("merchant-{checkout_request_id}"),
        checkout_request_id: checkout_request_id.to_string(),
        result_code,
        result_desc: if result_code == 0 {
            "The service request is processed successfully.".to_string()
        } else {
            "Request cancelled by user".to_string()
        },
        callback_metadata,
    }
}

/// Initiate a payment through the context's gateway.
pub(crate) async fn initiate(
    ctx: &TestContext,
    correlation_id: &str,
    amount: u64,
) -> PaymentIntentRecord {
    ctx.payments
        .initiate_payment(NewPaymentIntent {
            correlation_id: correlation_id.to_string(),
            amount,
            phone: "0712345678".to_string(),
        })
        .await
        .expect("Failed to initiate test payment")
        .intent
}
