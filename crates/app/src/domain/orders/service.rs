//! Orders service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        checkout::CheckoutError,
        orders::{
            data::NewOrder,
            errors::OrdersServiceError,
            records::{OrderRecord, OrderUuid},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
        payments::{records::PaymentStatus, repository::PgPaymentIntentsRepository},
        products::repository::PgProductsRepository,
    },
    notifications::{Notifier, notify_paid_order},
};

pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    items: PgOrderItemsRepository,
    intents: PgPaymentIntentsRepository,
    products: PgProductsRepository,
    notifier: Arc<dyn Notifier>,
    sandbox_mode: bool,
}

impl fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("db", &self.db)
            .field("sandbox_mode", &self.sandbox_mode)
            .finish_non_exhaustive()
    }
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            items: PgOrderItemsRepository::new(),
            intents: PgPaymentIntentsRepository::new(),
            products: PgProductsRepository::new(),
            notifier,
            sandbox_mode: false,
        }
    }

    /// Accept orders paid in the gateway sandbox.
    ///
    /// Orders without a payment reference but with a transaction id are
    /// stored as paid, and intent amounts may differ from order totals.
    #[must_use]
    pub fn with_sandbox_mode(mut self, sandbox_mode: bool) -> Self {
        self.sandbox_mode = sandbox_mode;
        self
    }

    fn validate(order: &NewOrder) -> Result<(), OrdersServiceError> {
        if order.items.is_empty() {
            return Err(OrdersServiceError::EmptyOrder);
        }

        if order.has_blank_required_fields()
            || order.items.iter().any(|item| item.name.trim().is_empty())
        {
            return Err(OrdersServiceError::MissingRequiredData);
        }

        let expected = order.expected_total().map_err(|err| match err {
            CheckoutError::EmptyCart => OrdersServiceError::EmptyOrder,
            CheckoutError::InvalidQuantity
            | CheckoutError::AmountOverflow
            | CheckoutError::UnknownDeliveryZone => OrdersServiceError::InvalidData,
        })?;

        if expected != order.total_amount {
            return Err(OrdersServiceError::TotalMismatch {
                expected,
                actual: order.total_amount,
            });
        }

        Ok(())
    }

    /// Reject items priced differently from the catalog.
    async fn verify_prices(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<(), OrdersServiceError> {
        for item in &order.items {
            let listed = self
                .products
                .find_price(tx, item.product_uuid)
                .await?
                .ok_or(OrdersServiceError::InvalidReference)?;

            if listed != item.price {
                return Err(OrdersServiceError::PriceMismatch {
                    listed,
                    submitted: item.price,
                });
            }
        }

        Ok(())
    }

    /// Decide the stored payment status and transaction id from the
    /// referenced payment intent, never from the client.
    async fn resolve_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<(PaymentStatus, Option<String>), OrdersServiceError> {
        let Some(reference) = order.payment_reference() else {
            return match order.transaction_id() {
                Some(transaction_id) if self.sandbox_mode => {
                    warn!(
                        order = %order.uuid,
                        transaction_id,
                        "sandbox mode: accepting unreferenced order as paid"
                    );

                    Ok((PaymentStatus::Paid, Some(transaction_id.to_string())))
                }
                _ => Err(OrdersServiceError::MissingPaymentReference),
            };
        };

        let intent = self
            .intents
            .find_by_correlation_id_for_update(tx, reference)
            .await?
            .ok_or(OrdersServiceError::InvalidReference)?;

        if intent.amount != order.total_amount {
            if !self.sandbox_mode {
                return Err(OrdersServiceError::AmountMismatch {
                    paid: intent.amount,
                    total: order.total_amount,
                });
            }

            info!(
                order = %order.uuid,
                intent = %intent.uuid,
                charged = intent.amount,
                total = order.total_amount,
                "sandbox mode: charge differs from order total"
            );
        }

        match intent.status {
            PaymentStatus::Paid => Ok((PaymentStatus::Paid, intent.receipt_number)),
            PaymentStatus::Pending => Ok((PaymentStatus::Pending, None)),
            PaymentStatus::Failed => Err(OrdersServiceError::PaymentDeclined),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError> {
        Self::validate(&order)?;

        let mut tx = self.db.begin().await?;

        self.verify_prices(&mut tx, &order).await?;

        let (payment_status, transaction_id) = self.resolve_payment(&mut tx, &order).await?;

        let mut created = self
            .orders
            .create_order(&mut tx, &order, payment_status, transaction_id.as_deref())
            .await?;

        created.items = self
            .items
            .create_order_items(&mut tx, created.uuid, &order.items)
            .await?;

        tx.commit().await?;

        info!(
            order = %created.uuid,
            payment_status = %created.payment_status,
            total_amount = created.total_amount,
            "order created"
        );

        if created.payment_status == PaymentStatus::Paid {
            notify_paid_order(self.notifier.as_ref(), &created).await;
        }

        Ok(created)
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = self.orders.list_orders(&mut tx).await?;

        self.items.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self.orders.get_order(&mut tx, order).await?;

        self.items
            .attach_items(&mut tx, std::slice::from_mut(&mut order))
            .await?;

        tx.commit().await?;

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Persist an order, deriving its payment status from the referenced
    /// payment intent. Paid orders notify the shop and the customer.
    async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError>;

    /// All orders, newest first.
    async fn list_orders(&self) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Retrieve a single order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{payments::PaymentsService, products::records::ProductUuid},
        mpesa::MockPaymentGateway,
        notifications::{MockNotifier, NotificationError},
        test::{
            TestContext,
            helpers::{acknowledging_gateway, callback, create_product, initiate, new_order},
        },
    };

    use super::*;

    #[tokio::test]
    async fn empty_items_are_rejected() {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, 1000).await;

        let mut order = new_order(&product, 1, 0, Some("corr-1"));
        order.items.clear();
        order.total_amount = 0;

        let result = ctx.orders.create_order(order).await;

        assert!(
            matches!(result, Err(OrdersServiceError::EmptyOrder)),
            "expected EmptyOrder, got {result:?}"
        );
    }

    #[tokio::test]
    async fn total_must_match_items_and_fee() {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, 1000).await;

        let mut order = new_order(&product, 1, 500, Some("corr-1"));
        order.total_amount = 1000;

        let result = ctx.orders.create_order(order).await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::TotalMismatch {
                    expected: 1500,
                    actual: 1000
                })
            ),
            "expected TotalMismatch, got {result:?}"
        );
    }

    #[tokio::test]
    async fn item_price_must_match_catalog() {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, 1000).await;

        let mut order = new_order(&product, 2, 0, Some("corr-1"));
        if let Some(item) = order.items.first_mut() {
            item.price = 1;
        }
        order.total_amount = 2;

        let result = ctx.orders.create_order(order).await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::PriceMismatch {
                    listed: 1000,
                    submitted: 1
                })
            ),
            "expected PriceMismatch, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unknown_product_is_rejected() {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, 1000).await;

        let mut order = new_order(&product, 1, 0, Some("corr-1"));
        if let Some(item) = order.items.first_mut() {
            item.product_uuid = ProductUuid::new();
        }

        let result = ctx.orders.create_order(order).await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn missing_reference_is_rejected() {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, 1000).await;

        let mut order = new_order(&product, 1, 0, None);
        order.transaction_id = Some("ABC123".to_string());

        let result = ctx.orders.create_order(order).await;

        assert!(
            matches!(result, Err(OrdersServiceError::MissingPaymentReference)),
            "expected MissingPaymentReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unknown_reference_is_rejected() {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, 1000).await;

        let result = ctx
            .orders
            .create_order(new_order(&product, 1, 0, Some("nobody")))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn pending_intent_creates_pending_order() -> TestResult {
        let ctx = TestContext::with_collaborators(
            acknowledging_gateway("ws_CO_1"),
            MockNotifier::new(),
            false,
        )
        .await;
        let product = create_product(&ctx, 1000).await;

        initiate(&ctx, "corr-1", 1500).await;

        let order = ctx
            .orders
            .create_order(new_order(&product, 1, 500, Some("corr-1")))
            .await?;

        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.transaction_id, None);
        assert_eq!(order.total_amount, 1500);
        assert_eq!(order.delivery_fee, 500);
        assert_eq!(order.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn paid_intent_creates_paid_order_and_notifies_once() -> TestResult {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify_admin()
            .times(1)
            .returning(|_| Ok(()));
        notifier
            .expect_notify_customer()
            .times(1)
            .returning(|_| Ok(()));

        let ctx =
            TestContext::with_collaborators(acknowledging_gateway("ws_CO_1"), notifier, false)
                .await;
        let product = create_product(&ctx, 1000).await;

        initiate(&ctx, "corr-1", 1000).await;

        // No order exists yet, so settling notifies nobody.
        ctx.payments
            .settle_callback(callback("ws_CO_1", 0, Some("ABC123")))
            .await?;

        let order = ctx
            .orders
            .create_order(new_order(&product, 1, 0, Some("corr-1")))
            .await?;

        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.transaction_id.as_deref(), Some("ABC123"));

        Ok(())
    }

    #[tokio::test]
    async fn notification_failures_do_not_abort_creation() -> TestResult {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify_admin().times(1).returning(|_| {
            Err(NotificationError::UnexpectedResponse(
                "relay down".to_string(),
            ))
        });
        notifier.expect_notify_customer().times(1).returning(|_| {
            Err(NotificationError::UnexpectedResponse(
                "relay down".to_string(),
            ))
        });

        let ctx =
            TestContext::with_collaborators(acknowledging_gateway("ws_CO_1"), notifier, false)
                .await;
        let product = create_product(&ctx, 1000).await;

        initiate(&ctx, "corr-1", 1000).await;

        ctx.payments
            .settle_callback(callback("ws_CO_1", 0, Some("ABC123")))
            .await?;

        let order = ctx
            .orders
            .create_order(new_order(&product, 1, 0, Some("corr-1")))
            .await?;

        assert_eq!(order.payment_status, PaymentStatus::Paid);

        let stored = ctx.orders.get_order(order.uuid).await?;

        assert_eq!(stored.payment_status, PaymentStatus::Paid);

        Ok(())
    }

    #[tokio::test]
    async fn failed_intent_is_declined() -> TestResult {
        let ctx = TestContext::with_collaborators(
            acknowledging_gateway("ws_CO_1"),
            MockNotifier::new(),
            false,
        )
        .await;
        let product = create_product(&ctx, 1000).await;

        initiate(&ctx, "corr-1", 1000).await;

        ctx.payments
            .settle_callback(callback("ws_CO_1", 1032, None))
            .await?;

        let result = ctx
            .orders
            .create_order(new_order(&product, 1, 0, Some("corr-1")))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::PaymentDeclined)),
            "expected PaymentDeclined, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn charge_must_match_order_total() {
        let ctx = TestContext::with_collaborators(
            acknowledging_gateway("ws_CO_1"),
            MockNotifier::new(),
            false,
        )
        .await;
        let product = create_product(&ctx, 1000).await;

        initiate(&ctx, "corr-1", 1).await;

        let result = ctx
            .orders
            .create_order(new_order(&product, 1, 0, Some("corr-1")))
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::AmountMismatch {
                    paid: 1,
                    total: 1000
                })
            ),
            "expected AmountMismatch, got {result:?}"
        );
    }

    #[tokio::test]
    async fn sandbox_mode_accepts_differing_charge() -> TestResult {
        let ctx = TestContext::with_collaborators(
            acknowledging_gateway("ws_CO_1"),
            MockNotifier::new(),
            true,
        )
        .await;
        let product = create_product(&ctx, 1000).await;

        initiate(&ctx, "corr-1", 1).await;

        let order = ctx
            .orders
            .create_order(new_order(&product, 1, 500, Some("corr-1")))
            .await?;

        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.total_amount, 1500);

        Ok(())
    }

    #[tokio::test]
    async fn sandbox_mode_accepts_unreferenced_paid_order() -> TestResult {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify_admin()
            .times(1)
            .returning(|_| Ok(()));
        notifier
            .expect_notify_customer()
            .times(1)
            .returning(|_| Ok(()));

        let ctx = TestContext::with_collaborators(MockPaymentGateway::new(), notifier, true).await;
        let product = create_product(&ctx, 1000).await;

        let mut order = new_order(&product, 2, 0, None);
        order.transaction_id = Some(" SBX999 ".to_string());

        let order = ctx.orders.create_order(order).await?;

        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.transaction_id.as_deref(), Some("SBX999"));
        assert_eq!(order.payment_reference, None);

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_returns_newest_first_with_items() -> TestResult {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_request_stk_push()
            .times(2)
            .returning(|push| {
                Ok(crate::test::helpers::acknowledgement(&format!(
                    "ws_{}",
                    push.order_reference
                )))
            });

        let ctx = TestContext::with_collaborators(gateway, MockNotifier::new(), false).await;
        let product = create_product(&ctx, 250).await;

        initiate(&ctx, "corr-1", 250).await;
        initiate(&ctx, "corr-2", 500).await;

        let first = ctx
            .orders
            .create_order(new_order(&product, 1, 0, Some("corr-1")))
            .await?;
        let second = ctx
            .orders
            .create_order(new_order(&product, 2, 0, Some("corr-2")))
            .await?;

        let orders = ctx.orders.list_orders().await?;

        let uuids: Vec<_> = orders.iter().map(|order| order.uuid).collect();

        assert_eq!(uuids, vec![second.uuid, first.uuid]);
        assert!(orders.iter().all(|order| order.items.len() == 1));

        Ok(())
    }

    #[tokio::test]
    async fn get_order_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.orders.get_order(OrderUuid::new()).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
