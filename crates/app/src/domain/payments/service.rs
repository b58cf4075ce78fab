//! Payments service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{error, info, warn};

use crate::{
    database::Db,
    domain::{
        orders::repositories::{PgOrderItemsRepository, PgOrdersRepository},
        payments::{
            data::{CallbackSettlement, NewPaymentIntent, PaymentInitiation},
            errors::PaymentsServiceError,
            records::{PaymentIntentRecord, PaymentIntentUuid, PaymentStatus},
            repository::{IntentSettlement, PgPaymentIntentsRepository},
        },
    },
    mpesa::{CallbackOutcome, PaymentGateway, StkCallback, StkPush, normalize_phone},
    notifications::{Notifier, notify_paid_order},
};

pub struct PgPaymentsService {
    db: Db,
    intents: PgPaymentIntentsRepository,
    orders: PgOrdersRepository,
    items: PgOrderItemsRepository,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for PgPaymentsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgPaymentsService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PgPaymentsService {
    #[must_use]
    pub fn new(db: Db, gateway: Arc<dyn PaymentGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db,
            intents: PgPaymentIntentsRepository::new(),
            orders: PgOrdersRepository::new(),
            items: PgOrderItemsRepository::new(),
            gateway,
            notifier,
        }
    }

    async fn fail_initiation(&self, intent: PaymentIntentUuid, reason: &str) {
        let result = async {
            let mut tx = self.db.begin().await?;
            self.intents.fail_initiation(&mut tx, intent, reason).await?;
            tx.commit().await
        }
        .await;

        if let Err(err) = result {
            error!(intent = %intent, error = %err, "failed to mark payment intent failed");
        }
    }

    async fn settle_paid(
        &self,
        mut tx: Transaction<'static, Postgres>,
        intent: &PaymentIntentRecord,
        callback: &StkCallback,
        receipt_number: String,
        amount: Option<u64>,
    ) -> Result<CallbackSettlement, PaymentsServiceError> {
        if let Some(amount) = amount
            && amount != intent.amount
        {
            warn!(
                intent = %intent.uuid,
                requested = intent.amount,
                paid = amount,
                "callback amount differs from requested amount"
            );
        }

        let settlement = IntentSettlement {
            status: PaymentStatus::Paid,
            receipt_number: Some(&receipt_number),
            result_code: Some(callback.result_code),
            result_description: Some(&callback.result_desc),
        };

        if self
            .intents
            .settle_intent(&mut tx, intent.uuid, &settlement)
            .await?
            .is_none()
        {
            return Ok(CallbackSettlement::Replayed);
        }

        let mut order = self
            .orders
            .settle_order_by_reference(
                &mut tx,
                &intent.correlation_id,
                PaymentStatus::Paid,
                Some(&receipt_number),
            )
            .await?;

        if let Some(order) = order.as_mut() {
            self.items
                .attach_items(&mut tx, std::slice::from_mut(order))
                .await?;
        }

        tx.commit().await?;

        info!(
            intent = %intent.uuid,
            receipt = %receipt_number,
            order = ?order.as_ref().map(|order| order.uuid),
            "payment confirmed"
        );

        if let Some(order) = &order {
            notify_paid_order(self.notifier.as_ref(), order).await;
        }

        Ok(CallbackSettlement::Paid {
            receipt_number,
            order: order.map(|order| order.uuid),
        })
    }

    async fn record_late_payment(
        &self,
        mut tx: Transaction<'static, Postgres>,
        intent: &PaymentIntentRecord,
        receipt_number: String,
    ) -> Result<CallbackSettlement, PaymentsServiceError> {
        if self
            .intents
            .record_late_receipt(&mut tx, intent.uuid, &receipt_number)
            .await?
            .is_none()
        {
            info!(intent = %intent.uuid, "callback replay ignored");

            return Ok(CallbackSettlement::Replayed);
        }

        tx.commit().await?;

        error!(
            intent = %intent.uuid,
            correlation_id = %intent.correlation_id,
            amount = intent.amount,
            receipt = %receipt_number,
            "payment confirmed after intent failed, needs reconciliation"
        );

        Ok(CallbackSettlement::PaidAfterExpiry { receipt_number })
    }

    async fn settle_failed(
        &self,
        mut tx: Transaction<'static, Postgres>,
        intent: &PaymentIntentRecord,
        result_code: i64,
        result_description: String,
    ) -> Result<CallbackSettlement, PaymentsServiceError> {
        let settlement = IntentSettlement {
            status: PaymentStatus::Failed,
            receipt_number: None,
            result_code: Some(result_code),
            result_description: Some(&result_description),
        };

        if self
            .intents
            .settle_intent(&mut tx, intent.uuid, &settlement)
            .await?
            .is_none()
        {
            return Ok(CallbackSettlement::Replayed);
        }

        let order = self
            .orders
            .settle_order_by_reference(
                &mut tx,
                &intent.correlation_id,
                PaymentStatus::Failed,
                None,
            )
            .await?;

        tx.commit().await?;

        info!(
            intent = %intent.uuid,
            result_code,
            result_description = %result_description,
            order = ?order.as_ref().map(|order| order.uuid),
            "payment failed"
        );

        Ok(CallbackSettlement::Failed {
            result_code,
            order: order.map(|order| order.uuid),
        })
    }
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    async fn initiate_payment(
        &self,
        payment: NewPaymentIntent,
    ) -> Result<PaymentInitiation, PaymentsServiceError> {
        let correlation_id = payment.correlation_id.trim();

        if correlation_id.is_empty() || payment.phone.trim().is_empty() {
            return Err(PaymentsServiceError::MissingRequiredData);
        }

        if payment.amount == 0 {
            return Err(PaymentsServiceError::InvalidData);
        }

        let phone = normalize_phone(&payment.phone);

        let mut tx = self.db.begin().await?;

        let intent = self
            .intents
            .create_intent(
                &mut tx,
                PaymentIntentUuid::new(),
                correlation_id,
                payment.amount,
                &phone,
            )
            .await?;

        tx.commit().await?;

        let push = StkPush {
            amount: payment.amount,
            phone,
            order_reference: intent.correlation_id.clone(),
        };

        let acknowledgement = match self.gateway.request_stk_push(&push).await {
            Ok(acknowledgement) => acknowledgement,
            Err(err) => {
                warn!(intent = %intent.uuid, error = %err, "payment initiation failed");

                self.fail_initiation(intent.uuid, &err.to_string()).await;

                return Err(PaymentsServiceError::Gateway(err));
            }
        };

        let mut tx = self.db.begin().await?;

        let intent = self
            .intents
            .record_acknowledgement(
                &mut tx,
                intent.uuid,
                &acknowledgement.merchant_request_id,
                &acknowledgement.checkout_request_id,
            )
            .await?;

        tx.commit().await?;

        info!(
            intent = %intent.uuid,
            checkout_request_id = %acknowledgement.checkout_request_id,
            "payment prompt sent"
        );

        Ok(PaymentInitiation {
            intent,
            acknowledgement,
        })
    }

    async fn settle_callback(
        &self,
        callback: StkCallback,
    ) -> Result<CallbackSettlement, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let intent = self
            .intents
            .find_by_checkout_request_for_update(&mut tx, &callback.checkout_request_id)
            .await?;

        let Some(intent) = intent else {
            if let CallbackOutcome::Paid { receipt_number, .. } = callback.outcome() {
                error!(
                    checkout_request_id = %callback.checkout_request_id,
                    receipt = %receipt_number,
                    "payment confirmed for unknown checkout request"
                );
            } else {
                warn!(
                    checkout_request_id = %callback.checkout_request_id,
                    "callback for unknown checkout request"
                );
            }

            return Ok(CallbackSettlement::UnknownCheckoutRequest);
        };

        if intent.status == PaymentStatus::Failed
            && let CallbackOutcome::Paid { receipt_number, .. } = callback.outcome()
        {
            return self.record_late_payment(tx, &intent, receipt_number).await;
        }

        if intent.status.is_terminal() {
            info!(intent = %intent.uuid, status = %intent.status, "callback replay ignored");

            return Ok(CallbackSettlement::Replayed);
        }

        match callback.outcome() {
            CallbackOutcome::MissingReceipt => {
                error!(
                    intent = %intent.uuid,
                    checkout_request_id = %callback.checkout_request_id,
                    "success callback without receipt number"
                );

                Ok(CallbackSettlement::MissingReceipt)
            }
            CallbackOutcome::Paid {
                receipt_number,
                amount,
                ..
            } => {
                self.settle_paid(tx, &intent, &callback, receipt_number, amount)
                    .await
            }
            CallbackOutcome::Failed {
                result_code,
                result_description,
            } => {
                self.settle_failed(tx, &intent, result_code, result_description)
                    .await
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Persist a `Pending` intent and prompt the customer's phone.
    ///
    /// The intent is committed before the gateway is called and marked
    /// `Failed` if the gateway does not accept the prompt.
    async fn initiate_payment(
        &self,
        payment: NewPaymentIntent,
    ) -> Result<PaymentInitiation, PaymentsServiceError>;

    /// Apply a gateway result callback to its intent and linked order.
    ///
    /// Callbacks for unknown or already settled intents change nothing,
    /// except that a success arriving for a failed intent keeps its
    /// receipt on the intent.
    async fn settle_callback(
        &self,
        callback: StkCallback,
    ) -> Result<CallbackSettlement, PaymentsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::orders::{OrdersService, records::OrderRecord},
        mpesa::{MockPaymentGateway, MpesaError},
        notifications::MockNotifier,
        test::{
            TestContext,
            helpers::{
                acknowledgement, acknowledging_gateway, callback, create_product, initiate,
                new_order, notifier_expecting,
            },
        },
    };

    use super::*;

    async fn intent_status(ctx: &TestContext, correlation_id: &str) -> String {
        sqlx::query_scalar("SELECT status FROM payment_intents WHERE correlation_id = $1")
            .bind(correlation_id)
            .fetch_one(ctx.db.pool())
            .await
            .expect("Failed to read intent status")
    }

    async fn pending_order(ctx: &TestContext, correlation_id: &str, price: u64) -> OrderRecord {
        let product = create_product(ctx, price).await;

        ctx.orders
            .create_order(new_order(&product, 1, 0, Some(correlation_id)))
            .await
            .expect("Failed to create pending order")
    }

    #[tokio::test]
    async fn initiation_sends_normalised_phone() -> TestResult {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_request_stk_push()
            .withf(|push| {
                push.phone == "254712345678" && push.amount == 1 && push.order_reference == "X"
            })
            .times(1)
            .returning(|_| Ok(acknowledgement("ws_CO_1")));

        let ctx = TestContext::with_collaborators(gateway, MockNotifier::new(), false).await;

        let initiation = ctx
            .payments
            .initiate_payment(NewPaymentIntent {
                correlation_id: "X".to_string(),
                amount: 1,
                phone: "0712345678".to_string(),
            })
            .await?;

        assert_eq!(initiation.intent.status, PaymentStatus::Pending);
        assert_eq!(initiation.intent.phone, "254712345678");
        assert_eq!(
            initiation.intent.checkout_request_id.as_deref(),
            Some("ws_CO_1")
        );
        assert_eq!(initiation.acknowledgement.checkout_request_id, "ws_CO_1");

        Ok(())
    }

    #[tokio::test]
    async fn gateway_failure_marks_intent_failed() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_request_stk_push().times(1).returning(|_| {
            Err(MpesaError::Rejected {
                code: "1".to_string(),
                description: "Insufficient funds".to_string(),
            })
        });

        let ctx = TestContext::with_collaborators(gateway, MockNotifier::new(), false).await;

        let result = ctx
            .payments
            .initiate_payment(NewPaymentIntent {
                correlation_id: "corr-1".to_string(),
                amount: 100,
                phone: "0712345678".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(PaymentsServiceError::Gateway(_))),
            "expected Gateway, got {result:?}"
        );
        assert_eq!(intent_status(&ctx, "corr-1").await, "failed");
    }

    #[tokio::test]
    async fn duplicate_correlation_id_is_rejected() {
        let ctx = TestContext::with_collaborators(
            acknowledging_gateway("ws_CO_1"),
            MockNotifier::new(),
            false,
        )
        .await;

        initiate(&ctx, "corr-1", 100).await;

        let result = ctx
            .payments
            .initiate_payment(NewPaymentIntent {
                correlation_id: "corr-1".to_string(),
                amount: 100,
                phone: "0712345678".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(PaymentsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );
    }

    #[tokio::test]
    async fn zero_amount_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .payments
            .initiate_payment(NewPaymentIntent {
                correlation_id: "corr-1".to_string(),
                amount: 0,
                phone: "0712345678".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(PaymentsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn blank_phone_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .payments
            .initiate_payment(NewPaymentIntent {
                correlation_id: "corr-1".to_string(),
                amount: 10,
                phone: " ".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(PaymentsServiceError::MissingRequiredData)),
            "expected MissingRequiredData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn success_callback_marks_order_paid() -> TestResult {
        let ctx = TestContext::with_collaborators(
            acknowledging_gateway("ws_CO_1"),
            notifier_expecting(1),
            false,
        )
        .await;

        initiate(&ctx, "corr-1", 1000).await;
        let order = pending_order(&ctx, "corr-1", 1000).await;

        let settlement = ctx
            .payments
            .settle_callback(callback("ws_CO_1", 0, Some("ABC123")))
            .await?;

        assert_eq!(
            settlement,
            CallbackSettlement::Paid {
                receipt_number: "ABC123".to_string(),
                order: Some(order.uuid),
            }
        );

        let orders = ctx.orders.list_orders().await?;
        let paid: Vec<_> = orders
            .iter()
            .filter(|order| order.payment_status == PaymentStatus::Paid)
            .collect();

        assert_eq!(paid.len(), 1);
        assert!(
            paid.iter()
                .all(|paid| paid.uuid == order.uuid
                    && paid.transaction_id.as_deref() == Some("ABC123")),
            "expected {} paid with ABC123, got {paid:?}",
            order.uuid
        );
        assert_eq!(intent_status(&ctx, "corr-1").await, "paid");

        Ok(())
    }

    #[tokio::test]
    async fn failure_callback_only_changes_status() -> TestResult {
        let ctx = TestContext::with_collaborators(
            acknowledging_gateway("ws_CO_1"),
            MockNotifier::new(),
            false,
        )
        .await;

        initiate(&ctx, "corr-1", 1000).await;
        let before = pending_order(&ctx, "corr-1", 1000).await;

        let settlement = ctx
            .payments
            .settle_callback(callback("ws_CO_1", 1032, None))
            .await?;

        assert_eq!(
            settlement,
            CallbackSettlement::Failed {
                result_code: 1032,
                order: Some(before.uuid),
            }
        );

        let after = ctx.orders.get_order(before.uuid).await?;

        assert_eq!(after.payment_status, PaymentStatus::Failed);
        assert_eq!(
            OrderRecord {
                payment_status: PaymentStatus::Pending,
                updated_at: before.updated_at,
                ..after
            },
            before
        );

        Ok(())
    }

    #[tokio::test]
    async fn replayed_callback_changes_nothing() -> TestResult {
        let ctx = TestContext::with_collaborators(
            acknowledging_gateway("ws_CO_1"),
            notifier_expecting(1),
            false,
        )
        .await;

        initiate(&ctx, "corr-1", 1000).await;
        let order = pending_order(&ctx, "corr-1", 1000).await;

        ctx.payments
            .settle_callback(callback("ws_CO_1", 0, Some("ABC123")))
            .await?;

        let first = ctx.orders.get_order(order.uuid).await?;

        let replay = ctx
            .payments
            .settle_callback(callback("ws_CO_1", 0, Some("XYZ789")))
            .await?;

        assert_eq!(replay, CallbackSettlement::Replayed);

        let second = ctx.orders.get_order(order.uuid).await?;

        assert_eq!(second, first);
        assert_eq!(second.transaction_id.as_deref(), Some("ABC123"));

        Ok(())
    }

    #[tokio::test]
    async fn late_failure_does_not_undo_payment() -> TestResult {
        let ctx = TestContext::with_collaborators(
            acknowledging_gateway("ws_CO_1"),
            notifier_expecting(1),
            false,
        )
        .await;

        initiate(&ctx, "corr-1", 1000).await;
        let order = pending_order(&ctx, "corr-1", 1000).await;

        ctx.payments
            .settle_callback(callback("ws_CO_1", 0, Some("ABC123")))
            .await?;

        let replay = ctx
            .payments
            .settle_callback(callback("ws_CO_1", 1037, None))
            .await?;

        assert_eq!(replay, CallbackSettlement::Replayed);
        assert_eq!(
            ctx.orders.get_order(order.uuid).await?.payment_status,
            PaymentStatus::Paid
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_checkout_request_is_ignored() -> TestResult {
        let ctx = TestContext::new().await;

        let settlement = ctx
            .payments
            .settle_callback(callback("ws_CO_missing", 0, Some("ABC123")))
            .await?;

        assert_eq!(settlement, CallbackSettlement::UnknownCheckoutRequest);

        Ok(())
    }

    #[tokio::test]
    async fn success_without_receipt_leaves_intent_pending() -> TestResult {
        let ctx = TestContext::with_collaborators(
            acknowledging_gateway("ws_CO_1"),
            MockNotifier::new(),
            false,
        )
        .await;

        initiate(&ctx, "corr-1", 1000).await;

        let settlement = ctx
            .payments
            .settle_callback(callback("ws_CO_1", 0, None))
            .await?;

        assert_eq!(settlement, CallbackSettlement::MissingReceipt);
        assert_eq!(intent_status(&ctx, "corr-1").await, "pending");

        Ok(())
    }
}
