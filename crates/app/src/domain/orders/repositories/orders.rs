//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{amount_to_db, try_get_amount},
    domain::{
        orders::{
            data::NewOrder,
            records::{OrderRecord, OrderUuid, PAYMENT_METHOD_MPESA},
        },
        payments::{records::PaymentStatus, repository::try_get_status},
    },
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const SETTLE_ORDER_BY_REFERENCE_SQL: &str = include_str!("../sql/settle_order_by_reference.sql");
const EXPIRE_ORDERS_BY_REFERENCE_SQL: &str = include_str!("../sql/expire_orders_by_reference.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
        payment_status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.customer_name.trim())
            .bind(order.email.trim())
            .bind(order.phone.trim())
            .bind(order.delivery_location.trim())
            .bind(amount_to_db("total_amount", order.total_amount)?)
            .bind(amount_to_db("delivery_fee", order.delivery_fee)?)
            .bind(PAYMENT_METHOD_MPESA)
            .bind(payment_status.as_str())
            .bind(transaction_id)
            .bind(order.payment_reference())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Move the `Pending` order paid for by `payment_reference` to a terminal
    /// status. Returns `None` when no such pending order exists.
    pub(crate) async fn settle_order_by_reference(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment_reference: &str,
        status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(SETTLE_ORDER_BY_REFERENCE_SQL)
            .bind(payment_reference)
            .bind(status.as_str())
            .bind(transaction_id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn expire_orders_by_reference(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment_references: &[String],
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(EXPIRE_ORDERS_BY_REFERENCE_SQL)
            .bind(payment_references)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer_name: row.try_get("customer_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            delivery_location: row.try_get("delivery_location")?,
            items: Vec::new(),
            total_amount: try_get_amount(row, "total_amount")?,
            delivery_fee: try_get_amount(row, "delivery_fee")?,
            payment_method: row.try_get("payment_method")?,
            payment_status: try_get_status(row, "payment_status")?,
            transaction_id: row.try_get("transaction_id")?,
            payment_reference: row.try_get("payment_reference")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
