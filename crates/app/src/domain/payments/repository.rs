//! Payment Intents Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::{amount_to_db, try_get_amount},
    domain::payments::records::{PaymentIntentRecord, PaymentIntentUuid, PaymentStatus},
};

const CREATE_INTENT_SQL: &str = include_str!("sql/create_intent.sql");
const RECORD_ACKNOWLEDGEMENT_SQL: &str = include_str!("sql/record_acknowledgement.sql");
const FAIL_INITIATION_SQL: &str = include_str!("sql/fail_initiation.sql");
const FIND_INTENT_BY_CHECKOUT_REQUEST_SQL: &str =
    include_str!("sql/find_intent_by_checkout_request.sql");
const FIND_INTENT_BY_CORRELATION_ID_SQL: &str =
    include_str!("sql/find_intent_by_correlation_id.sql");
const SETTLE_INTENT_SQL: &str = include_str!("sql/settle_intent.sql");
const RECORD_LATE_RECEIPT_SQL: &str = include_str!("sql/record_late_receipt.sql");
const EXPIRE_STALE_INTENTS_SQL: &str = include_str!("sql/expire_stale_intents.sql");

/// Terminal values written to an intent when it settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IntentSettlement<'a> {
    pub status: PaymentStatus,
    pub receipt_number: Option<&'a str>,
    pub result_code: Option<i64>,
    pub result_description: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentIntentsRepository;

impl PgPaymentIntentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_intent(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        intent: PaymentIntentUuid,
        correlation_id: &str,
        amount: u64,
        phone: &str,
    ) -> Result<PaymentIntentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentIntentRecord>(CREATE_INTENT_SQL)
            .bind(intent.into_uuid())
            .bind(correlation_id)
            .bind(amount_to_db("amount", amount)?)
            .bind(phone)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn record_acknowledgement(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        intent: PaymentIntentUuid,
        merchant_request_id: &str,
        checkout_request_id: &str,
    ) -> Result<PaymentIntentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentIntentRecord>(RECORD_ACKNOWLEDGEMENT_SQL)
            .bind(intent.into_uuid())
            .bind(merchant_request_id)
            .bind(checkout_request_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn fail_initiation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        intent: PaymentIntentUuid,
        reason: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(FAIL_INITIATION_SQL)
            .bind(intent.into_uuid())
            .bind(reason)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Find and lock the intent a callback refers to.
    pub(crate) async fn find_by_checkout_request_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        checkout_request_id: &str,
    ) -> Result<Option<PaymentIntentRecord>, sqlx::Error> {
        query_as::<Postgres, PaymentIntentRecord>(FIND_INTENT_BY_CHECKOUT_REQUEST_SQL)
            .bind(checkout_request_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Find and lock the intent an order references.
    pub(crate) async fn find_by_correlation_id_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        correlation_id: &str,
    ) -> Result<Option<PaymentIntentRecord>, sqlx::Error> {
        query_as::<Postgres, PaymentIntentRecord>(FIND_INTENT_BY_CORRELATION_ID_SQL)
            .bind(correlation_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Move a `Pending` intent to a terminal status.
    ///
    /// Returns `None` when the intent had already settled.
    pub(crate) async fn settle_intent(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        intent: PaymentIntentUuid,
        settlement: &IntentSettlement<'_>,
    ) -> Result<Option<PaymentIntentRecord>, sqlx::Error> {
        query_as::<Postgres, PaymentIntentRecord>(SETTLE_INTENT_SQL)
            .bind(intent.into_uuid())
            .bind(settlement.status.as_str())
            .bind(settlement.receipt_number)
            .bind(settlement.result_code)
            .bind(settlement.result_description)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Keep the receipt of a payment confirmed after its intent failed.
    ///
    /// The status stays `Failed`. Returns `None` when the intent is not
    /// failed or already carries a receipt.
    pub(crate) async fn record_late_receipt(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        intent: PaymentIntentUuid,
        receipt_number: &str,
    ) -> Result<Option<PaymentIntentRecord>, sqlx::Error> {
        query_as::<Postgres, PaymentIntentRecord>(RECORD_LATE_RECEIPT_SQL)
            .bind(intent.into_uuid())
            .bind(receipt_number)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Fail every `Pending` intent created before `cutoff`, returning their
    /// correlation ids.
    pub(crate) async fn expire_stale_intents(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cutoff: Timestamp,
    ) -> Result<Vec<String>, sqlx::Error> {
        query_scalar::<Postgres, String>(EXPIRE_STALE_INTENTS_SQL)
            .bind(SqlxTimestamp::from(cutoff))
            .fetch_all(&mut **tx)
            .await
    }
}

pub(crate) fn try_get_status(row: &PgRow, column: &str) -> Result<PaymentStatus, sqlx::Error> {
    let status: String = row.try_get(column)?;

    status
        .parse::<PaymentStatus>()
        .map_err(|error| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(error),
        })
}

impl<'r> FromRow<'r, PgRow> for PaymentIntentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PaymentIntentUuid::from_uuid(row.try_get("uuid")?),
            correlation_id: row.try_get("correlation_id")?,
            amount: try_get_amount(row, "amount")?,
            phone: row.try_get("phone")?,
            status: try_get_status(row, "status")?,
            merchant_request_id: row.try_get("merchant_request_id")?,
            checkout_request_id: row.try_get("checkout_request_id")?,
            receipt_number: row.try_get("receipt_number")?,
            result_code: row.try_get("result_code")?,
            result_description: row.try_get("result_description")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
