use crate::models::Payment;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, Result as SqlxResult, SqlitePool};
use uuid::Uuid;

const PAYMENT_COLUMNS: &str = "id, member_id, payment_type, amount, processing_fee, net_amount, \
     payment_date, payment_method, status, receipt_number, reference_payment_id, \
     reference_attendance_id, description, journal_entry_id, created_at";

/// Fields accepted when recording a payment
pub struct NewPayment {
    pub member_id: Uuid,
    pub payment_type: String,
    pub amount: f64,
    pub processing_fee: f64,
    pub net_amount: f64,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    pub status: String,
    pub receipt_number: Option<String>,
    pub reference_payment_id: Option<Uuid>,
    pub reference_attendance_id: Option<Uuid>,
    pub description: Option<String>,
}

/// Revenue rollup keyed by payment type or method
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RevenueBreakdown {
    pub key: String,
    pub total: f64,
    pub count: i64,
}

/// Revenue per period (day or month key)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RevenueByPeriod {
    pub period: String,
    pub total_amount: f64,
    pub transaction_count: i64,
}

/// One payment row with the member's name joined in
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PaymentActivityEntry {
    pub member_id: Uuid,
    pub member_name: String,
    pub amount: f64,
    pub payment_type: String,
    pub payment_date: NaiveDate,
}

/// Repository for payment data access
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Create a new PaymentRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a payment record
    pub async fn create(&self, new: NewPayment) -> SqlxResult<Payment> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, Payment>(&format!(
            r#"
            INSERT INTO payments (
                id, member_id, payment_type, amount, processing_fee, net_amount,
                payment_date, payment_method, status, receipt_number,
                reference_payment_id, reference_attendance_id, description,
                journal_entry_id, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, NULL, ?14)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(new.member_id)
        .bind(&new.payment_type)
        .bind(new.amount)
        .bind(new.processing_fee)
        .bind(new.net_amount)
        .bind(new.payment_date)
        .bind(&new.payment_method)
        .bind(&new.status)
        .bind(&new.receipt_number)
        .bind(new.reference_payment_id)
        .bind(new.reference_attendance_id)
        .bind(&new.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a payment by UUID
    pub async fn find_by_id(&self, id: Uuid) -> SqlxResult<Option<Payment>> {
        sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Update a payment's record status
    pub async fn set_status(&self, id: Uuid, status: &str) -> SqlxResult<()> {
        sqlx::query("UPDATE payments SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Attach the posted journal entry to a payment
    pub async fn set_journal_entry(&self, id: Uuid, journal_entry_id: Uuid) -> SqlxResult<()> {
        sqlx::query("UPDATE payments SET journal_entry_id = ?2 WHERE id = ?1")
            .bind(id)
            .bind(journal_entry_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Find the payment referencing an attendance record, if any
    pub async fn find_by_attendance(&self, attendance_id: Uuid) -> SqlxResult<Option<Payment>> {
        sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE reference_attendance_id = ?1"
        ))
        .bind(attendance_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Count completed payments (used for receipt numbering)
    pub async fn count_completed(&self) -> SqlxResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE status = 'completed'")
            .fetch_one(&self.pool)
            .await
    }

    /// Sum of completed payment amounts for a member (refund counter-records
    /// net out through their negative amounts)
    pub async fn total_completed_for_member(&self, member_id: Uuid) -> SqlxResult<f64> {
        sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0.0) FROM payments
            WHERE member_id = ?1 AND status IN ('completed', 'refunded')
            "#,
        )
        .bind(member_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Sum of refunds already issued against a payment (as a positive figure)
    pub async fn total_refunded_for(&self, payment_id: Uuid) -> SqlxResult<f64> {
        sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(-amount), 0.0) FROM payments
            WHERE reference_payment_id = ?1 AND payment_type = 'refund'
              AND status = 'completed'
            "#,
        )
        .bind(payment_id)
        .fetch_one(&self.pool)
        .await
    }

    /// A member's payment history, most recent first
    pub async fn find_by_member(&self, member_id: Uuid, limit: i64) -> SqlxResult<Vec<Payment>> {
        sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS} FROM payments
            WHERE member_id = ?1
            ORDER BY payment_date DESC
            LIMIT ?2
            "#
        ))
        .bind(member_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Completed revenue in a date window
    pub async fn revenue_between(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> SqlxResult<f64> {
        sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0.0) FROM payments
            WHERE status = 'completed'
              AND (?1 IS NULL OR payment_date >= ?1)
              AND (?2 IS NULL OR payment_date <= ?2)
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
    }

    /// Completed revenue per payment type in a date window, largest first
    pub async fn revenue_by_type(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> SqlxResult<Vec<RevenueBreakdown>> {
        sqlx::query_as::<_, RevenueBreakdown>(
            r#"
            SELECT payment_type as key, COALESCE(SUM(amount), 0.0) as total, COUNT(*) as count
            FROM payments
            WHERE status = 'completed'
              AND (?1 IS NULL OR payment_date >= ?1)
              AND (?2 IS NULL OR payment_date <= ?2)
            GROUP BY payment_type
            ORDER BY total DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }

    /// Completed revenue per payment method in a date window, largest first
    pub async fn revenue_by_method(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> SqlxResult<Vec<RevenueBreakdown>> {
        sqlx::query_as::<_, RevenueBreakdown>(
            r#"
            SELECT payment_method as key, COALESCE(SUM(amount), 0.0) as total, COUNT(*) as count
            FROM payments
            WHERE status = 'completed'
              AND (?1 IS NULL OR payment_date >= ?1)
              AND (?2 IS NULL OR payment_date <= ?2)
            GROUP BY payment_method
            ORDER BY total DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }

    /// Completed revenue per period. Periods are day keys for short windows
    /// and month keys otherwise.
    pub async fn revenue_by_period(
        &self,
        since: NaiveDate,
        until: NaiveDate,
        by_month: bool,
    ) -> SqlxResult<Vec<RevenueByPeriod>> {
        let group = if by_month {
            "strftime('%Y-%m', payment_date)"
        } else {
            "date(payment_date)"
        };

        sqlx::query_as::<_, RevenueByPeriod>(&format!(
            r#"
            SELECT {group} as period,
                   COALESCE(SUM(amount), 0.0) as total_amount,
                   COUNT(*) as transaction_count
            FROM payments
            WHERE status = 'completed' AND payment_date >= ?1 AND payment_date <= ?2
            GROUP BY period
            ORDER BY period
            "#
        ))
        .bind(since)
        .bind(until)
        .fetch_all(&self.pool)
        .await
    }

    /// Recent completed payments with member names, most recent first
    pub async fn find_recent_completed(
        &self,
        since: NaiveDate,
        limit: i64,
    ) -> SqlxResult<Vec<PaymentActivityEntry>> {
        sqlx::query_as::<_, PaymentActivityEntry>(
            r#"
            SELECT p.member_id, m.member_name, p.amount, p.payment_type, p.payment_date
            FROM payments p
            JOIN members m ON p.member_id = m.id
            WHERE p.status = 'completed' AND p.payment_date >= ?1
            ORDER BY p.payment_date DESC
            LIMIT ?2
            "#,
        )
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
