use crate::models::Promotion;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, Result as SqlxResult, SqlitePool};
use uuid::Uuid;

const PROMOTION_COLUMNS: &str = "id, member_id, from_belt, to_belt, promotion_date, instructor, \
     notes, time_in_previous_belt_months, status, certificate_issued, created_at";

/// One promotion row with the member's name joined in
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PromotionHistoryEntry {
    pub id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub from_belt: String,
    pub to_belt: String,
    pub promotion_date: NaiveDate,
    pub instructor: String,
    pub time_in_previous_belt_months: i64,
}

/// Promotions granted per target belt and month
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PromotionsByMonth {
    pub to_belt: String,
    pub month: i64,
    pub count: i64,
}

/// Average months held before reaching each belt
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AveragePromotionTime {
    pub to_belt: String,
    pub avg_months: f64,
}

/// Repository for promotion data access
pub struct PromotionRepository {
    pool: SqlitePool,
}

impl PromotionRepository {
    /// Create a new PromotionRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an approved promotion record
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        member_id: Uuid,
        from_belt: &str,
        to_belt: &str,
        promotion_date: NaiveDate,
        instructor: &str,
        notes: Option<&str>,
        time_in_previous_belt_months: i64,
    ) -> SqlxResult<Promotion> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, Promotion>(&format!(
            r#"
            INSERT INTO promotions (
                id, member_id, from_belt, to_belt, promotion_date, instructor,
                notes, time_in_previous_belt_months, status, certificate_issued, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'approved', 0, ?9)
            RETURNING {PROMOTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(member_id)
        .bind(from_belt)
        .bind(to_belt)
        .bind(promotion_date)
        .bind(instructor)
        .bind(notes)
        .bind(time_in_previous_belt_months)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a promotion by UUID
    pub async fn find_by_id(&self, id: Uuid) -> SqlxResult<Option<Promotion>> {
        sqlx::query_as::<_, Promotion>(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Flip a promotion's status (append-only records: never deleted)
    pub async fn set_status(&self, id: Uuid, status: &str) -> SqlxResult<()> {
        sqlx::query("UPDATE promotions SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Mark the certificate as issued
    pub async fn set_certificate_issued(&self, id: Uuid) -> SqlxResult<()> {
        sqlx::query("UPDATE promotions SET certificate_issued = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// The member's most recent approved promotion strictly before the given
    /// date. Used to restore belt state when a promotion is cancelled.
    pub async fn find_latest_approved_before(
        &self,
        member_id: Uuid,
        before: NaiveDate,
    ) -> SqlxResult<Option<Promotion>> {
        sqlx::query_as::<_, Promotion>(&format!(
            r#"
            SELECT {PROMOTION_COLUMNS} FROM promotions
            WHERE member_id = ?1 AND status = 'approved' AND promotion_date < ?2
            ORDER BY promotion_date DESC
            LIMIT 1
            "#
        ))
        .bind(member_id)
        .bind(before)
        .fetch_optional(&self.pool)
        .await
    }

    /// Approved promotions for one member, most recent first
    pub async fn find_by_member(&self, member_id: Uuid) -> SqlxResult<Vec<Promotion>> {
        sqlx::query_as::<_, Promotion>(&format!(
            r#"
            SELECT {PROMOTION_COLUMNS} FROM promotions
            WHERE member_id = ?1 AND status = 'approved'
            ORDER BY promotion_date DESC
            "#
        ))
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Approved promotion history, optionally filtered to one member
    pub async fn find_history(
        &self,
        member_id: Option<Uuid>,
        limit: i64,
    ) -> SqlxResult<Vec<PromotionHistoryEntry>> {
        sqlx::query_as::<_, PromotionHistoryEntry>(
            r#"
            SELECT p.id, p.member_id, m.member_name, p.from_belt, p.to_belt,
                   p.promotion_date, p.instructor, p.time_in_previous_belt_months
            FROM promotions p
            JOIN members m ON p.member_id = m.id
            WHERE p.status = 'approved' AND (?1 IS NULL OR p.member_id = ?1)
            ORDER BY p.promotion_date DESC
            LIMIT ?2
            "#,
        )
        .bind(member_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Count approved promotions dated on or after the given date
    pub async fn count_since(&self, since: NaiveDate) -> SqlxResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM promotions WHERE status = 'approved' AND promotion_date >= ?1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
    }

    /// Recent approved promotions with member names, most recent first
    pub async fn find_recent(
        &self,
        since: NaiveDate,
        limit: i64,
    ) -> SqlxResult<Vec<PromotionHistoryEntry>> {
        sqlx::query_as::<_, PromotionHistoryEntry>(
            r#"
            SELECT p.id, p.member_id, m.member_name, p.from_belt, p.to_belt,
                   p.promotion_date, p.instructor, p.time_in_previous_belt_months
            FROM promotions p
            JOIN members m ON p.member_id = m.id
            WHERE p.status = 'approved' AND p.promotion_date >= ?1
            ORDER BY p.promotion_date DESC
            LIMIT ?2
            "#,
        )
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Promotions granted in a calendar year, per target belt and month
    pub async fn counts_by_month(&self, year: i32) -> SqlxResult<Vec<PromotionsByMonth>> {
        sqlx::query_as::<_, PromotionsByMonth>(
            r#"
            SELECT to_belt,
                   CAST(strftime('%m', promotion_date) AS INTEGER) as month,
                   COUNT(*) as count
            FROM promotions
            WHERE status = 'approved'
              AND CAST(strftime('%Y', promotion_date) AS INTEGER) = ?1
            GROUP BY to_belt, month
            ORDER BY month,
                CASE to_belt
                    WHEN 'blue' THEN 1 WHEN 'purple' THEN 2 WHEN 'brown' THEN 3
                    WHEN 'black' THEN 4 WHEN 'coral' THEN 5 WHEN 'red' THEN 6
                    ELSE 7 END
            "#,
        )
        .bind(year as i64)
        .fetch_all(&self.pool)
        .await
    }

    /// Average months held in the previous belt, per target belt
    pub async fn average_time_by_belt(&self) -> SqlxResult<Vec<AveragePromotionTime>> {
        sqlx::query_as::<_, AveragePromotionTime>(
            r#"
            SELECT to_belt, AVG(CAST(time_in_previous_belt_months AS REAL)) as avg_months
            FROM promotions
            WHERE status = 'approved' AND time_in_previous_belt_months > 0
            GROUP BY to_belt
            ORDER BY
                CASE to_belt
                    WHEN 'blue' THEN 1 WHEN 'purple' THEN 2 WHEN 'brown' THEN 3
                    WHEN 'black' THEN 4 WHEN 'coral' THEN 5 WHEN 'red' THEN 6
                    ELSE 7 END
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
