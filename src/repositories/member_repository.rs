use crate::models::Member;
use chrono::{NaiveDate, Utc};
use sqlx::{Result as SqlxResult, SqlitePool};
use uuid::Uuid;

const MEMBER_COLUMNS: &str = "id, member_name, email, phone, date_of_birth, join_date, status, \
     membership_type, monthly_fee, current_belt, belt_promotion_date, last_payment_date, \
     next_payment_due, payment_status, outstanding_amount, total_paid, last_attendance_date, \
     created_at, updated_at";

/// Fields accepted when enrolling a member
pub struct NewMember {
    pub member_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub join_date: NaiveDate,
    pub membership_type: String,
    pub monthly_fee: f64,
    pub current_belt: String,
}

/// Repository for member data access
pub struct MemberRepository {
    pool: SqlitePool,
}

impl MemberRepository {
    /// Create a new MemberRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new member
    pub async fn create(&self, new: NewMember) -> SqlxResult<Member> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, Member>(&format!(
            r#"
            INSERT INTO members (
                id, member_name, email, phone, date_of_birth, join_date, status,
                membership_type, monthly_fee, current_belt, payment_status,
                outstanding_amount, total_paid, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'active', ?7, ?8, ?9, 'paid', 0, 0, ?10, ?10)
            RETURNING {MEMBER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&new.member_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.date_of_birth)
        .bind(new.join_date)
        .bind(&new.membership_type)
        .bind(new.monthly_fee)
        .bind(&new.current_belt)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a member by UUID
    pub async fn find_by_id(&self, id: Uuid) -> SqlxResult<Option<Member>> {
        sqlx::query_as::<_, Member>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Check whether an email is already registered to a different member
    pub async fn email_taken(&self, email: &str, exclude: Option<Uuid>) -> SqlxResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM members
            WHERE email = ?1 AND (?2 IS NULL OR id != ?2)
            "#,
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Update membership status
    pub async fn set_status(&self, id: Uuid, status: &str) -> SqlxResult<()> {
        sqlx::query("UPDATE members SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(Utc::now().naive_utc())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Update belt rank and the date it was awarded. Passing `None` for the
    /// date clears it (first-belt cancellation path).
    pub async fn update_belt(
        &self,
        id: Uuid,
        belt: &str,
        promotion_date: Option<NaiveDate>,
    ) -> SqlxResult<()> {
        sqlx::query(
            "UPDATE members SET current_belt = ?2, belt_promotion_date = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(belt)
        .bind(promotion_date)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Roll the billing cycle forward after a completed membership payment
    pub async fn update_billing(
        &self,
        id: Uuid,
        last_payment_date: NaiveDate,
        next_payment_due: NaiveDate,
        payment_status: &str,
    ) -> SqlxResult<()> {
        sqlx::query(
            r#"
            UPDATE members
            SET last_payment_date = ?2, next_payment_due = ?3, payment_status = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(last_payment_date)
        .bind(next_payment_due)
        .bind(payment_status)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Set the next dues date without touching the payment history (used at
    /// enrollment, before any payment exists)
    pub async fn set_next_payment_due(&self, id: Uuid, due: NaiveDate) -> SqlxResult<()> {
        sqlx::query("UPDATE members SET next_payment_due = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(due)
            .bind(Utc::now().naive_utc())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Store recomputed financial rollups
    pub async fn update_financials(
        &self,
        id: Uuid,
        total_paid: f64,
        outstanding_amount: f64,
        payment_status: &str,
    ) -> SqlxResult<()> {
        sqlx::query(
            r#"
            UPDATE members
            SET total_paid = ?2, outstanding_amount = ?3, payment_status = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(total_paid)
        .bind(outstanding_amount)
        .bind(payment_status)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Record the most recent date the member was on the mats
    pub async fn set_last_attendance_date(&self, id: Uuid, date: NaiveDate) -> SqlxResult<()> {
        sqlx::query("UPDATE members SET last_attendance_date = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(date)
            .bind(Utc::now().naive_utc())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Count all members
    pub async fn count_all(&self) -> SqlxResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await
    }

    /// Count active members
    pub async fn count_active(&self) -> SqlxResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE status = 'active'")
            .fetch_one(&self.pool)
            .await
    }

    /// Count members who joined on or after the given date
    pub async fn count_joined_since(&self, since: NaiveDate) -> SqlxResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE join_date >= ?1")
            .bind(since)
            .fetch_one(&self.pool)
            .await
    }

    /// Count members who joined before the given date
    pub async fn count_joined_before(&self, before: NaiveDate) -> SqlxResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE join_date < ?1")
            .bind(before)
            .fetch_one(&self.pool)
            .await
    }

    /// Count active members in the given payment standing
    pub async fn count_by_payment_status(&self, payment_status: &str) -> SqlxResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM members WHERE status = 'active' AND payment_status = ?1",
        )
        .bind(payment_status)
        .fetch_one(&self.pool)
        .await
    }

    /// Active members per belt, in promotion order
    pub async fn belt_distribution(&self) -> SqlxResult<Vec<(String, i64)>> {
        sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT current_belt, COUNT(*) as count
            FROM members
            WHERE status = 'active'
            GROUP BY current_belt
            ORDER BY CASE current_belt
                WHEN 'white' THEN 0 WHEN 'blue' THEN 1 WHEN 'purple' THEN 2
                WHEN 'brown' THEN 3 WHEN 'black' THEN 4 WHEN 'coral' THEN 5
                WHEN 'red' THEN 6 ELSE 7 END
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Active members per payment standing
    pub async fn payment_status_distribution(&self) -> SqlxResult<Vec<(String, i64)>> {
        sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT payment_status, COUNT(*) as count
            FROM members
            WHERE status = 'active'
            GROUP BY payment_status
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Sum of monthly fees across active members
    pub async fn monthly_fee_total(&self) -> SqlxResult<f64> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(monthly_fee), 0.0) FROM members WHERE status = 'active'",
        )
        .fetch_one(&self.pool)
        .await
    }

    /// Active members who joined on or after the given date
    pub async fn find_joined_since(&self, since: NaiveDate, limit: i64) -> SqlxResult<Vec<Member>> {
        sqlx::query_as::<_, Member>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS} FROM members
            WHERE status = 'active' AND join_date >= ?1
            ORDER BY join_date DESC
            LIMIT ?2
            "#
        ))
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Active members whose payment standing is overdue
    pub async fn find_overdue(&self, limit: i64) -> SqlxResult<Vec<Member>> {
        sqlx::query_as::<_, Member>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS} FROM members
            WHERE status = 'active' AND payment_status = 'overdue'
            ORDER BY outstanding_amount DESC
            LIMIT ?1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Active members with no present attendance since the cutoff date
    pub async fn find_inactive_since(
        &self,
        cutoff: NaiveDate,
        limit: i64,
    ) -> SqlxResult<Vec<Member>> {
        sqlx::query_as::<_, Member>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS} FROM members m
            WHERE m.status = 'active'
              AND (m.last_attendance_date IS NULL OR m.last_attendance_date < ?1)
            ORDER BY m.last_attendance_date
            LIMIT ?2
            "#
        ))
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Active members past the months-in-belt threshold for their current
    /// belt (12/24/24/12 months, 36 past brown)
    pub async fn find_promotion_candidates(
        &self,
        today: NaiveDate,
        limit: i64,
    ) -> SqlxResult<Vec<Member>> {
        sqlx::query_as::<_, Member>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS} FROM members
            WHERE status = 'active'
              AND (julianday(?1) - julianday(COALESCE(belt_promotion_date, join_date))) / 30 >=
                  CASE current_belt
                      WHEN 'white' THEN 12
                      WHEN 'blue' THEN 24
                      WHEN 'purple' THEN 24
                      WHEN 'brown' THEN 12
                      ELSE 36
                  END
            LIMIT ?2
            "#
        ))
        .bind(today)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Active members with a birthday on the given month and day
    pub async fn find_birthdays(&self, month: u32, day: u32, limit: i64) -> SqlxResult<Vec<Member>> {
        sqlx::query_as::<_, Member>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS} FROM members
            WHERE status = 'active'
              AND date_of_birth IS NOT NULL
              AND CAST(strftime('%m', date_of_birth) AS INTEGER) = ?1
              AND CAST(strftime('%d', date_of_birth) AS INTEGER) = ?2
            LIMIT ?3
            "#
        ))
        .bind(month as i64)
        .bind(day as i64)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Members switched to inactive since the cutoff (recent cancellations)
    pub async fn find_recently_deactivated(
        &self,
        cutoff: NaiveDate,
        limit: i64,
    ) -> SqlxResult<Vec<Member>> {
        sqlx::query_as::<_, Member>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS} FROM members
            WHERE status = 'inactive' AND date(updated_at) >= date(?1)
            ORDER BY updated_at DESC
            LIMIT ?2
            "#
        ))
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// New members per period since the window start. Periods are day keys
    /// for short windows and month keys otherwise.
    pub async fn growth_by_period(
        &self,
        since: NaiveDate,
        until: NaiveDate,
        by_month: bool,
    ) -> SqlxResult<Vec<(String, i64)>> {
        let group = if by_month {
            "strftime('%Y-%m', join_date)"
        } else {
            "date(join_date)"
        };

        sqlx::query_as::<_, (String, i64)>(&format!(
            r#"
            SELECT {group} as period, COUNT(*) as new_members
            FROM members
            WHERE join_date >= ?1 AND join_date <= ?2
            GROUP BY period
            ORDER BY period
            "#
        ))
        .bind(since)
        .bind(until)
        .fetch_all(&self.pool)
        .await
    }
}
