use crate::models::Attendance;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Result as SqlxResult, SqlitePool};
use uuid::Uuid;

const ATTENDANCE_COLUMNS: &str = "id, class_id, member_id, status, member_type, check_in_time, \
     payment_required, payment_amount, payment_status, notes, created_at";

/// Attendance totals for one member
#[derive(Debug, Clone, Serialize)]
pub struct MemberAttendanceStats {
    pub total_classes: i64,
    pub attended: i64,
    pub missed: i64,
    pub attendance_rate: f64,
}

/// One row of a class roster, with the member's name joined in
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RosterEntry {
    pub member_id: Uuid,
    pub member_name: String,
    pub status: String,
    pub member_type: String,
    pub check_in_time: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

/// One row of a member's attendance history, with class details joined in
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MemberAttendanceEntry {
    pub class_id: Uuid,
    pub class_name: String,
    pub class_date: NaiveDate,
    pub status: String,
    pub member_type: String,
    pub check_in_time: Option<NaiveDateTime>,
    pub payment_amount: f64,
    pub payment_status: String,
    pub notes: Option<String>,
}

/// Attendance/revenue rollup per class type
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ClassTypeStat {
    pub class_type: String,
    pub total_attendance: i64,
    pub present_count: i64,
    pub attendance_rate: f64,
}

/// Attendance/revenue rollup per attendee tier
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttendeeTypeStat {
    pub member_type: String,
    pub count: i64,
    pub revenue: f64,
}

/// Registered/present counts per day
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DailyAttendanceTrend {
    pub class_date: NaiveDate,
    pub total_registered: i64,
    pub present_count: i64,
}

/// Repository for attendance data access
pub struct AttendanceRepository {
    pool: SqlitePool,
}

impl AttendanceRepository {
    /// Create a new AttendanceRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new attendance record. The UNIQUE (class_id, member_id)
    /// constraint rejects duplicates.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        class_id: Uuid,
        member_id: Uuid,
        status: &str,
        member_type: &str,
        payment_required: bool,
        payment_amount: f64,
        payment_status: &str,
        notes: Option<&str>,
    ) -> SqlxResult<Attendance> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, Attendance>(&format!(
            r#"
            INSERT INTO attendance (
                id, class_id, member_id, status, member_type, check_in_time,
                payment_required, payment_amount, payment_status, notes, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(class_id)
        .bind(member_id)
        .bind(status)
        .bind(member_type)
        .bind(now)
        .bind(payment_required)
        .bind(payment_amount)
        .bind(payment_status)
        .bind(notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Find an attendance record by UUID
    pub async fn find_by_id(&self, id: Uuid) -> SqlxResult<Option<Attendance>> {
        sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find the record for a (class, member) pair, if any
    pub async fn find_by_class_and_member(
        &self,
        class_id: Uuid,
        member_id: Uuid,
    ) -> SqlxResult<Option<Attendance>> {
        sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE class_id = ?1 AND member_id = ?2"
        ))
        .bind(class_id)
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Re-mark an existing record (status, tier, notes)
    pub async fn update_marking(
        &self,
        id: Uuid,
        status: &str,
        member_type: &str,
        notes: Option<&str>,
    ) -> SqlxResult<Attendance> {
        sqlx::query_as::<_, Attendance>(&format!(
            r#"
            UPDATE attendance
            SET status = ?2, member_type = ?3, notes = COALESCE(?4, notes)
            WHERE id = ?1
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(member_type)
        .bind(notes)
        .fetch_one(&self.pool)
        .await
    }

    /// Mark the per-class fee as collected
    pub async fn set_fee_paid(&self, id: Uuid, amount: f64) -> SqlxResult<()> {
        sqlx::query(
            "UPDATE attendance SET payment_amount = ?2, payment_status = 'paid' WHERE id = ?1",
        )
        .bind(id)
        .bind(amount)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Roster for a class, ordered by member name
    pub async fn class_roster(&self, class_id: Uuid) -> SqlxResult<Vec<RosterEntry>> {
        sqlx::query_as::<_, RosterEntry>(
            r#"
            SELECT a.member_id, m.member_name, a.status, a.member_type,
                   a.check_in_time, a.notes
            FROM attendance a
            JOIN members m ON a.member_id = m.id
            WHERE a.class_id = ?1
            ORDER BY m.member_name
            "#,
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await
    }

    /// A member's attendance history, most recent class first
    pub async fn find_by_member(
        &self,
        member_id: Uuid,
        limit: i64,
    ) -> SqlxResult<Vec<MemberAttendanceEntry>> {
        sqlx::query_as::<_, MemberAttendanceEntry>(
            r#"
            SELECT a.class_id, c.class_name, c.class_date, a.status, a.member_type,
                   a.check_in_time, a.payment_amount, a.payment_status, a.notes
            FROM attendance a
            JOIN classes c ON a.class_id = c.id
            WHERE a.member_id = ?1
            ORDER BY c.class_date DESC
            LIMIT ?2
            "#,
        )
        .bind(member_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Attendance totals and rate for a member
    pub async fn member_stats(&self, member_id: Uuid) -> SqlxResult<MemberAttendanceStats> {
        let (total, attended, missed): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(CASE WHEN status = 'present' THEN 1 ELSE 0 END), 0),
                   COALESCE(SUM(CASE WHEN status = 'absent' THEN 1 ELSE 0 END), 0)
            FROM attendance
            WHERE member_id = ?1
            "#,
        )
        .bind(member_id)
        .fetch_one(&self.pool)
        .await?;

        let attendance_rate = if total > 0 {
            attended as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Ok(MemberAttendanceStats {
            total_classes: total,
            attended,
            missed,
            attendance_rate,
        })
    }

    /// Present attendees of a class, split by tier: (total, drop-ins, members)
    pub async fn class_present_breakdown(&self, class_id: Uuid) -> SqlxResult<(i64, i64, i64)> {
        sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(CASE WHEN member_type IN ('drop_in', 'guest') THEN 1 ELSE 0 END), 0),
                   COALESCE(SUM(CASE WHEN member_type = 'member' THEN 1 ELSE 0 END), 0)
            FROM attendance
            WHERE class_id = ?1 AND status = 'present'
            "#,
        )
        .bind(class_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Per (status, tier) rollup for one class, with collected revenue
    pub async fn class_breakdown(
        &self,
        class_id: Uuid,
    ) -> SqlxResult<Vec<(String, String, i64, f64)>> {
        sqlx::query_as::<_, (String, String, i64, f64)>(
            r#"
            SELECT status, member_type, COUNT(*) as count,
                   COALESCE(SUM(CASE WHEN payment_required = 1 AND payment_status = 'paid'
                                     THEN payment_amount ELSE 0.0 END), 0.0) as revenue
            FROM attendance
            WHERE class_id = ?1
            GROUP BY status, member_type
            "#,
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Count of registered attendance rows for a class
    pub async fn count_by_class(&self, class_id: Uuid) -> SqlxResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE class_id = ?1")
            .bind(class_id)
            .fetch_one(&self.pool)
            .await
    }

    /// Count of present rows for a class
    pub async fn count_present_by_class(&self, class_id: Uuid) -> SqlxResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance WHERE class_id = ?1 AND status = 'present'",
        )
        .bind(class_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Collected fee revenue for a class
    pub async fn collected_revenue_by_class(&self, class_id: Uuid) -> SqlxResult<f64> {
        sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(CASE WHEN payment_required = 1 AND payment_status = 'paid'
                                     THEN payment_amount ELSE 0.0 END), 0.0)
            FROM attendance
            WHERE class_id = ?1
            "#,
        )
        .bind(class_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Present attendance count on a calendar date (joins the class schedule)
    pub async fn count_present_on(&self, date: NaiveDate) -> SqlxResult<i64> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM attendance a
            JOIN classes c ON a.class_id = c.id
            WHERE c.class_date = ?1 AND a.status = 'present'
            "#,
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await
    }

    /// Active members who were present at a class of the given type since
    /// the cutoff date, with their contact email
    pub async fn recent_attendees_of_type(
        &self,
        class_type: &str,
        since: NaiveDate,
    ) -> SqlxResult<Vec<(Uuid, String, Option<String>)>> {
        sqlx::query_as::<_, (Uuid, String, Option<String>)>(
            r#"
            SELECT DISTINCT m.id, m.member_name, m.email
            FROM attendance a
            JOIN classes c ON a.class_id = c.id
            JOIN members m ON a.member_id = m.id
            WHERE c.class_type = ?1
              AND c.class_date >= ?2
              AND a.status = 'present'
              AND m.status = 'active'
              AND m.email IS NOT NULL
            "#,
        )
        .bind(class_type)
        .bind(since)
        .fetch_all(&self.pool)
        .await
    }

    /// Attendance rollup per class type in a date window
    pub async fn stats_by_class_type(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> SqlxResult<Vec<ClassTypeStat>> {
        sqlx::query_as::<_, ClassTypeStat>(
            r#"
            SELECT c.class_type,
                   COUNT(a.id) as total_attendance,
                   COALESCE(SUM(CASE WHEN a.status = 'present' THEN 1 ELSE 0 END), 0) as present_count,
                   COALESCE(AVG(CASE WHEN a.status = 'present' THEN 1.0 ELSE 0.0 END), 0.0) * 100.0
                       as attendance_rate
            FROM attendance a
            JOIN classes c ON a.class_id = c.id
            WHERE (?1 IS NULL OR c.class_date >= ?1)
              AND (?2 IS NULL OR c.class_date <= ?2)
            GROUP BY c.class_type
            ORDER BY total_attendance DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }

    /// Attendance rollup per attendee tier in a date window
    pub async fn stats_by_attendee_type(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> SqlxResult<Vec<AttendeeTypeStat>> {
        sqlx::query_as::<_, AttendeeTypeStat>(
            r#"
            SELECT a.member_type,
                   COUNT(a.id) as count,
                   COALESCE(SUM(CASE WHEN a.payment_required = 1 AND a.payment_status = 'paid'
                                     THEN a.payment_amount ELSE 0.0 END), 0.0) as revenue
            FROM attendance a
            JOIN classes c ON a.class_id = c.id
            WHERE (?1 IS NULL OR c.class_date >= ?1)
              AND (?2 IS NULL OR c.class_date <= ?2)
            GROUP BY a.member_type
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }

    /// Registered/present counts per day in a date window
    pub async fn daily_trends(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> SqlxResult<Vec<DailyAttendanceTrend>> {
        sqlx::query_as::<_, DailyAttendanceTrend>(
            r#"
            SELECT c.class_date,
                   COUNT(a.id) as total_registered,
                   COALESCE(SUM(CASE WHEN a.status = 'present' THEN 1 ELSE 0 END), 0) as present_count
            FROM attendance a
            JOIN classes c ON a.class_id = c.id
            WHERE (?1 IS NULL OR c.class_date >= ?1)
              AND (?2 IS NULL OR c.class_date <= ?2)
            GROUP BY c.class_date
            ORDER BY c.class_date
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }
}
