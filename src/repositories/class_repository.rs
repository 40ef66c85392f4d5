use crate::models::DojoClass;
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{Result as SqlxResult, SqlitePool};
use uuid::Uuid;

const CLASS_COLUMNS: &str = "id, class_name, class_type, class_date, start_time, end_time, \
     duration_minutes, instructor, location, max_capacity, drop_in_fee, member_fee, status, \
     attendance_count, total_revenue, created_at";

/// Fields accepted when scheduling a class
pub struct NewClass {
    pub class_name: String,
    pub class_type: String,
    pub class_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub instructor: String,
    pub location: Option<String>,
    pub max_capacity: i64,
    pub drop_in_fee: f64,
    pub member_fee: f64,
}

/// Repository for class data access
pub struct ClassRepository {
    pool: SqlitePool,
}

impl ClassRepository {
    /// Create a new ClassRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new scheduled class
    pub async fn create(&self, new: NewClass, duration_minutes: i64) -> SqlxResult<DojoClass> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, DojoClass>(&format!(
            r#"
            INSERT INTO classes (
                id, class_name, class_type, class_date, start_time, end_time,
                duration_minutes, instructor, location, max_capacity, drop_in_fee,
                member_fee, status, attendance_count, total_revenue, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 'scheduled', 0, 0, ?13)
            RETURNING {CLASS_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&new.class_name)
        .bind(&new.class_type)
        .bind(new.class_date)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(duration_minutes)
        .bind(&new.instructor)
        .bind(&new.location)
        .bind(new.max_capacity)
        .bind(new.drop_in_fee)
        .bind(new.member_fee)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a class by UUID
    pub async fn find_by_id(&self, id: Uuid) -> SqlxResult<Option<DojoClass>> {
        sqlx::query_as::<_, DojoClass>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Store recomputed attendance count and revenue
    pub async fn update_stats(
        &self,
        id: Uuid,
        attendance_count: i64,
        total_revenue: f64,
    ) -> SqlxResult<()> {
        sqlx::query(
            "UPDATE classes SET attendance_count = ?2, total_revenue = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(attendance_count)
        .bind(total_revenue)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Update class lifecycle status
    pub async fn set_status(&self, id: Uuid, status: &str) -> SqlxResult<()> {
        sqlx::query("UPDATE classes SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Classes between two dates (inclusive), skipping cancelled ones,
    /// ordered by date then start time
    pub async fn find_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SqlxResult<Vec<DojoClass>> {
        sqlx::query_as::<_, DojoClass>(&format!(
            r#"
            SELECT {CLASS_COLUMNS} FROM classes
            WHERE class_date >= ?1 AND class_date <= ?2 AND status != 'cancelled'
            ORDER BY class_date, start_time
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }

    /// Classes led by an instructor in a date window
    pub async fn find_by_instructor(
        &self,
        instructor: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SqlxResult<Vec<DojoClass>> {
        sqlx::query_as::<_, DojoClass>(&format!(
            r#"
            SELECT {CLASS_COLUMNS} FROM classes
            WHERE instructor = ?1 AND class_date >= ?2 AND class_date <= ?3
              AND status != 'cancelled'
            ORDER BY class_date, start_time
            "#
        ))
        .bind(instructor)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }

    /// Same-day classes whose time window overlaps the given one, excluding
    /// the class itself and anything already cancelled or completed
    pub async fn find_conflicts(
        &self,
        id: Uuid,
        class_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> SqlxResult<Vec<DojoClass>> {
        sqlx::query_as::<_, DojoClass>(&format!(
            r#"
            SELECT {CLASS_COLUMNS} FROM classes
            WHERE id != ?1
              AND class_date = ?2
              AND status NOT IN ('cancelled', 'completed')
              AND start_time < ?4
              AND end_time > ?3
            ORDER BY start_time
            "#
        ))
        .bind(id)
        .bind(class_date)
        .bind(start_time)
        .bind(end_time)
        .fetch_all(&self.pool)
        .await
    }

    /// Count classes on a date, skipping cancelled ones
    pub async fn count_on(&self, date: NaiveDate) -> SqlxResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM classes WHERE class_date = ?1 AND status != 'cancelled'",
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await
    }

    /// Count classes in a date window, skipping cancelled ones
    pub async fn count_between(&self, start: NaiveDate, end: NaiveDate) -> SqlxResult<i64> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM classes
            WHERE class_date >= ?1 AND class_date <= ?2 AND status != 'cancelled'
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
    }

    /// Scheduled classes on a date starting inside a time window
    pub async fn find_starting_between(
        &self,
        date: NaiveDate,
        from: NaiveTime,
        to: NaiveTime,
        limit: i64,
    ) -> SqlxResult<Vec<DojoClass>> {
        sqlx::query_as::<_, DojoClass>(&format!(
            r#"
            SELECT {CLASS_COLUMNS} FROM classes
            WHERE class_date = ?1 AND status = 'scheduled'
              AND start_time >= ?2 AND start_time <= ?3
            ORDER BY start_time
            LIMIT ?4
            "#
        ))
        .bind(date)
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
