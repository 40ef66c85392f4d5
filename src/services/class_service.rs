use crate::error::{AppError, AppResult};
use crate::models::{ClassStatus, ClassType, DojoClass};
use crate::repositories::{AttendanceRepository, ClassRepository, NewClass};
use crate::services::NotificationService;
use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Dashboard payload for one class
#[derive(Debug, Serialize)]
pub struct ClassDashboard {
    pub class_info: serde_json::Value,
    pub attendance_list: Vec<serde_json::Value>,
    pub revenue: serde_json::Value,
    pub conflicts: Vec<serde_json::Value>,
}

/// Service for the class schedule
pub struct ClassService {
    class_repo: Arc<ClassRepository>,
    attendance_repo: Arc<AttendanceRepository>,
    notifications: Arc<NotificationService>,
}

impl ClassService {
    pub fn new(
        class_repo: Arc<ClassRepository>,
        attendance_repo: Arc<AttendanceRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            class_repo,
            attendance_repo,
            notifications,
        }
    }

    /// Schedule a class. The window must be well-formed; duration is derived
    /// from it.
    pub async fn schedule(&self, mut new: NewClass) -> AppResult<DojoClass> {
        if new.start_time >= new.end_time {
            return Err(AppError::Validation(
                "End time must be after start time".to_string(),
            ));
        }
        if new.max_capacity < 0 {
            return Err(AppError::Validation(
                "Capacity cannot be negative".to_string(),
            ));
        }

        new.class_type = new.class_type.to_lowercase();
        ClassType::from_str(&new.class_type).map_err(AppError::Validation)?;

        let duration = (new.end_time - new.start_time).num_minutes();
        let class = self
            .class_repo
            .create(new, duration)
            .await
            .map_err(AppError::from)?;

        info!(
            "Scheduled class {} on {} ({} min)",
            class.class_name, class.class_date, class.duration_minutes
        );

        Ok(class)
    }

    /// Week of classes starting at `start_date`, grouped by day
    pub async fn weekly_schedule(
        &self,
        start_date: Option<NaiveDate>,
    ) -> AppResult<BTreeMap<String, Vec<serde_json::Value>>> {
        let start = start_date.unwrap_or_else(|| Utc::now().date_naive());
        let end = start + Duration::days(6);

        let classes = self
            .class_repo
            .find_between(start, end)
            .await
            .map_err(AppError::from)?;

        let mut schedule: BTreeMap<String, Vec<serde_json::Value>> = BTreeMap::new();
        for class in classes {
            schedule
                .entry(class.class_date.to_string())
                .or_default()
                .push(serde_json::json!({
                    "id": class.id,
                    "class_name": class.class_name,
                    "class_type": class.class_type,
                    "class_date": class.class_date,
                    "start_time": class.start_time,
                    "end_time": class.end_time,
                    "instructor": class.instructor,
                    "status": class.status,
                    "attendance_count": class.attendance_count,
                    "max_capacity": class.max_capacity,
                }));
        }

        Ok(schedule)
    }

    /// Dashboard payload for one class: schedule info, roster, revenue and
    /// same-day conflicts
    pub async fn class_dashboard(&self, class_id: Uuid) -> AppResult<ClassDashboard> {
        let class = self.require(class_id).await?;

        let attendance_list = self
            .attendance_repo
            .class_roster(class_id)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|entry| {
                serde_json::json!({
                    "member_id": entry.member_id,
                    "member_name": entry.member_name,
                    "status": entry.status,
                    "member_type": entry.member_type,
                    "check_in_time": entry.check_in_time,
                    "notes": entry.notes,
                })
            })
            .collect();

        let conflicts = self
            .class_repo
            .find_conflicts(class.id, class.class_date, class.start_time, class.end_time)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "class_name": c.class_name,
                    "start_time": c.start_time,
                    "end_time": c.end_time,
                    "instructor": c.instructor,
                })
            })
            .collect();

        Ok(ClassDashboard {
            class_info: serde_json::json!({
                "name": class.class_name,
                "type": class.class_type,
                "date": class.class_date,
                "time": format!("{} - {}", class.start_time, class.end_time),
                "instructor": class.instructor,
                "status": class.status,
                "capacity": class.max_capacity,
                "attendance": class.attendance_count,
            }),
            attendance_list,
            revenue: serde_json::json!({
                "total": class.total_revenue,
                "drop_in_fee": class.drop_in_fee,
                "member_fee": class.member_fee,
            }),
            conflicts,
        })
    }

    /// Classes led by one instructor in a date window (defaults to the next
    /// 30 days)
    pub async fn instructor_schedule(
        &self,
        instructor: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Vec<DojoClass>> {
        let start = start_date.unwrap_or_else(|| Utc::now().date_naive());
        let end = end_date.unwrap_or(start + Duration::days(30));

        self.class_repo
            .find_by_instructor(instructor, start, end)
            .await
            .map_err(AppError::from)
    }

    /// Send a best-effort reminder to recent attendees of this class type.
    /// Returns how many reminders were attempted.
    pub async fn send_reminders(&self, class_id: Uuid) -> AppResult<i64> {
        let class = self.require(class_id).await?;

        if ClassStatus::from_str(&class.status) != Ok(ClassStatus::Scheduled) {
            return Err(AppError::BusinessLogic(
                "Reminders can only be sent for scheduled classes".to_string(),
            ));
        }

        let cutoff = class.class_date - Duration::days(30);
        let attendees = self
            .attendance_repo
            .recent_attendees_of_type(&class.class_type, cutoff)
            .await
            .map_err(AppError::from)?;

        let mut sent = 0;
        for (_, member_name, email) in attendees {
            self.notifications
                .send(
                    email.as_deref(),
                    "class_reminder",
                    vec![
                        ("member_name", member_name),
                        ("class_name", class.class_name.clone()),
                        ("class_date", class.class_date.to_string()),
                        ("start_time", class.start_time.to_string()),
                        ("instructor", class.instructor.clone()),
                        (
                            "location",
                            class.location.clone().unwrap_or_else(|| "Main Mat".to_string()),
                        ),
                    ],
                )
                .await;
            sent += 1;
        }

        info!("Sent {} reminders for class {}", sent, class.class_name);

        Ok(sent)
    }

    async fn require(&self, class_id: Uuid) -> AppResult<DojoClass> {
        self.class_repo
            .find_by_id(class_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("Class {} not found", class_id)))
    }
}
