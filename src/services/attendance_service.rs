use crate::error::{AppError, AppResult};
use crate::models::{
    Attendance, AttendanceStatus, AttendeeType, DojoClass, Member, PaymentMethod, PaymentType,
};
use crate::repositories::{
    AttendanceRepository, AttendeeTypeStat, ClassRepository, ClassTypeStat, DailyAttendanceTrend,
    MemberAttendanceEntry, MemberRepository,
};
use crate::services::PaymentService;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// One requested marking in a bulk operation
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRequest {
    pub member_id: Uuid,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub member_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Per-item outcome of a bulk marking
#[derive(Debug, Serialize)]
pub struct BulkAttendanceResult {
    pub member_id: Uuid,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Attendance summary payload for one class
#[derive(Debug, Serialize)]
pub struct ClassAttendanceSummary {
    pub attendance_breakdown: Vec<serde_json::Value>,
    pub summary: serde_json::Value,
}

/// Analytics payload across classes
#[derive(Debug, Serialize)]
pub struct AttendanceAnalytics {
    pub class_type_stats: Vec<ClassTypeStat>,
    pub member_type_stats: Vec<AttendeeTypeStat>,
    pub daily_trends: Vec<DailyAttendanceTrend>,
}

/// Service marking attendance and maintaining the derived class statistics
pub struct AttendanceService {
    attendance_repo: Arc<AttendanceRepository>,
    class_repo: Arc<ClassRepository>,
    member_repo: Arc<MemberRepository>,
    payments: Arc<PaymentService>,
}

impl AttendanceService {
    pub fn new(
        attendance_repo: Arc<AttendanceRepository>,
        class_repo: Arc<ClassRepository>,
        member_repo: Arc<MemberRepository>,
        payments: Arc<PaymentService>,
    ) -> Self {
        Self {
            attendance_repo,
            class_repo,
            member_repo,
            payments,
        }
    }

    /// Mark attendance for one member in a class. An existing record for the
    /// pair is re-marked instead of duplicated; a fresh record derives its
    /// fee from the attendee tier.
    pub async fn mark(
        &self,
        class_id: Uuid,
        request: AttendanceRequest,
    ) -> AppResult<Attendance> {
        let class = self.require_class(class_id).await?;
        let member = self.require_member(request.member_id).await?;

        let status = match &request.status {
            Some(s) => AttendanceStatus::from_str(s).map_err(AppError::Validation)?,
            None => AttendanceStatus::Present,
        };
        let member_type = match &request.member_type {
            Some(t) => AttendeeType::from_str(t).map_err(AppError::Validation)?,
            None => AttendeeType::Member,
        };

        let existing = self
            .attendance_repo
            .find_by_class_and_member(class_id, member.id)
            .await
            .map_err(AppError::from)?;

        let attendance = match existing {
            Some(record) => self
                .attendance_repo
                .update_marking(
                    record.id,
                    status.as_str(),
                    member_type.as_str(),
                    request.notes.as_deref(),
                )
                .await
                .map_err(AppError::from)?,
            None => {
                let (fee, fee_status) =
                    Attendance::fee_for(member_type, class.drop_in_fee, class.member_fee);

                self.attendance_repo
                    .create(
                        class_id,
                        member.id,
                        status.as_str(),
                        member_type.as_str(),
                        fee > 0.0,
                        fee,
                        fee_status.as_str(),
                        request.notes.as_deref(),
                    )
                    .await
                    .map_err(|e| AppError::from(crate::error::RepositoryError::from(e)))?
            }
        };

        self.after_marking(&class, &member, &attendance).await?;

        Ok(attendance)
    }

    /// Mark attendance for several members, collecting per-item outcomes
    pub async fn bulk_mark(
        &self,
        class_id: Uuid,
        requests: Vec<AttendanceRequest>,
    ) -> Vec<BulkAttendanceResult> {
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let member_id = request.member_id;
            match self.mark(class_id, request).await {
                Ok(attendance) => results.push(BulkAttendanceResult {
                    member_id,
                    status: "success".to_string(),
                    attendance_id: Some(attendance.id),
                    error: None,
                }),
                Err(e) => results.push(BulkAttendanceResult {
                    member_id,
                    status: "error".to_string(),
                    attendance_id: None,
                    error: Some(e.to_string()),
                }),
            }
        }

        results
    }

    /// Collect a per-class fee and record the matching class-fee payment.
    /// An amount override replaces the derived fee.
    pub async fn mark_fee_received(
        &self,
        attendance_id: Uuid,
        amount: Option<f64>,
    ) -> AppResult<Attendance> {
        let attendance = self
            .attendance_repo
            .find_by_id(attendance_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| {
                AppError::NotFound(format!("Attendance {} not found", attendance_id))
            })?;

        if !attendance.payment_required {
            return Err(AppError::BusinessLogic(
                "No payment required for this attendance".to_string(),
            ));
        }

        let amount = amount.unwrap_or(attendance.payment_amount);
        self.attendance_repo
            .set_fee_paid(attendance_id, amount)
            .await
            .map_err(AppError::from)?;

        // One payment record per attendance; skip when already billed.
        let already_billed = self
            .payments
            .payment_for_attendance(attendance_id)
            .await?
            .is_some();

        if !already_billed && amount > 0.0 {
            let class = self.require_class(attendance.class_id).await?;
            self.payments
                .create_payment(
                    attendance.member_id,
                    PaymentType::ClassFee,
                    amount,
                    0.0,
                    PaymentMethod::Cash,
                    None,
                    Some(format!(
                        "Payment for {} on {}",
                        class.class_name, class.class_date
                    )),
                    Some(attendance_id),
                )
                .await?;
        }

        self.attendance_repo
            .find_by_id(attendance_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("Attendance {} not found", attendance_id)))
    }

    /// Attendance summary for one class
    pub async fn class_summary(&self, class_id: Uuid) -> AppResult<ClassAttendanceSummary> {
        self.require_class(class_id).await?;

        let breakdown = self
            .attendance_repo
            .class_breakdown(class_id)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|(status, member_type, count, revenue)| {
                serde_json::json!({
                    "status": status,
                    "member_type": member_type,
                    "count": count,
                    "revenue": revenue,
                })
            })
            .collect();

        let total_registered = self
            .attendance_repo
            .count_by_class(class_id)
            .await
            .map_err(AppError::from)?;
        let total_present = self
            .attendance_repo
            .count_present_by_class(class_id)
            .await
            .map_err(AppError::from)?;
        let total_revenue = self
            .attendance_repo
            .collected_revenue_by_class(class_id)
            .await
            .map_err(AppError::from)?;

        let attendance_rate = if total_registered > 0 {
            total_present as f64 / total_registered as f64 * 100.0
        } else {
            0.0
        };

        Ok(ClassAttendanceSummary {
            attendance_breakdown: breakdown,
            summary: serde_json::json!({
                "total_registered": total_registered,
                "total_present": total_present,
                "attendance_rate": attendance_rate,
                "total_revenue": total_revenue,
            }),
        })
    }

    /// A member's attendance history
    pub async fn member_history(
        &self,
        member_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<MemberAttendanceEntry>> {
        self.require_member(member_id).await?;
        self.attendance_repo
            .find_by_member(member_id, limit)
            .await
            .map_err(AppError::from)
    }

    /// Cross-class analytics for a date window
    pub async fn analytics(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<AttendanceAnalytics> {
        let class_type_stats = self
            .attendance_repo
            .stats_by_class_type(start, end)
            .await
            .map_err(AppError::from)?;

        let member_type_stats = self
            .attendance_repo
            .stats_by_attendee_type(start, end)
            .await
            .map_err(AppError::from)?;

        let daily_trends = self
            .attendance_repo
            .daily_trends(start, end)
            .await
            .map_err(AppError::from)?;

        Ok(AttendanceAnalytics {
            class_type_stats,
            member_type_stats,
            daily_trends,
        })
    }

    /// Refresh the derived class statistics and the member's last-attendance
    /// date after a marking.
    async fn after_marking(
        &self,
        class: &DojoClass,
        member: &Member,
        attendance: &Attendance,
    ) -> AppResult<()> {
        let (present, drop_ins, members) = self
            .attendance_repo
            .class_present_breakdown(class.id)
            .await
            .map_err(AppError::from)?;

        if class.max_capacity > 0 && present > class.max_capacity {
            return Err(AppError::BusinessLogic(format!(
                "Attendance count ({}) cannot exceed max capacity ({})",
                present, class.max_capacity
            )));
        }

        let revenue = drop_ins as f64 * class.drop_in_fee + members as f64 * class.member_fee;
        self.class_repo
            .update_stats(class.id, present, revenue)
            .await
            .map_err(AppError::from)?;

        if attendance.status == AttendanceStatus::Present.as_str() {
            self.member_repo
                .set_last_attendance_date(member.id, class.class_date)
                .await
                .map_err(AppError::from)?;
        }

        info!(
            "Marked {} as {} for class {}",
            member.member_name, attendance.status, class.class_name
        );

        Ok(())
    }

    async fn require_class(&self, class_id: Uuid) -> AppResult<DojoClass> {
        self.class_repo
            .find_by_id(class_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("Class {} not found", class_id)))
    }

    async fn require_member(&self, member_id: Uuid) -> AppResult<Member> {
        self.member_repo
            .find_by_id(member_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))
    }
}
