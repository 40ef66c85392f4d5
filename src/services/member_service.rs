use crate::error::{AppError, AppResult};
use crate::models::{Belt, Member, MemberStatus, MembershipType};
use crate::repositories::{
    AttendanceRepository, MemberAttendanceStats, MemberRepository, NewMember, PromotionRepository,
};
use crate::services::NotificationService;
use chrono::{Months, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Assembled per-member dashboard payload
#[derive(Debug, Serialize)]
pub struct MemberDashboard {
    pub member_info: serde_json::Value,
    pub payment_info: serde_json::Value,
    pub attendance_stats: MemberAttendanceStats,
    pub belt_history: Vec<serde_json::Value>,
}

/// Roster-wide member summary
#[derive(Debug, Serialize)]
pub struct MembersSummary {
    pub total_members: i64,
    pub active_members: i64,
    pub belt_distribution: Vec<serde_json::Value>,
    pub payment_status: Vec<serde_json::Value>,
    pub monthly_revenue: f64,
}

/// Service for member enrollment and derived-field maintenance
pub struct MemberService {
    member_repo: Arc<MemberRepository>,
    attendance_repo: Arc<AttendanceRepository>,
    promotion_repo: Arc<PromotionRepository>,
    notifications: Arc<NotificationService>,
}

impl MemberService {
    pub fn new(
        member_repo: Arc<MemberRepository>,
        attendance_repo: Arc<AttendanceRepository>,
        promotion_repo: Arc<PromotionRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            member_repo,
            attendance_repo,
            promotion_repo,
            notifications,
        }
    }

    /// Enroll a new member. Emails must be unique across the roster; the
    /// first payment falls due one month after joining.
    pub async fn enroll(&self, mut new: NewMember) -> AppResult<Member> {
        if let Some(email) = &new.email {
            if self
                .member_repo
                .email_taken(email, None)
                .await
                .map_err(AppError::from)?
            {
                return Err(AppError::Validation(format!(
                    "Email {} already exists for another member",
                    email
                )));
            }
        }

        if new.monthly_fee < 0.0 {
            return Err(AppError::Validation(
                "Monthly fee cannot be negative".to_string(),
            ));
        }

        new.current_belt = new.current_belt.to_lowercase();
        Belt::from_str(&new.current_belt).map_err(AppError::Validation)?;

        new.membership_type = new.membership_type.to_lowercase();
        MembershipType::from_str(&new.membership_type).map_err(AppError::Validation)?;

        let member = self.member_repo.create(new).await.map_err(AppError::from)?;

        // First dues date: one month after joining
        if let Some(due) = member.join_date.checked_add_months(Months::new(1)) {
            self.member_repo
                .set_next_payment_due(member.id, due)
                .await
                .map_err(AppError::from)?;
        }

        info!("Enrolled member {} ({})", member.member_name, member.id);

        self.notifications
            .send(
                member.email.as_deref(),
                "welcome_new_member",
                vec![("member_name", member.member_name.clone())],
            )
            .await;

        self.member_repo
            .find_by_id(member.id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound("Member not found after enrollment".to_string()))
    }

    /// Deactivate a membership
    pub async fn deactivate(&self, member_id: uuid::Uuid) -> AppResult<()> {
        self.require(member_id).await?;
        self.member_repo
            .set_status(member_id, MemberStatus::Inactive.as_str())
            .await
            .map_err(AppError::from)?;
        info!("Deactivated member {}", member_id);
        Ok(())
    }

    /// Dashboard payload for one member: profile, payment standing,
    /// attendance totals and belt history.
    pub async fn member_dashboard(&self, member_id: uuid::Uuid) -> AppResult<MemberDashboard> {
        let member = self.require(member_id).await?;

        let attendance_stats = self
            .attendance_repo
            .member_stats(member_id)
            .await
            .map_err(AppError::from)?;

        let belt_history = self
            .promotion_repo
            .find_by_member(member_id)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|p| {
                serde_json::json!({
                    "promotion_date": p.promotion_date,
                    "from_belt": p.from_belt,
                    "to_belt": p.to_belt,
                    "instructor": p.instructor,
                    "notes": p.notes,
                })
            })
            .collect();

        Ok(MemberDashboard {
            member_info: serde_json::json!({
                "name": member.member_name,
                "status": member.status,
                "belt": member.current_belt,
                "join_date": member.join_date,
                "membership_type": member.membership_type,
            }),
            payment_info: serde_json::json!({
                "monthly_fee": member.monthly_fee,
                "payment_status": member.payment_status,
                "outstanding_amount": member.outstanding_amount,
                "total_paid": member.total_paid,
                "next_payment_due": member.next_payment_due,
            }),
            attendance_stats,
            belt_history,
        })
    }

    /// Roster-wide summary statistics
    pub async fn members_summary(&self) -> AppResult<MembersSummary> {
        let total_members = self.member_repo.count_all().await.map_err(AppError::from)?;
        let active_members = self
            .member_repo
            .count_active()
            .await
            .map_err(AppError::from)?;

        let belt_distribution = self
            .member_repo
            .belt_distribution()
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|(belt, count)| serde_json::json!({ "current_belt": belt, "count": count }))
            .collect();

        let payment_status = self
            .member_repo
            .payment_status_distribution()
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|(status, count)| serde_json::json!({ "payment_status": status, "count": count }))
            .collect();

        let monthly_revenue = self
            .member_repo
            .monthly_fee_total()
            .await
            .map_err(AppError::from)?;

        Ok(MembersSummary {
            total_members,
            active_members,
            belt_distribution,
            payment_status,
            monthly_revenue,
        })
    }

    async fn require(&self, member_id: uuid::Uuid) -> AppResult<Member> {
        self.member_repo
            .find_by_id(member_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))
    }
}

/// Next payment due date for a billing cycle starting at `from`
pub fn next_due_date(from: NaiveDate, months: u32) -> NaiveDate {
    from.checked_add_months(Months::new(months)).unwrap_or(from)
}
