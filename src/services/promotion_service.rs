use crate::error::{AppError, AppResult};
use crate::models::{promotion::validate_belt_progression, Belt, Member, Promotion, PromotionStatus};
use crate::repositories::{
    AttendanceRepository, MemberAttendanceStats, MemberRepository, PromotionHistoryEntry,
    PromotionRepository,
};
use crate::services::NotificationService;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// One requested promotion in a bulk operation
#[derive(Debug, Clone, Deserialize)]
pub struct PromotionRequest {
    pub member_id: Uuid,
    pub to_belt: String,
    pub promotion_date: Option<NaiveDate>,
    pub instructor: String,
    pub notes: Option<String>,
}

/// Per-item outcome of a bulk promotion
#[derive(Debug, Serialize)]
pub struct BulkPromotionResult {
    pub member_id: Uuid,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Eligibility report for a member's next promotion
#[derive(Debug, Serialize)]
pub struct EligibilityReport {
    pub eligible: bool,
    pub reasons: Vec<String>,
    pub current_belt: String,
    pub next_belt: Option<String>,
    pub time_in_belt_months: i64,
    pub attendance_stats: MemberAttendanceStats,
    pub requirements: Option<crate::models::BeltRequirements>,
}

/// Belt statistics rollup
#[derive(Debug, Serialize)]
pub struct BeltStatistics {
    pub belt_distribution: Vec<serde_json::Value>,
    pub promotions_this_year: Vec<serde_json::Value>,
    pub avg_promotion_time: Vec<serde_json::Value>,
}

/// Service enforcing the belt-progression state machine
pub struct PromotionService {
    promotion_repo: Arc<PromotionRepository>,
    member_repo: Arc<MemberRepository>,
    attendance_repo: Arc<AttendanceRepository>,
    notifications: Arc<NotificationService>,
}

impl PromotionService {
    pub fn new(
        promotion_repo: Arc<PromotionRepository>,
        member_repo: Arc<MemberRepository>,
        attendance_repo: Arc<AttendanceRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            promotion_repo,
            member_repo,
            attendance_repo,
            notifications,
        }
    }

    /// Promote a member one belt forward. Validates the transition against
    /// the belt order, records the promotion, advances the member's rank and
    /// sends a best-effort congratulations note.
    pub async fn promote(&self, request: PromotionRequest) -> AppResult<Promotion> {
        let member = self.require_member(request.member_id).await?;
        let today = Utc::now().date_naive();
        let promotion_date = request.promotion_date.unwrap_or(today);

        if promotion_date > today {
            return Err(AppError::Validation(
                "Promotion date cannot be in the future".to_string(),
            ));
        }

        let from_belt = Belt::from_str(&member.current_belt).map_err(AppError::Validation)?;
        let to_belt = Belt::from_str(&request.to_belt).map_err(AppError::Validation)?;

        validate_belt_progression(from_belt, to_belt).map_err(AppError::Validation)?;

        // Whole months spent in the outgoing belt
        let held_since = member.belt_promotion_date.unwrap_or(member.join_date);
        let time_in_belt = ((promotion_date - held_since).num_days() / 30).max(0);

        let promotion = self
            .promotion_repo
            .create(
                member.id,
                from_belt.as_str(),
                to_belt.as_str(),
                promotion_date,
                &request.instructor,
                request.notes.as_deref(),
                time_in_belt,
            )
            .await
            .map_err(AppError::from)?;

        self.member_repo
            .update_belt(member.id, to_belt.as_str(), Some(promotion_date))
            .await
            .map_err(AppError::from)?;

        info!(
            "Promoted {} from {} to {}",
            member.member_name, from_belt, to_belt
        );

        self.notifications
            .send(
                member.email.as_deref(),
                "belt_promotion_congratulations",
                vec![
                    ("member_name", member.member_name.clone()),
                    ("from_belt", from_belt.as_str().to_string()),
                    ("to_belt", to_belt.as_str().to_string()),
                    ("promotion_date", promotion_date.to_string()),
                    ("instructor", request.instructor.clone()),
                    ("notes", request.notes.clone().unwrap_or_default()),
                ],
            )
            .await;

        Ok(promotion)
    }

    /// Cancel an approved promotion and restore the member's prior belt
    /// state. The record itself stays, flipped to cancelled.
    pub async fn cancel(&self, promotion_id: Uuid) -> AppResult<Promotion> {
        let promotion = self
            .promotion_repo
            .find_by_id(promotion_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("Promotion {} not found", promotion_id)))?;

        if promotion.status != PromotionStatus::Approved.as_str() {
            return Err(AppError::BusinessLogic(
                "Only approved promotions can be cancelled".to_string(),
            ));
        }

        self.promotion_repo
            .set_status(promotion_id, PromotionStatus::Cancelled.as_str())
            .await
            .map_err(AppError::from)?;

        // Belt falls back to the record's from-belt; the promotion date
        // falls back to the previous approved promotion, or clears.
        let previous = self
            .promotion_repo
            .find_latest_approved_before(promotion.member_id, promotion.promotion_date)
            .await
            .map_err(AppError::from)?;

        self.member_repo
            .update_belt(
                promotion.member_id,
                &promotion.from_belt,
                previous.map(|p| p.promotion_date),
            )
            .await
            .map_err(AppError::from)?;

        info!(
            "Cancelled promotion {} for member {}",
            promotion_id, promotion.member_id
        );

        self.promotion_repo
            .find_by_id(promotion_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("Promotion {} not found", promotion_id)))
    }

    /// Mark the certificate for an approved promotion as issued
    pub async fn issue_certificate(&self, promotion_id: Uuid) -> AppResult<Promotion> {
        let promotion = self
            .promotion_repo
            .find_by_id(promotion_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("Promotion {} not found", promotion_id)))?;

        if promotion.status != PromotionStatus::Approved.as_str() {
            return Err(AppError::BusinessLogic(
                "Certificates can only be issued for approved promotions".to_string(),
            ));
        }

        self.promotion_repo
            .set_certificate_issued(promotion_id)
            .await
            .map_err(AppError::from)?;

        self.promotion_repo
            .find_by_id(promotion_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("Promotion {} not found", promotion_id)))
    }

    /// Eligibility check combining time in belt, classes attended and
    /// attendance rate. All three must pass.
    pub async fn eligibility(&self, member_id: Uuid) -> AppResult<EligibilityReport> {
        let member = self.require_member(member_id).await?;
        let today = Utc::now().date_naive();

        let current_belt = Belt::from_str(&member.current_belt).map_err(AppError::Validation)?;
        let time_in_belt = member.months_in_current_belt(today);

        let attendance_stats = self
            .attendance_repo
            .member_stats(member_id)
            .await
            .map_err(AppError::from)?;

        let requirements = match current_belt.requirements() {
            Some(req) => req,
            None => {
                return Ok(EligibilityReport {
                    eligible: false,
                    reasons: vec![format!(
                        "No promotion requirements defined beyond {} belt",
                        current_belt
                    )],
                    current_belt: current_belt.as_str().to_string(),
                    next_belt: current_belt.next().map(|b| b.as_str().to_string()),
                    time_in_belt_months: time_in_belt,
                    attendance_stats,
                    requirements: None,
                });
            }
        };

        let mut eligible = true;
        let mut reasons = Vec::new();

        if time_in_belt < requirements.min_time_months {
            eligible = false;
            reasons.push(format!(
                "Minimum time requirement not met ({} months, need {})",
                time_in_belt, requirements.min_time_months
            ));
        }

        if attendance_stats.total_classes < requirements.min_classes {
            eligible = false;
            reasons.push(format!(
                "Minimum class attendance not met ({} classes, need {})",
                attendance_stats.total_classes, requirements.min_classes
            ));
        }

        if attendance_stats.attendance_rate < requirements.min_attendance_rate {
            eligible = false;
            reasons.push(format!(
                "Attendance rate too low ({:.1}%, need {}%)",
                attendance_stats.attendance_rate, requirements.min_attendance_rate
            ));
        }

        Ok(EligibilityReport {
            eligible,
            reasons,
            current_belt: current_belt.as_str().to_string(),
            next_belt: Some(requirements.next_belt.as_str().to_string()),
            time_in_belt_months: time_in_belt,
            attendance_stats,
            requirements: Some(requirements),
        })
    }

    /// Promote several members, collecting per-item outcomes instead of
    /// aborting on the first failure.
    pub async fn bulk_promote(
        &self,
        requests: Vec<PromotionRequest>,
    ) -> Vec<BulkPromotionResult> {
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let member_id = request.member_id;
            match self.promote(request).await {
                Ok(promotion) => results.push(BulkPromotionResult {
                    member_id,
                    status: "success".to_string(),
                    promotion_id: Some(promotion.id),
                    error: None,
                }),
                Err(e) => results.push(BulkPromotionResult {
                    member_id,
                    status: "error".to_string(),
                    promotion_id: None,
                    error: Some(e.to_string()),
                }),
            }
        }

        results
    }

    /// Approved promotion history, optionally for one member
    pub async fn history(
        &self,
        member_id: Option<Uuid>,
        limit: i64,
    ) -> AppResult<Vec<PromotionHistoryEntry>> {
        self.promotion_repo
            .find_history(member_id, limit)
            .await
            .map_err(AppError::from)
    }

    /// Belt distribution plus promotion cadence statistics
    pub async fn statistics(&self) -> AppResult<BeltStatistics> {
        let belt_distribution = self
            .member_repo
            .belt_distribution()
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|(belt, count)| serde_json::json!({ "current_belt": belt, "count": count }))
            .collect();

        let year = Utc::now().date_naive().year();
        let promotions_this_year = self
            .promotion_repo
            .counts_by_month(year)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|row| {
                serde_json::json!({
                    "to_belt": row.to_belt,
                    "month": row.month,
                    "count": row.count,
                })
            })
            .collect();

        let avg_promotion_time = self
            .promotion_repo
            .average_time_by_belt()
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|row| {
                serde_json::json!({
                    "to_belt": row.to_belt,
                    "avg_months": row.avg_months,
                })
            })
            .collect();

        Ok(BeltStatistics {
            belt_distribution,
            promotions_this_year,
            avg_promotion_time,
        })
    }

    async fn require_member(&self, member_id: Uuid) -> AppResult<Member> {
        self.member_repo
            .find_by_id(member_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))
    }
}
