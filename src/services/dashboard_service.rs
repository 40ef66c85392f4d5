use crate::error::{AppError, AppResult};
use crate::repositories::{
    AttendanceRepository, ClassRepository, MemberRepository, PaymentRepository,
    PromotionRepository,
};
use chrono::{Datelike, Duration, Months, Timelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Key figures for the landing dashboard
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_members: i64,
    pub active_members: i64,
    pub new_members_this_month: i64,
    pub classes_today: i64,
    pub classes_this_week: i64,
    pub monthly_revenue: f64,
    pub attendance_today: i64,
    pub promotions_this_month: i64,
    pub overdue_payments: i64,
}

/// One recommended follow-up action
#[derive(Debug, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub action: String,
    pub priority: String,
}

/// One activity feed item
#[derive(Debug, Serialize)]
pub struct ActivityItem {
    pub member_id: Uuid,
    pub member_name: String,
    pub description: String,
    pub date: String,
    #[serde(rename = "type")]
    pub activity_type: String,
}

/// One time-sensitive quick action
#[derive(Debug, Serialize)]
pub struct QuickAction {
    pub title: String,
    pub description: String,
    pub action: String,
    #[serde(rename = "type")]
    pub action_type: String,
    pub urgency: String,
}

/// Earnings per period with a transaction count
#[derive(Debug, Serialize)]
pub struct EarningsPoint {
    pub period: String,
    pub total_amount: f64,
    pub transaction_count: i64,
}

/// Member growth per period with a running total
#[derive(Debug, Serialize)]
pub struct GrowthPoint {
    pub period: String,
    pub new_members: i64,
    pub total_members: i64,
}

/// Read-only aggregation service behind the dashboard endpoints
pub struct DashboardService {
    member_repo: Arc<MemberRepository>,
    class_repo: Arc<ClassRepository>,
    attendance_repo: Arc<AttendanceRepository>,
    payment_repo: Arc<PaymentRepository>,
    promotion_repo: Arc<PromotionRepository>,
}

impl DashboardService {
    pub fn new(
        member_repo: Arc<MemberRepository>,
        class_repo: Arc<ClassRepository>,
        attendance_repo: Arc<AttendanceRepository>,
        payment_repo: Arc<PaymentRepository>,
        promotion_repo: Arc<PromotionRepository>,
    ) -> Self {
        Self {
            member_repo,
            class_repo,
            attendance_repo,
            payment_repo,
            promotion_repo,
        }
    }

    /// Headline statistics
    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let today = Utc::now().date_naive();
        let month_ago = today - Duration::days(30);
        let week_ago = today - Duration::days(7);

        let total_members = self.member_repo.count_all().await.map_err(AppError::from)?;
        let active_members = self
            .member_repo
            .count_active()
            .await
            .map_err(AppError::from)?;
        let new_members_this_month = self
            .member_repo
            .count_joined_since(month_ago)
            .await
            .map_err(AppError::from)?;

        let classes_today = self.class_repo.count_on(today).await.map_err(AppError::from)?;
        let classes_this_week = self
            .class_repo
            .count_between(week_ago, today)
            .await
            .map_err(AppError::from)?;

        let monthly_revenue = self
            .payment_repo
            .revenue_between(Some(month_ago), Some(today))
            .await
            .map_err(AppError::from)?;

        let attendance_today = self
            .attendance_repo
            .count_present_on(today)
            .await
            .map_err(AppError::from)?;

        let promotions_this_month = self
            .promotion_repo
            .count_since(month_ago)
            .await
            .map_err(AppError::from)?;

        let overdue_payments = self
            .member_repo
            .count_by_payment_status("overdue")
            .await
            .map_err(AppError::from)?;

        Ok(DashboardStats {
            total_members,
            active_members,
            new_members_this_month,
            classes_today,
            classes_this_week,
            monthly_revenue,
            attendance_today,
            promotions_this_month,
            overdue_payments,
        })
    }

    /// Top five recommended actions: new-member follow-ups, past-due
    /// accounts, lapsed attendance, promotion candidates.
    pub async fn recommendations(&self) -> AppResult<Vec<Recommendation>> {
        let today = Utc::now().date_naive();
        let mut recommendations = Vec::new();

        let recent_members = self
            .member_repo
            .find_joined_since(today - Duration::days(7), 3)
            .await
            .map_err(AppError::from)?;

        for member in recent_members {
            recommendations.push(Recommendation {
                title: format!("Follow up with {}", member.member_name),
                description: "about their first visit".to_string(),
                action: format!("view_member:{}", member.id),
                priority: "high".to_string(),
            });
        }

        let overdue = self
            .member_repo
            .find_overdue(5)
            .await
            .map_err(AppError::from)?;

        if !overdue.is_empty() {
            let total_overdue: f64 = overdue.iter().map(|m| m.outstanding_amount).sum();
            recommendations.push(Recommendation {
                title: "Resolve past due accounts.".to_string(),
                description: format!(
                    "See {} members who are past due (${:.2})",
                    overdue.len(),
                    total_overdue
                ),
                action: "view_overdue_members".to_string(),
                priority: "medium".to_string(),
            });
        }

        let inactive = self
            .member_repo
            .find_inactive_since(today - Duration::days(30), 10)
            .await
            .map_err(AppError::from)?;

        if !inactive.is_empty() {
            recommendations.push(Recommendation {
                title: "Set up automation email to follow up".to_string(),
                description: format!(
                    "with {} past members who haven't attended recently",
                    inactive.len()
                ),
                action: "setup_email_automation".to_string(),
                priority: "low".to_string(),
            });
        }

        let candidates = self
            .member_repo
            .find_promotion_candidates(today, 5)
            .await
            .map_err(AppError::from)?;

        for member in candidates {
            let months = member.months_in_current_belt(today);
            recommendations.push(Recommendation {
                title: format!("Consider promoting {}", member.member_name),
                description: format!("from {} belt ({} months)", member.current_belt, months),
                action: format!("view_promotion:{}", member.id),
                priority: "medium".to_string(),
            });
        }

        recommendations.truncate(5);
        Ok(recommendations)
    }

    /// Recent activity feed: payments, cancellations and promotions, merged
    /// and sorted by date, top five.
    pub async fn recent_activity(&self) -> AppResult<Vec<ActivityItem>> {
        let today = Utc::now().date_naive();
        let mut activities = Vec::new();

        let payments = self
            .payment_repo
            .find_recent_completed(today - Duration::days(7), 5)
            .await
            .map_err(AppError::from)?;

        for payment in payments {
            activities.push(ActivityItem {
                member_id: payment.member_id,
                member_name: payment.member_name.clone(),
                description: format!(
                    "has been charged ${:.2} for {}",
                    payment.amount,
                    payment.payment_type.replace('_', " ")
                ),
                date: payment.payment_date.to_string(),
                activity_type: "payment".to_string(),
            });
        }

        let cancelled = self
            .member_repo
            .find_recently_deactivated(today - Duration::days(7), 3)
            .await
            .map_err(AppError::from)?;

        for member in cancelled {
            let expiring = member
                .next_payment_due
                .map(|d| d.to_string())
                .unwrap_or_else(|| "soon".to_string());
            activities.push(ActivityItem {
                member_id: member.id,
                member_name: member.member_name.clone(),
                description: format!(
                    "cancelled their membership and it is expiring {}",
                    expiring
                ),
                date: member.updated_at.date().to_string(),
                activity_type: "cancellation".to_string(),
            });
        }

        let promotions = self
            .promotion_repo
            .find_recent(today - Duration::days(14), 3)
            .await
            .map_err(AppError::from)?;

        for promotion in promotions {
            activities.push(ActivityItem {
                member_id: promotion.member_id,
                member_name: promotion.member_name.clone(),
                description: format!("was promoted to {} belt", promotion.to_belt),
                date: promotion.promotion_date.to_string(),
                activity_type: "promotion".to_string(),
            });
        }

        activities.sort_by(|a, b| b.date.cmp(&a.date));
        activities.truncate(5);
        Ok(activities)
    }

    /// Completed-payment earnings per period. Short windows group by day,
    /// longer ones by month.
    pub async fn earnings_trend(&self, period: &str) -> AppResult<Vec<EarningsPoint>> {
        let today = Utc::now().date_naive();
        let (months_back, by_month) = match period {
            "1month" => (1, false),
            "3months" => (3, false),
            "6months" => (6, true),
            _ => (12, true),
        };
        let start = today
            .checked_sub_months(Months::new(months_back))
            .unwrap_or(today);

        let rows = self
            .payment_repo
            .revenue_by_period(start, today, by_month)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|r| EarningsPoint {
                period: r.period,
                total_amount: r.total_amount,
                transaction_count: r.transaction_count,
            })
            .collect())
    }

    /// New members per period with a cumulative roster count
    pub async fn member_growth(&self, period: &str) -> AppResult<Vec<GrowthPoint>> {
        let today = Utc::now().date_naive();
        let (months_back, by_month) = match period {
            "1month" => (1, false),
            "3months" => (3, false),
            _ => (6, true),
        };
        let start = today
            .checked_sub_months(Months::new(months_back))
            .unwrap_or(today);

        let rows = self
            .member_repo
            .growth_by_period(start, today, by_month)
            .await
            .map_err(AppError::from)?;

        let mut cumulative = self
            .member_repo
            .count_joined_before(start)
            .await
            .map_err(AppError::from)?;

        let mut points = Vec::with_capacity(rows.len());
        for (period, new_members) in rows {
            cumulative += new_members;
            points.push(GrowthPoint {
                period,
                new_members,
                total_members: cumulative,
            });
        }

        Ok(points)
    }

    /// Time-sensitive quick actions: classes starting within two hours and
    /// today's member birthdays.
    pub async fn quick_actions(&self) -> AppResult<Vec<QuickAction>> {
        let now = Utc::now();
        let today = now.date_naive();
        let mut actions = Vec::new();

        let now_time = now.time();
        let in_two_hours = now_time
            .overflowing_add_signed(Duration::hours(2))
            .0
            .with_nanosecond(0)
            .unwrap_or(now_time);

        // Past-midnight overflow leaves no remaining window today.
        if in_two_hours > now_time {
            let upcoming = self
                .class_repo
                .find_starting_between(today, now_time, in_two_hours, 3)
                .await
                .map_err(AppError::from)?;

            for class in upcoming {
                actions.push(QuickAction {
                    title: format!("Class starting soon: {}", class.class_name),
                    description: format!("at {} with {}", class.start_time, class.instructor),
                    action: format!("view_class:{}", class.id),
                    action_type: "class".to_string(),
                    urgency: "high".to_string(),
                });
            }
        }

        let birthdays = self
            .member_repo
            .find_birthdays(today.month(), today.day(), 5)
            .await
            .map_err(AppError::from)?;

        for member in birthdays {
            actions.push(QuickAction {
                title: format!("Birthday: {}", member.member_name),
                description: "Send birthday wishes".to_string(),
                action: format!("send_birthday_message:{}", member.id),
                action_type: "birthday".to_string(),
                urgency: "low".to_string(),
            });
        }

        Ok(actions)
    }
}
