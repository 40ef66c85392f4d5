//! Member enrollment and per-member read endpoints

use crate::error::AppResult;
use crate::models::{Member, Payment};
use crate::repositories::{MemberAttendanceEntry, NewMember};
use crate::services::member_service::{MemberDashboard, MembersSummary};
use crate::services::promotion_service::EligibilityReport;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Request payload for enrolling a member
#[derive(Debug, Deserialize)]
pub struct EnrollMemberRequest {
    pub member_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
    #[serde(default)]
    pub membership_type: Option<String>,
    pub monthly_fee: f64,
    #[serde(default)]
    pub current_belt: Option<String>,
}

/// Paging for history endpoints
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

/// POST /api/members
pub async fn enroll(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EnrollMemberRequest>,
) -> AppResult<Json<Member>> {
    let member = state
        .member_service
        .enroll(NewMember {
            member_name: payload.member_name,
            email: payload.email,
            phone: payload.phone,
            date_of_birth: payload.date_of_birth,
            join_date: payload.join_date.unwrap_or_else(|| Utc::now().date_naive()),
            membership_type: payload
                .membership_type
                .unwrap_or_else(|| "monthly".to_string()),
            monthly_fee: payload.monthly_fee,
            current_belt: payload.current_belt.unwrap_or_else(|| "white".to_string()),
        })
        .await?;

    Ok(Json(member))
}

/// GET /api/members/summary
pub async fn summary(State(state): State<Arc<AppState>>) -> AppResult<Json<MembersSummary>> {
    Ok(Json(state.member_service.members_summary().await?))
}

/// GET /api/members/:id/dashboard
pub async fn member_dashboard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MemberDashboard>> {
    Ok(Json(state.member_service.member_dashboard(id).await?))
}

/// POST /api/members/:id/deactivate
pub async fn deactivate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    state.member_service.deactivate(id).await?;
    Ok(Json(serde_json::json!({ "status": "success" })))
}

/// GET /api/members/:id/payments?limit=50
pub async fn payment_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<Vec<Payment>>> {
    let limit = params.limit.unwrap_or(50);
    Ok(Json(state.payment_service.member_history(id, limit).await?))
}

/// GET /api/members/:id/attendance?limit=50
pub async fn attendance_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<Vec<MemberAttendanceEntry>>> {
    let limit = params.limit.unwrap_or(50);
    Ok(Json(
        state.attendance_service.member_history(id, limit).await?,
    ))
}

/// GET /api/members/:id/promotion-eligibility
pub async fn promotion_eligibility(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EligibilityReport>> {
    Ok(Json(state.promotion_service.eligibility(id).await?))
}

/// Build member routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/members", post(enroll))
        .route("/api/members/summary", get(summary))
        .route("/api/members/:id/dashboard", get(member_dashboard))
        .route("/api/members/:id/deactivate", post(deactivate))
        .route("/api/members/:id/payments", get(payment_history))
        .route("/api/members/:id/attendance", get(attendance_history))
        .route(
            "/api/members/:id/promotion-eligibility",
            get(promotion_eligibility),
        )
}
