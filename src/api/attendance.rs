//! Attendance marking and analytics endpoints

use crate::error::AppResult;
use crate::models::Attendance;
use crate::services::attendance_service::{
    AttendanceAnalytics, AttendanceRequest, BulkAttendanceResult, ClassAttendanceSummary,
};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Date window selector for analytics
#[derive(Debug, Deserialize)]
pub struct AnalyticsParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Request payload for collecting a per-class fee
#[derive(Debug, Deserialize)]
pub struct CollectFeeRequest {
    #[serde(default)]
    pub amount: Option<f64>,
}

/// POST /api/classes/:id/attendance
pub async fn mark(
    State(state): State<Arc<AppState>>,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<AttendanceRequest>,
) -> AppResult<Json<Attendance>> {
    Ok(Json(state.attendance_service.mark(class_id, payload).await?))
}

/// POST /api/classes/:id/attendance/bulk
pub async fn bulk_mark(
    State(state): State<Arc<AppState>>,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<Vec<AttendanceRequest>>,
) -> AppResult<Json<Vec<BulkAttendanceResult>>> {
    Ok(Json(
        state.attendance_service.bulk_mark(class_id, payload).await,
    ))
}

/// GET /api/classes/:id/attendance/summary
pub async fn class_summary(
    State(state): State<Arc<AppState>>,
    Path(class_id): Path<Uuid>,
) -> AppResult<Json<ClassAttendanceSummary>> {
    Ok(Json(state.attendance_service.class_summary(class_id).await?))
}

/// POST /api/attendance/:id/collect-fee
pub async fn collect_fee(
    State(state): State<Arc<AppState>>,
    Path(attendance_id): Path<Uuid>,
    Json(payload): Json<CollectFeeRequest>,
) -> AppResult<Json<Attendance>> {
    Ok(Json(
        state
            .attendance_service
            .mark_fee_received(attendance_id, payload.amount)
            .await?,
    ))
}

/// GET /api/attendance/analytics?start_date=&end_date=
pub async fn analytics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsParams>,
) -> AppResult<Json<AttendanceAnalytics>> {
    Ok(Json(
        state
            .attendance_service
            .analytics(params.start_date, params.end_date)
            .await?,
    ))
}

/// Build attendance routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/classes/:id/attendance", post(mark))
        .route("/api/classes/:id/attendance/bulk", post(bulk_mark))
        .route("/api/classes/:id/attendance/summary", get(class_summary))
        .route("/api/attendance/:id/collect-fee", post(collect_fee))
        .route("/api/attendance/analytics", get(analytics))
}
