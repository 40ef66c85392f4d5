//! Class scheduling and per-class read endpoints

use crate::error::AppResult;
use crate::models::DojoClass;
use crate::repositories::NewClass;
use crate::services::class_service::ClassDashboard;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// Request payload for scheduling a class
#[derive(Debug, Deserialize)]
pub struct ScheduleClassRequest {
    pub class_name: String,
    pub class_type: String,
    pub class_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub instructor: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub max_capacity: Option<i64>,
    #[serde(default)]
    pub drop_in_fee: Option<f64>,
    #[serde(default)]
    pub member_fee: Option<f64>,
}

/// Date window selector
#[derive(Debug, Deserialize)]
pub struct DateWindowParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// POST /api/classes
pub async fn schedule_class(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ScheduleClassRequest>,
) -> AppResult<Json<DojoClass>> {
    let class = state
        .class_service
        .schedule(NewClass {
            class_name: payload.class_name,
            class_type: payload.class_type,
            class_date: payload.class_date,
            start_time: payload.start_time,
            end_time: payload.end_time,
            instructor: payload.instructor,
            location: payload.location,
            max_capacity: payload.max_capacity.unwrap_or(0),
            drop_in_fee: payload.drop_in_fee.unwrap_or(0.0),
            member_fee: payload.member_fee.unwrap_or(0.0),
        })
        .await?;

    Ok(Json(class))
}

/// GET /api/classes/schedule?start_date=2024-01-01
pub async fn weekly_schedule(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateWindowParams>,
) -> AppResult<Json<BTreeMap<String, Vec<serde_json::Value>>>> {
    Ok(Json(
        state.class_service.weekly_schedule(params.start_date).await?,
    ))
}

/// GET /api/classes/:id/dashboard
pub async fn class_dashboard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ClassDashboard>> {
    Ok(Json(state.class_service.class_dashboard(id).await?))
}

/// GET /api/classes/instructor/:name?start_date=&end_date=
pub async fn instructor_schedule(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<DateWindowParams>,
) -> AppResult<Json<Vec<DojoClass>>> {
    Ok(Json(
        state
            .class_service
            .instructor_schedule(&name, params.start_date, params.end_date)
            .await?,
    ))
}

/// POST /api/classes/:id/reminders
pub async fn send_reminders(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let sent = state.class_service.send_reminders(id).await?;
    Ok(Json(serde_json::json!({ "status": "success", "sent": sent })))
}

/// Build class routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/classes", post(schedule_class))
        .route("/api/classes/schedule", get(weekly_schedule))
        .route("/api/classes/:id/dashboard", get(class_dashboard))
        .route("/api/classes/instructor/:name", get(instructor_schedule))
        .route("/api/classes/:id/reminders", post(send_reminders))
}
