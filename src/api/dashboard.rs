//! Dashboard aggregation endpoints

use crate::error::AppResult;
use crate::services::dashboard_service::{
    ActivityItem, DashboardStats, EarningsPoint, GrowthPoint, QuickAction, Recommendation,
};
use crate::AppState;
use axum::extract::{Query, State};
use axum::{routing::get, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Trend window selector (defaults mirror the dashboard widgets)
#[derive(Debug, Deserialize)]
pub struct TrendParams {
    pub period: Option<String>,
}

/// GET /api/dashboard/stats
pub async fn stats(State(state): State<Arc<AppState>>) -> AppResult<Json<DashboardStats>> {
    Ok(Json(state.dashboard_service.stats().await?))
}

/// GET /api/dashboard/recommendations
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<Recommendation>>> {
    Ok(Json(state.dashboard_service.recommendations().await?))
}

/// GET /api/dashboard/activity
pub async fn activity(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<ActivityItem>>> {
    Ok(Json(state.dashboard_service.recent_activity().await?))
}

/// GET /api/dashboard/earnings-trend?period=1year
pub async fn earnings_trend(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendParams>,
) -> AppResult<Json<Vec<EarningsPoint>>> {
    let period = params.period.as_deref().unwrap_or("1year");
    Ok(Json(state.dashboard_service.earnings_trend(period).await?))
}

/// GET /api/dashboard/member-growth?period=6months
pub async fn member_growth(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendParams>,
) -> AppResult<Json<Vec<GrowthPoint>>> {
    let period = params.period.as_deref().unwrap_or("6months");
    Ok(Json(state.dashboard_service.member_growth(period).await?))
}

/// GET /api/dashboard/quick-actions
pub async fn quick_actions(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<QuickAction>>> {
    Ok(Json(state.dashboard_service.quick_actions().await?))
}

/// Build dashboard routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard/stats", get(stats))
        .route("/api/dashboard/recommendations", get(recommendations))
        .route("/api/dashboard/activity", get(activity))
        .route("/api/dashboard/earnings-trend", get(earnings_trend))
        .route("/api/dashboard/member-growth", get(member_growth))
        .route("/api/dashboard/quick-actions", get(quick_actions))
}
