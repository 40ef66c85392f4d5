//! Belt promotion endpoints

use crate::error::AppResult;
use crate::models::Promotion;
use crate::repositories::PromotionHistoryEntry;
use crate::services::promotion_service::{
    BeltStatistics, BulkPromotionResult, PromotionRequest,
};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// History filter parameters
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub member_id: Option<Uuid>,
    pub limit: Option<i64>,
}

/// POST /api/promotions
pub async fn promote(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PromotionRequest>,
) -> AppResult<Json<Promotion>> {
    Ok(Json(state.promotion_service.promote(payload).await?))
}

/// POST /api/promotions/bulk
pub async fn bulk_promote(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Vec<PromotionRequest>>,
) -> AppResult<Json<Vec<BulkPromotionResult>>> {
    Ok(Json(state.promotion_service.bulk_promote(payload).await))
}

/// POST /api/promotions/:id/cancel
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Promotion>> {
    Ok(Json(state.promotion_service.cancel(id).await?))
}

/// POST /api/promotions/:id/certificate
pub async fn issue_certificate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Promotion>> {
    Ok(Json(state.promotion_service.issue_certificate(id).await?))
}

/// GET /api/promotions/history?member_id=&limit=50
pub async fn history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<Vec<PromotionHistoryEntry>>> {
    let limit = params.limit.unwrap_or(50);
    Ok(Json(
        state.promotion_service.history(params.member_id, limit).await?,
    ))
}

/// GET /api/promotions/statistics
pub async fn statistics(State(state): State<Arc<AppState>>) -> AppResult<Json<BeltStatistics>> {
    Ok(Json(state.promotion_service.statistics().await?))
}

/// Build promotion routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/promotions", post(promote))
        .route("/api/promotions/bulk", post(bulk_promote))
        .route("/api/promotions/:id/cancel", post(cancel))
        .route("/api/promotions/:id/certificate", post(issue_certificate))
        .route("/api/promotions/history", get(history))
        .route("/api/promotions/statistics", get(statistics))
}
