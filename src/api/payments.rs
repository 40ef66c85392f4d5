//! Payment and refund endpoints

use crate::error::{AppError, AppResult};
use crate::models::{Payment, PaymentMethod, PaymentType};
use crate::services::payment_service::PaymentSummary;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Request payload for recording a payment
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub member_id: Uuid,
    pub payment_type: String,
    pub amount: f64,
    #[serde(default)]
    pub processing_fee: Option<f64>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request payload for refunding a payment
#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    pub amount: f64,
    pub reason: String,
}

/// Date window selector for the summary report
#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// POST /api/payments
pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePaymentRequest>,
) -> AppResult<Json<Payment>> {
    let payment_type =
        PaymentType::from_str(&payload.payment_type).map_err(AppError::Validation)?;
    let payment_method = match payload.payment_method.as_deref() {
        Some(m) => PaymentMethod::from_str(m).map_err(AppError::Validation)?,
        None => PaymentMethod::Cash,
    };

    let payment = state
        .payment_service
        .create_payment(
            payload.member_id,
            payment_type,
            payload.amount,
            payload.processing_fee.unwrap_or(0.0),
            payment_method,
            payload.payment_date,
            payload.description,
            None,
        )
        .await?;

    Ok(Json(payment))
}

/// POST /api/payments/:id/refund
pub async fn refund(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RefundRequest>,
) -> AppResult<Json<Payment>> {
    Ok(Json(
        state
            .payment_service
            .refund(id, payload.amount, &payload.reason)
            .await?,
    ))
}

/// GET /api/payments/summary?start_date=&end_date=
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
) -> AppResult<Json<PaymentSummary>> {
    Ok(Json(
        state
            .payment_service
            .summary(params.start_date, params.end_date)
            .await?,
    ))
}

/// Build payment routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/payments", post(create_payment))
        .route("/api/payments/:id/refund", post(refund))
        .route("/api/payments/summary", get(summary))
}
