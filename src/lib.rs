//! Dojo Backend Library
//!
//! This module exposes the backend components for use by tests and other consumers.

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod setup;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use chrono::{DateTime, Utc};
use database::Database;
use repositories::*;
use services::*;
use std::sync::Arc;

/// Application state containing all repositories and services
pub struct AppState {
    pub database: Database,
    pub member_repo: Arc<MemberRepository>,
    pub class_repo: Arc<ClassRepository>,
    pub attendance_repo: Arc<AttendanceRepository>,
    pub promotion_repo: Arc<PromotionRepository>,
    pub payment_repo: Arc<PaymentRepository>,
    pub ledger_repo: Arc<LedgerRepository>,
    pub member_service: Arc<MemberService>,
    pub class_service: Arc<ClassService>,
    pub attendance_service: Arc<AttendanceService>,
    pub promotion_service: Arc<PromotionService>,
    pub payment_service: Arc<PaymentService>,
    pub dashboard_service: Arc<DashboardService>,
    pub notifications: Arc<NotificationService>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create a new AppState with initialized repositories and services
    pub fn new(pool: sqlx::SqlitePool, config: &AppConfig) -> Self {
        let database = Database::new(pool.clone());

        let member_repo = Arc::new(MemberRepository::new(pool.clone()));
        let class_repo = Arc::new(ClassRepository::new(pool.clone()));
        let attendance_repo = Arc::new(AttendanceRepository::new(pool.clone()));
        let promotion_repo = Arc::new(PromotionRepository::new(pool.clone()));
        let payment_repo = Arc::new(PaymentRepository::new(pool.clone()));
        let ledger_repo = Arc::new(LedgerRepository::new(pool.clone()));

        let notifications = Arc::new(NotificationService::new(
            pool,
            config.notification_relay_url.clone(),
            config.dojo_name.clone(),
        ));

        let member_service = Arc::new(MemberService::new(
            member_repo.clone(),
            attendance_repo.clone(),
            promotion_repo.clone(),
            notifications.clone(),
        ));

        let class_service = Arc::new(ClassService::new(
            class_repo.clone(),
            attendance_repo.clone(),
            notifications.clone(),
        ));

        let payment_service = Arc::new(PaymentService::new(
            payment_repo.clone(),
            member_repo.clone(),
            ledger_repo.clone(),
            notifications.clone(),
        ));

        let attendance_service = Arc::new(AttendanceService::new(
            attendance_repo.clone(),
            class_repo.clone(),
            member_repo.clone(),
            payment_service.clone(),
        ));

        let promotion_service = Arc::new(PromotionService::new(
            promotion_repo.clone(),
            member_repo.clone(),
            attendance_repo.clone(),
            notifications.clone(),
        ));

        let dashboard_service = Arc::new(DashboardService::new(
            member_repo.clone(),
            class_repo.clone(),
            attendance_repo.clone(),
            payment_repo.clone(),
            promotion_repo.clone(),
        ));

        Self {
            database,
            member_repo,
            class_repo,
            attendance_repo,
            promotion_repo,
            payment_repo,
            ledger_repo,
            member_service,
            class_service,
            attendance_service,
            promotion_service,
            payment_service,
            dashboard_service,
            notifications,
            startup_time: Utc::now(),
        }
    }
}
