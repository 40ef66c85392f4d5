//! HTTP API surface: JSON endpoints over the service layer.

pub mod attendance;
pub mod classes;
pub mod dashboard;
pub mod health;
pub mod members;
pub mod payments;
pub mod promotions;

use crate::AppState;
use axum::Router;
use std::sync::Arc;

/// Assemble the full API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(dashboard::routes())
        .merge(members::routes())
        .merge(classes::routes())
        .merge(attendance::routes())
        .merge(promotions::routes())
        .merge(payments::routes())
        .with_state(state)
}
