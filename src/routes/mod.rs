// ============================================================================
// Axum Routes Module
// ============================================================================
//
// Structure:
// - mod.rs: Router assembly and middleware
// - notifications.rs: POST /send
// - health.rs: Health check and metrics endpoints
//
// ============================================================================

mod health;
mod notifications;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::gateway::NotificationGateway;

pub use notifications::SUCCESS_MESSAGE;

/// Create the application router
pub fn create_router(gateway: Arc<NotificationGateway>) -> Router {
    Router::new()
        .route("/send", post(notifications::send_notification))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state(gateway)
}
