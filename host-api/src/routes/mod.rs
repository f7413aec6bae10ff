use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::app_state::AppState;

pub mod diagnostics;
pub mod events;
pub mod sensors;
pub mod services;

/// The full route table for one desk instance.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/sensors/latest_traffic_report",
            get(sensors::latest_traffic_report),
        )
        .route(
            "/sensors/rotating_traffic_report",
            get(sensors::rotating_traffic_report),
        )
        .route("/sensors/important_notice", get(sensors::important_notice))
        .route("/services/{service}", post(services::call_service))
        .route("/events/timer_finished", post(events::timer_finished))
        .route("/diagnostics", get(diagnostics::diagnostics))
        .with_state(state)
}
