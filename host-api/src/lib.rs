//! HTTP surface for the traffic report desk: sensor views, service
//! commands, inbound host events and background polling.

mod core;
pub mod error_handler;
mod routes;
mod scheduler;
mod timer;

use std::sync::Arc;

use tracing::{info, warn};

use crate::core::app_state::AppState;
use crate::error_handler::AppError;

pub async fn start() -> Result<(), AppError> {
    let state = Arc::new(AppState::from_env().await?);

    scheduler::spawn((*state).clone());

    let app = routes::router(state.clone());

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&state.host.api_address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %state.host.api_address, "host api listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(?err, "failed to install the shutdown signal handler");
    }
}
