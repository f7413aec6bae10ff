//! Inbound host events.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::core::app_state::AppState;
use crate::error_handler::{AppError, AppResult};
use crate::timer::EVENT_TIMER_RESTART;

#[derive(Debug, Deserialize)]
pub struct TimerFinished {
    pub entity_id: String,
}

/// POST /events/timer_finished
///
/// The host posts here when its rotation timer runs out. Advances the
/// cursor and, when configured, asks the host to restart the timer via
/// an outward event. The restart is latched so overlapping posts fire
/// at most one.
#[instrument(skip(state, body))]
pub async fn timer_finished(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TimerFinished>,
) -> AppResult<Json<Value>> {
    if !state.rotation.accepts(&body.entity_id) {
        return Err(AppError::BadRequest(format!(
            "timer entity '{}' does not drive rotation here",
            body.entity_id
        )));
    }

    let mut desk = state.desk.lock().await;
    let position = desk.rotate_to_next();
    debug!(position, entity = %body.entity_id, "rotation advanced by host timer");

    if state.rotation.auto_restart() && state.rotation.begin_restart() {
        desk.fire_host_event(EVENT_TIMER_RESTART, &json!({ "entity_id": body.entity_id }))
            .await;
        state.rotation.finish_restart();
    }

    Ok(Json(json!({ "position": position })))
}
