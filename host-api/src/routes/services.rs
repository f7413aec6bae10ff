//! POST /services/{service}: the read-flag and rotation commands.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::core::app_state::AppState;
use crate::error_handler::{AppError, AppResult};

/// Dispatches one named service call against the desk.
#[instrument(skip(state))]
pub async fn call_service(
    State(state): State<Arc<AppState>>,
    Path(service): Path<String>,
) -> AppResult<Json<Value>> {
    let mut desk = state.desk.lock().await;

    let changed = match service.as_str() {
        "mark_all_as_read" => desk.mark_everything(true).await?,
        "unmark_all_as_read" => desk.mark_everything(false).await?,
        "mark_all_traffic_reports_as_read" => desk.mark_all_traffic_reports(true).await?,
        "unmark_all_traffic_reports_as_read" => desk.mark_all_traffic_reports(false).await?,
        "mark_latest_traffic_report_as_read" => desk.mark_latest_traffic_report(true).await?,
        "unmark_latest_traffic_report_as_read" => desk.mark_latest_traffic_report(false).await?,
        "mark_current_traffic_report_as_read" => desk.mark_current_traffic_report(true).await?,
        "unmark_current_traffic_report_as_read" => desk.mark_current_traffic_report(false).await?,
        "mark_all_important_notices_as_read" => desk.mark_all_important_notices(true).await?,
        "unmark_all_important_notices_as_read" => desk.mark_all_important_notices(false).await?,
        "rotate_to_next_traffic_report" => {
            let position = desk.rotate_to_next();
            info!(position, "rotated by service call");
            return Ok(Json(json!({ "position": position })));
        }
        other => return Err(AppError::UnknownService(other.to_string())),
    };

    info!(service = %service, changed, "service call handled");
    Ok(Json(json!({ "changed": changed })))
}
