//! GET /diagnostics: configuration and collection counters.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::instrument;

use crate::core::app_state::AppState;

#[instrument(skip(state))]
pub async fn diagnostics(State(state): State<Arc<AppState>>) -> Json<Value> {
    let desk = state.desk.lock().await;
    let cfg = desk.config();

    Json(json!({
        "reports": desk.reports().len(),
        "notices": desk.notices().len(),
        "read_count": desk.read_count(),
        "rotation_position": desk.rotation_position(),
        "regions": cfg.regions.iter().map(|r| r.wire()).collect::<Vec<_>>(),
        "transport_types": cfg.transport_types.iter().map(|t| t.wire()).collect::<Vec<_>>(),
        "match_terms": cfg.match_terms,
        "sort_key": format!("{:?}", cfg.sort_key),
        "max_rows": cfg.max_rows,
        "max_age_hours": cfg.max_age_hours,
        "max_age_hours_concluded": cfg.max_age_hours_concluded,
        "issues": state.issues.snapshot(),
    }))
}
