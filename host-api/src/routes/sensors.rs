//! Sensor-shaped read views: one JSON object with `state` and
//! `attributes`, mirroring how the collections are shown on a
//! dashboard. A read head renders as a null state with no attributes.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use report_desk::{ReportDesk, render};
use serde_json::{Value, json};
use tracing::instrument;
use trafik_feed::TrafficReport;

use crate::core::app_state::AppState;
use crate::error_handler::AppResult;

fn report_attributes(report: &TrafficReport, desk: &ReportDesk, now: DateTime<Utc>) -> Value {
    let display = &desk.config().display;
    json!({
        "opdateringer": render::updates_text(&report.updates, display),
        "markdown": render::report_markdown(report, display, now),
        "region": report.region.label(),
        "transporttype": report.transport_type.label(),
        "oprettet_tidspunkt": report.created_time.to_rfc3339(),
        "opdateret_tidspunkt": report.updated_time.to_rfc3339(),
        "antal_trafikmeldinger": desk.reports().len(),
        "markeret_som_læst": desk.read_count(),
    })
}

/// GET /sensors/latest_traffic_report
#[instrument(skip(state))]
pub async fn latest_traffic_report(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let desk = state.desk.lock().await;
    let now = Utc::now();

    let head = match desk.latest_report() {
        Some(head) if !head.read => head,
        _ => return Ok(Json(json!({ "state": Value::Null, "attributes": {} }))),
    };

    let mut attributes = report_attributes(head, &desk, now);
    attributes["afsluttet"] = json!(head.concluded);
    attributes["for_gammel_tidspunkt"] = match desk.expires_at(head.updated_time) {
        Some(expires) => json!(expires.to_rfc3339()),
        None => Value::Null,
    };

    Ok(Json(json!({
        "state": render::display_text(&head.text),
        "attributes": attributes,
    })))
}

/// GET /sensors/rotating_traffic_report
#[instrument(skip(state))]
pub async fn rotating_traffic_report(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Value>> {
    let desk = state.desk.lock().await;
    let now = Utc::now();

    let report = match desk.rotating_report() {
        Some(report) => report,
        None => {
            return Ok(Json(json!({
                "state": Value::Null,
                "position": desk.rotation_position(),
                "attributes": {},
            })));
        }
    };

    Ok(Json(json!({
        "state": render::display_text(&report.text),
        "position": desk.rotation_position(),
        "attributes": report_attributes(report, &desk, now),
    })))
}

/// GET /sensors/important_notice
#[instrument(skip(state))]
pub async fn important_notice(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let desk = state.desk.lock().await;

    let head = match desk.latest_notice() {
        Some(head) if !head.read => head,
        _ => return Ok(Json(json!({ "state": Value::Null, "attributes": {} }))),
    };

    Ok(Json(json!({
        "state": render::display_text(&head.text),
        "attributes": {
            "markdown": render::notice_markdown(head, Utc::now()),
            "oprettet_tidspunkt": head.created_time.to_rfc3339(),
        },
    })))
}
