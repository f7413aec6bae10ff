//! Head-change detection and event payloads.
//!
//! A refresh fires at most one event per collection: when the identity
//! of the newest entry differs from the last persisted signature. The
//! payloads are plain JSON so every sink can carry them.

use serde_json::{Value, json};
use trafik_feed::{ImportantNotice, TrafficReport};

use crate::cfg::DisplayConfig;
use crate::render;

/// Fired when the newest traffic report changes identity.
pub const EVENT_NEW_TRAFFIC_REPORT: &str = "new_traffic_report";
/// Fired when the newest important notice changes identity or content.
pub const EVENT_NEW_IMPORTANT_NOTICE: &str = "new_important_notice";

/// Identity of the report collection head.
pub fn report_signature(reports: &[TrafficReport]) -> Option<String> {
    reports.first().map(|r| r.id.clone())
}

/// Identity of the notice collection head. The update stamp is part of
/// the signature so an edited notice fires again under the same id.
pub fn notice_signature(notices: &[ImportantNotice]) -> Option<String> {
    notices
        .first()
        .map(|n| format!("{}:{}", n.id, n.updated_time.to_rfc3339()))
}

/// Payload of [`EVENT_NEW_TRAFFIC_REPORT`].
pub fn traffic_report_payload(report: &TrafficReport, display: &DisplayConfig) -> Value {
    json!({
        "text": report.text,
        "region": report.region.label(),
        "transport_type": report.transport_type.label(),
        "created_time": report.created_time.to_rfc3339(),
        "updated_time": report.updated_time.to_rfc3339(),
        "updates": render::updates_text(&report.updates, display),
    })
}

/// Payload of [`EVENT_NEW_IMPORTANT_NOTICE`].
pub fn important_notice_payload(notice: &ImportantNotice) -> Value {
    json!({
        "text": notice.text,
        "created_time": notice.created_time.to_rfc3339(),
        "updated_time": notice.updated_time.to_rfc3339(),
    })
}
