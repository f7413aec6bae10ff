//! Wire-to-canonical conversion.
//!
//! All timestamp parsing and timezone conversion happens here, before any
//! record reaches comparison or merge logic. Records with unknown enum
//! values are skipped (upstream vocabulary drift), records with malformed
//! timestamps fail the whole page.

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use tracing::debug;

use crate::errors::{FeedResult, NormalizeError};
use crate::raw::{RawImportantNotice, RawTrafficPost};
use crate::types::{ImportantNotice, Region, ReportReference, ReportUpdate, TrafficReport, TransportType};

/// Parses an RFC 3339 timestamp and converts it to the given zone.
///
/// Naive timestamps (no UTC offset) are rejected: guessing a zone here
/// would silently corrupt ordering downstream.
fn parse_local(field: &'static str, value: &str, tz: Tz) -> Result<DateTime<FixedOffset>, NormalizeError> {
    let parsed = DateTime::parse_from_rfc3339(value).map_err(|_| NormalizeError::MalformedTimestamp {
        field,
        value: value.to_string(),
    })?;

    Ok(parsed.with_timezone(&tz).fixed_offset())
}

/// Converts one raw post. Returns `Ok(None)` when the record carries an
/// unknown region or transport type.
fn normalize_post(raw: RawTrafficPost, tz: Tz) -> FeedResult<Option<TrafficReport>> {
    let Some(region) = Region::from_wire(&raw.region) else {
        debug!(id = %raw.id, region = %raw.region, "skipping post with unknown region");
        return Ok(None);
    };

    let Some(transport_type) = TransportType::from_wire(&raw.transport_type) else {
        debug!(id = %raw.id, transport_type = %raw.transport_type, "skipping post with unknown transport type");
        return Ok(None);
    };

    let mut updates = Vec::with_capacity(raw.updates.len());
    for u in raw.updates {
        updates.push(ReportUpdate {
            created_time: parse_local("updates.createdTime", &u.created_time, tz)?,
            text: u.text,
        });
    }

    Ok(Some(TrafficReport {
        id: raw.id,
        region,
        transport_type,
        text: raw.text,
        created_time: parse_local("createdTime", &raw.created_time, tz)?,
        updated_time: parse_local("updatedTime", &raw.updated_time, tz)?,
        concluded: raw.concluded.unwrap_or(false),
        updates,
        reference: raw.reference.map(|r| ReportReference {
            id: r.id,
            text: r.text,
        }),
        read: false,
    }))
}

/// Converts a page of raw posts, preserving upstream order.
pub(crate) fn normalize_posts(raws: Vec<RawTrafficPost>, tz: Tz) -> FeedResult<Vec<TrafficReport>> {
    let mut reports = Vec::with_capacity(raws.len());
    for raw in raws {
        if let Some(report) = normalize_post(raw, tz)? {
            reports.push(report);
        }
    }
    Ok(reports)
}

/// Converts the raw notice list, preserving upstream order.
pub(crate) fn normalize_notices(raws: Vec<RawImportantNotice>, tz: Tz) -> FeedResult<Vec<ImportantNotice>> {
    let mut notices = Vec::with_capacity(raws.len());
    for raw in raws {
        notices.push(ImportantNotice {
            id: raw.id,
            text: raw.text,
            created_time: parse_local("createdTime", &raw.created_time, tz)?,
            updated_time: parse_local("updatedTime", &raw.updated_time, tz)?,
            read: false,
        });
    }
    Ok(notices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FeedError;

    const CPH: Tz = chrono_tz::Europe::Copenhagen;

    fn raw_post(json: &str) -> RawTrafficPost {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn post_is_normalized_to_local_zone() {
        let raw = raw_post(
            r#"{
                "_id": "abc123",
                "region": "cph",
                "type": "private",
                "text": "Uheld på Helsingørmotorvejen",
                "createdTime": "2026-02-10T07:15:00Z",
                "updatedTime": "2026-02-10T07:45:00Z"
            }"#,
        );

        let report = normalize_post(raw, CPH).unwrap().unwrap();

        assert_eq!(report.id, "abc123");
        assert_eq!(report.region, Region::Cph);
        assert_eq!(report.transport_type, TransportType::Private);
        // Winter time, UTC+1.
        assert_eq!(report.created_time.to_rfc3339(), "2026-02-10T08:15:00+01:00");
        assert_eq!(report.updated_time.to_rfc3339(), "2026-02-10T08:45:00+01:00");
        assert!(!report.concluded);
        assert!(report.updates.is_empty());
        assert!(report.reference.is_none());
        assert!(!report.read);
    }

    #[test]
    fn optional_fields_get_explicit_defaults() {
        let raw = raw_post(
            r#"{
                "_id": "abc124",
                "region": "south",
                "type": "public",
                "text": "Togbus mellem Odense og Fredericia",
                "createdTime": "2026-02-10T07:15:00+01:00",
                "updatedTime": "2026-02-10T07:15:00+01:00",
                "concluded": true,
                "updates": [
                    {"createdTime": "2026-02-10T08:00:00+01:00", "text": "Kørslen er genoptaget"}
                ],
                "reference": {"_id": "abc100", "text": "Signalfejl ved Odense"}
            }"#,
        );

        let report = normalize_post(raw, CPH).unwrap().unwrap();

        assert!(report.concluded);
        assert_eq!(report.updates.len(), 1);
        assert_eq!(report.updates[0].text, "Kørslen er genoptaget");
        assert_eq!(report.reference.as_ref().unwrap().id, "abc100");
    }

    #[test]
    fn naive_timestamp_is_rejected() {
        let raw = raw_post(
            r#"{
                "_id": "abc125",
                "region": "cph",
                "type": "private",
                "text": "Kø på Køge Bugt Motorvejen",
                "createdTime": "2026-02-10T07:15:00",
                "updatedTime": "2026-02-10T07:15:00+01:00"
            }"#,
        );

        let err = normalize_post(raw, CPH).unwrap_err();
        match err {
            FeedError::Normalize(NormalizeError::MalformedTimestamp { field, .. }) => {
                assert_eq!(field, "createdTime");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_region_is_skipped_not_fatal() {
        let known = raw_post(
            r#"{
                "_id": "abc126",
                "region": "mid_north",
                "type": "public",
                "text": "Forsinkelser mellem Aarhus og Aalborg",
                "createdTime": "2026-02-10T07:15:00+01:00",
                "updatedTime": "2026-02-10T07:15:00+01:00"
            }"#,
        );
        let unknown = raw_post(
            r#"{
                "_id": "abc127",
                "region": "bornholm",
                "type": "public",
                "text": "Færgen er aflyst",
                "createdTime": "2026-02-10T07:20:00+01:00",
                "updatedTime": "2026-02-10T07:20:00+01:00"
            }"#,
        );

        let reports = normalize_posts(vec![known, unknown], CPH).unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, "abc126");
    }

    #[test]
    fn notices_are_normalized() {
        let raw: RawImportantNotice = serde_json::from_str(
            r#"{
                "_id": "n1",
                "text": "Stormen Bodil påvirker al togtrafik",
                "createdTime": "2026-02-10T06:00:00Z",
                "updatedTime": "2026-02-10T06:30:00Z"
            }"#,
        )
        .unwrap();

        let notices = normalize_notices(vec![raw], CPH).unwrap();

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].created_time.to_rfc3339(), "2026-02-10T07:00:00+01:00");
        assert!(!notices[0].read);
    }
}
