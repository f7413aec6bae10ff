//! Display rendering for reports and notices.
//!
//! Everything here is a pure function of the record and the clock, so
//! the rendered strings are never stored or diffed; views and event
//! payloads recompute them when asked.

use chrono::{DateTime, FixedOffset, Utc};
use trafik_feed::{ImportantNotice, ReportUpdate, TrafficReport, TransportType};

use crate::cfg::DisplayConfig;

/// Cap on the plain-text sensor state.
pub const MAX_DISPLAY_CHARS: usize = 255;

const ICON_PRIVATE: &str = "mdi:car";
const ICON_PUBLIC: &str = "mdi:train-bus";
const ICON_NOTICE: &str = "mdi:alert";

/// Report body truncated for the plain-text state.
pub fn display_text(text: &str) -> String {
    text.chars().take(MAX_DISPLAY_CHARS).collect()
}

/// Danish relative age of a timestamp ("nu", "for 5 minutter siden").
/// A timestamp at or ahead of `now` renders as "nu".
pub fn relative_time(time: DateTime<FixedOffset>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(time).num_seconds();
    if secs < 60 {
        return "nu".to_string();
    }
    let minutes = secs / 60;
    if minutes < 60 {
        return plural(minutes, "minut", "minutter");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "time", "timer");
    }
    plural(hours / 24, "dag", "dage")
}

fn plural(n: i64, one: &str, many: &str) -> String {
    if n == 1 {
        format!("for 1 {one} siden")
    } else {
        format!("for {n} {many} siden")
    }
}

fn icon_header(icon: &str) -> String {
    format!("###  <font color=red> <ha-icon icon=\"{icon}\"></ha-icon></font> ")
}

/// Markdown card for a traffic report: icon header, region label,
/// relative age, body, then the superseded report's text as a
/// blockquote when configured.
pub fn report_markdown(report: &TrafficReport, display: &DisplayConfig, now: DateTime<Utc>) -> String {
    let icon = match report.transport_type {
        TransportType::Private => ICON_PRIVATE,
        TransportType::Public => ICON_PUBLIC,
    };
    let mut md = icon_header(icon);
    md.push_str(report.region.label());
    md.push(' ');
    md.push_str(&relative_time(report.created_time, now));
    md.push_str("\n\n");
    md.push_str(&report.text);
    if display.include_reference {
        if let Some(reference) = &report.reference {
            md.push_str("\n\n>");
            md.push_str(&reference.text);
        }
    }
    md
}

/// Update entries rendered `"dd-mm HH:MM: text"`, newest first.
pub fn updates_text(updates: &[ReportUpdate], display: &DisplayConfig) -> String {
    if !display.include_updates || updates.is_empty() {
        return String::new();
    }
    let shown = if display.show_only_last_update {
        &updates[..1]
    } else {
        updates
    };
    shown
        .iter()
        .map(|u| format!("{}: {}", u.created_time.format("%d-%m %H:%M"), u.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Markdown card for an important notice.
pub fn notice_markdown(notice: &ImportantNotice, now: DateTime<Utc>) -> String {
    let mut md = icon_header(ICON_NOTICE);
    md.push_str(&relative_time(notice.created_time, now));
    md.push_str("\n\n");
    md.push_str(&notice.text);
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use trafik_feed::{Region, ReportReference};

    fn now() -> DateTime<Utc> {
        "2026-02-10T11:30:00Z".parse().unwrap()
    }

    fn display() -> DisplayConfig {
        DisplayConfig {
            show_only_last_update: false,
            include_updates: true,
            include_reference: true,
        }
    }

    fn report() -> TrafficReport {
        TrafficReport {
            id: "r1".to_string(),
            region: Region::Cph,
            transport_type: TransportType::Private,
            text: "Trafikuheld på Amager".to_string(),
            created_time: "2026-02-10T10:00:00+01:00".parse().unwrap(),
            updated_time: "2026-02-10T10:15:00+01:00".parse().unwrap(),
            concluded: false,
            updates: vec![
                ReportUpdate {
                    created_time: "2026-02-10T10:15:00+01:00".parse().unwrap(),
                    text: "Vejen er ryddet".to_string(),
                },
                ReportUpdate {
                    created_time: "2026-02-10T10:05:00+01:00".parse().unwrap(),
                    text: "Politiet er fremme".to_string(),
                },
            ],
            reference: Some(ReportReference {
                id: "r0".to_string(),
                text: "Tidligere melding".to_string(),
            }),
            read: false,
        }
    }

    #[test]
    fn display_text_truncates_on_char_boundaries() {
        let text = "æ".repeat(300);
        let shown = display_text(&text);
        assert_eq!(shown.chars().count(), MAX_DISPLAY_CHARS);

        assert_eq!(display_text("kort tekst"), "kort tekst");
    }

    #[test]
    fn relative_time_gradations() {
        let now = now();
        let at = |s: &str| s.parse::<DateTime<FixedOffset>>().unwrap();

        assert_eq!(relative_time(at("2026-02-10T12:29:30+01:00"), now), "nu");
        assert_eq!(relative_time(at("2026-02-10T12:29:00+01:00"), now), "for 1 minut siden");
        assert_eq!(relative_time(at("2026-02-10T12:05:00+01:00"), now), "for 25 minutter siden");
        assert_eq!(relative_time(at("2026-02-10T11:00:00+01:00"), now), "for 1 time siden");
        assert_eq!(relative_time(at("2026-02-10T01:30:00+01:00"), now), "for 11 timer siden");
        assert_eq!(relative_time(at("2026-02-09T11:00:00+01:00"), now), "for 1 dag siden");
        assert_eq!(relative_time(at("2026-01-27T12:00:00+01:00"), now), "for 14 dage siden");
        // Clock skew ahead of now still renders.
        assert_eq!(relative_time(at("2026-02-10T13:00:00+01:00"), now), "nu");
    }

    #[test]
    fn report_markdown_full_card() {
        let md = report_markdown(&report(), &display(), now());
        assert_eq!(
            md,
            "###  <font color=red> <ha-icon icon=\"mdi:car\"></ha-icon></font> \
             København og Sjælland for 2 timer siden\n\nTrafikuheld på Amager\n\n>Tidligere melding"
        );
    }

    #[test]
    fn report_markdown_public_icon_without_reference() {
        let mut report = report();
        report.transport_type = TransportType::Public;
        let mut display = display();
        display.include_reference = false;

        let md = report_markdown(&report, &display, now());
        assert!(md.starts_with("###  <font color=red> <ha-icon icon=\"mdi:train-bus\"></ha-icon></font> "));
        assert!(!md.contains(">Tidligere melding"));
    }

    #[test]
    fn updates_text_honours_display_toggles() {
        let report = report();

        let all = updates_text(&report.updates, &display());
        assert_eq!(all, "10-02 10:15: Vejen er ryddet\n\n10-02 10:05: Politiet er fremme");

        let mut only_last = display();
        only_last.show_only_last_update = true;
        assert_eq!(
            updates_text(&report.updates, &only_last),
            "10-02 10:15: Vejen er ryddet"
        );

        let mut off = display();
        off.include_updates = false;
        assert_eq!(updates_text(&report.updates, &off), "");
        assert_eq!(updates_text(&[], &display()), "");
    }

    #[test]
    fn notice_markdown_card() {
        let notice = ImportantNotice {
            id: "n1".to_string(),
            text: "Signalfejl på hele S-togsnettet".to_string(),
            created_time: "2026-02-10T11:00:00+01:00".parse().unwrap(),
            updated_time: "2026-02-10T11:00:00+01:00".parse().unwrap(),
            read: false,
        };
        let md = notice_markdown(&notice, now());
        assert_eq!(
            md,
            "###  <font color=red> <ha-icon icon=\"mdi:alert\"></ha-icon></font> \
             for 1 time siden\n\nSignalfejl på hele S-togsnettet"
        );
    }
}
