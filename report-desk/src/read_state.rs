//! Read-flag mutations on the local collections.
//!
//! Every function returns whether it actually flipped something, so the
//! caller knows when a persist is worth doing.

use trafik_feed::{ImportantNotice, TrafficReport};

/// Sets the read flag on the report at `index`. Out-of-range indices are
/// a silent no-op.
pub fn mark_report_at(reports: &mut [TrafficReport], index: usize, read: bool) -> bool {
    match reports.get_mut(index) {
        Some(report) if report.read != read => {
            report.read = read;
            true
        }
        _ => false,
    }
}

/// Sets the read flag on every report.
pub fn mark_all_reports(reports: &mut [TrafficReport], read: bool) -> bool {
    let mut changed = false;
    for report in reports.iter_mut() {
        if report.read != read {
            report.read = read;
            changed = true;
        }
    }
    changed
}

/// Number of reports currently flagged as read.
pub fn read_count(reports: &[TrafficReport]) -> usize {
    reports.iter().filter(|r| r.read).count()
}

/// Sets the read flag on every notice.
pub fn mark_all_notices(notices: &mut [ImportantNotice], read: bool) -> bool {
    let mut changed = false;
    for notice in notices.iter_mut() {
        if notice.read != read {
            notice.read = read;
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use trafik_feed::{Region, TransportType};

    fn report(id: &str) -> TrafficReport {
        TrafficReport {
            id: id.to_string(),
            region: Region::South,
            transport_type: TransportType::Public,
            text: format!("Melding {id}"),
            created_time: "2026-02-10T10:00:00+01:00".parse().unwrap(),
            updated_time: "2026-02-10T10:00:00+01:00".parse().unwrap(),
            concluded: false,
            updates: Vec::new(),
            reference: None,
            read: false,
        }
    }

    #[test]
    fn marking_out_of_range_is_a_no_op() {
        let mut reports = vec![report("a")];
        assert!(!mark_report_at(&mut reports, 5, true));
        assert!(!reports[0].read);
    }

    #[test]
    fn marking_at_index_flips_only_that_report() {
        let mut reports = vec![report("a"), report("b")];
        assert!(mark_report_at(&mut reports, 1, true));
        assert!(!reports[0].read);
        assert!(reports[1].read);
        // Same flag again reports no change.
        assert!(!mark_report_at(&mut reports, 1, true));
    }

    #[test]
    fn mark_all_and_count() {
        let mut reports = vec![report("a"), report("b"), report("c")];
        assert_eq!(read_count(&reports), 0);

        assert!(mark_all_reports(&mut reports, true));
        assert_eq!(read_count(&reports), 3);

        assert!(mark_all_reports(&mut reports, false));
        assert!(!mark_all_reports(&mut reports, false));
        assert_eq!(read_count(&reports), 0);
    }
}
