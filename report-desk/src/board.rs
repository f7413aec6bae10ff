//! Merge operations on the local report and notice collections.
//!
//! Everything here is a pure state operation: the caller owns the
//! collections, passes the clock in, and decides when to commit. The
//! refresh orchestration in [`crate::ReportDesk`] runs these against a
//! working copy so a failed cycle never leaves a half-merged collection.

use chrono::{DateTime, Utc};
use trafik_feed::{ImportantNotice, TrafficReport};

use crate::age::AgePolicy;
use crate::cfg::SortKey;
use crate::matcher::ReportMatcher;

/// Per-refresh parameters of the merge.
#[derive(Debug, Clone, Copy)]
pub struct MergeRules<'a> {
    pub matcher: &'a ReportMatcher,
    pub age: &'a AgePolicy,
    pub sort_key: SortKey,
    pub max_rows: usize,
}

/// What one merged page did to the collection.
#[derive(Debug, Clone, Copy)]
pub struct PageOutcome {
    /// An insert, in-place update or eviction happened.
    pub changed: bool,
    /// Pagination must stop: the page hit the age cutoff or the cap.
    pub done: bool,
}

/// Evicts reports outside the retention horizons. Returns whether
/// anything was removed.
pub fn sweep_reports(
    reports: &mut Vec<TrafficReport>,
    age: &AgePolicy,
    now: DateTime<Utc>,
) -> bool {
    let before = reports.len();
    reports.retain(|r| !age.is_expired(r, now));
    reports.len() != before
}

/// Evicts notices older than the primary horizon.
pub fn sweep_notices(
    notices: &mut Vec<ImportantNotice>,
    age: &AgePolicy,
    now: DateTime<Utc>,
) -> bool {
    let before = notices.len();
    notices.retain(|n| !age.is_stale(n.updated_time, now));
    notices.len() != before
}

/// Merges one fetched page into the collection.
///
/// The page arrives newest-first; records are processed oldest-first so
/// prepending keeps the collection newest-first. Per record:
///   * known id: replace in place, carrying the local `read` flag over
///   * unseen id: insert when inside the horizons and relevant
///   * otherwise: drop silently
/// A record carrying a reference removes the superseded entry. The
/// collection is then re-sorted and capped; trimming terminates
/// pagination even if more upstream pages exist.
pub fn merge_report_page(
    reports: &mut Vec<TrafficReport>,
    page: Vec<TrafficReport>,
    rules: &MergeRules<'_>,
    now: DateTime<Utc>,
) -> PageOutcome {
    let mut changed = false;
    let mut done = false;

    // Newest record first in the page. If even that one is out of the
    // retention window, nothing this far back can be relevant.
    if let Some(newest) = page.first() {
        if rules.age.is_expired(newest, now) {
            return PageOutcome {
                changed: false,
                done: true,
            };
        }
    }

    for mut incoming in page.into_iter().rev() {
        let incoming_id = incoming.id.clone();
        let reference = incoming.reference.clone();

        if let Some(existing) = reports.iter_mut().find(|r| r.id == incoming.id) {
            incoming.read = existing.read;
            if *existing != incoming {
                *existing = incoming;
                changed = true;
            }
        } else if !rules.age.is_expired(&incoming, now) && rules.matcher.matches_report(&incoming) {
            reports.insert(0, incoming);
            changed = true;
        } else {
            continue;
        }

        // The superseded report disappears from the collection; its text
        // lives on inside the referencing report's rendering.
        if let Some(reference) = reference {
            let before = reports.len();
            reports.retain(|r| r.id != reference.id || r.id == incoming_id);
            if reports.len() != before {
                changed = true;
            }
        }
    }

    sort_reports(reports, rules.sort_key);

    if reports.len() > rules.max_rows {
        reports.truncate(rules.max_rows);
        changed = true;
        done = true;
    }

    PageOutcome { changed, done }
}

/// Sorts descending by the configured time field. The sort is stable, so
/// records sharing a timestamp keep their merge order.
pub fn sort_reports(reports: &mut [TrafficReport], key: SortKey) {
    match key {
        SortKey::Updated => reports.sort_by(|a, b| b.updated_time.cmp(&a.updated_time)),
        SortKey::Created => reports.sort_by(|a, b| b.created_time.cmp(&a.created_time)),
    }
}

/// Dedupe-by-id merge for the notice list: update known ids in place
/// keeping the local `read` flag, prepend unseen ones.
pub fn merge_notices(
    notices: &mut Vec<ImportantNotice>,
    fetched: Vec<ImportantNotice>,
    age: &AgePolicy,
    now: DateTime<Utc>,
) -> bool {
    let mut changed = false;

    for mut incoming in fetched.into_iter().rev() {
        if let Some(existing) = notices.iter_mut().find(|n| n.id == incoming.id) {
            incoming.read = existing.read;
            if *existing != incoming {
                *existing = incoming;
                changed = true;
            }
        } else if !age.is_stale(incoming.updated_time, now) {
            notices.insert(0, incoming);
            changed = true;
        }
    }

    changed
}
