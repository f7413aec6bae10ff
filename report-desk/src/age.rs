//! Retention horizons for reports and notices.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use trafik_feed::TrafficReport;

/// Age policy with a primary horizon and a second, typically shorter,
/// horizon for concluded reports. A horizon of zero disables its rule.
#[derive(Debug, Clone, Copy)]
pub struct AgePolicy {
    max_age_hours: i64,
    max_age_hours_concluded: i64,
}

impl AgePolicy {
    pub fn new(max_age_hours: i64, max_age_hours_concluded: i64) -> Self {
        Self {
            max_age_hours,
            max_age_hours_concluded,
        }
    }

    /// True when `updated_time` falls outside the primary horizon.
    pub fn is_stale(&self, updated_time: DateTime<FixedOffset>, now: DateTime<Utc>) -> bool {
        if self.max_age_hours <= 0 {
            return false;
        }
        updated_time + Duration::hours(self.max_age_hours) < now
    }

    /// True when the report should be evicted. Either horizon trips it:
    /// the primary one always applies, the concluded one only once the
    /// report is marked concluded.
    pub fn is_expired(&self, report: &TrafficReport, now: DateTime<Utc>) -> bool {
        if self.is_stale(report.updated_time, now) {
            return true;
        }

        if report.concluded && self.max_age_hours_concluded > 0 {
            return report.updated_time + Duration::hours(self.max_age_hours_concluded) < now;
        }

        false
    }

    /// The instant the primary horizon elapses, `None` when unlimited.
    /// Shown to users as the "too old after" time.
    pub fn expires_at(&self, updated_time: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        if self.max_age_hours <= 0 {
            return None;
        }
        Some(updated_time + Duration::hours(self.max_age_hours))
    }
}
