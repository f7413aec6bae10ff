//! Canonical data model for traffic reports and important notices.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Coverage regions used by the upstream feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// København og Sjælland.
    Cph,
    /// Midt-, Nord- og Østjylland.
    MidNorth,
    /// Fyn, Trekanten og Sydjylland.
    South,
}

impl Region {
    /// All concrete regions, in upstream display order.
    pub const ALL: [Region; 3] = [Region::Cph, Region::MidNorth, Region::South];

    /// Label used when no region filter is active.
    pub const ALL_LABEL: &'static str = "Hele landet";

    /// Value used on the wire (query parameters and record fields).
    pub fn wire(self) -> &'static str {
        match self {
            Region::Cph => "cph",
            Region::MidNorth => "mid_north",
            Region::South => "south",
        }
    }

    /// Parses a wire value. Returns `None` for anything unknown so the
    /// caller can decide between skipping and failing.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "cph" => Some(Region::Cph),
            "mid_north" => Some(Region::MidNorth),
            "south" => Some(Region::South),
            _ => None,
        }
    }

    /// Danish display label.
    pub fn label(self) -> &'static str {
        match self {
            Region::Cph => "København og Sjælland",
            Region::MidNorth => "Midt-, Nord- og Østjylland",
            Region::South => "Fyn, Trekanten og Sydjylland",
        }
    }
}

/// Transport categories used by the upstream feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    /// Trains, busses, ferries.
    Public,
    /// Road traffic.
    Private,
}

impl TransportType {
    /// All concrete transport types.
    pub const ALL: [TransportType; 2] = [TransportType::Public, TransportType::Private];

    /// Label used when no transport filter is active.
    pub const ALL_LABEL: &'static str = "Alle transport typer";

    /// Value used on the wire (query parameters and record fields).
    pub fn wire(self) -> &'static str {
        match self {
            TransportType::Public => "public",
            TransportType::Private => "private",
        }
    }

    /// Parses a wire value. Returns `None` for anything unknown.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "public" => Some(TransportType::Public),
            "private" => Some(TransportType::Private),
            _ => None,
        }
    }

    /// Danish display label.
    pub fn label(self) -> &'static str {
        match self {
            TransportType::Public => "kollektiv transport",
            TransportType::Private => "Biltrafik",
        }
    }
}

/// One follow-up entry attached to a report, most-recent-first upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportUpdate {
    pub created_time: DateTime<FixedOffset>,
    pub text: String,
}

/// Pointer to an older report this one supersedes. The referenced report
/// is removed from the local collection at merge time; only its text is
/// kept here for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportReference {
    pub id: String,
    pub text: String,
}

/// A normalized traffic report.
///
/// Timestamps have already been converted to the configured local zone and
/// optional wire fields resolved to explicit defaults, so consumers never
/// branch on field presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficReport {
    pub id: String,
    pub region: Region,
    pub transport_type: TransportType,
    pub text: String,
    pub created_time: DateTime<FixedOffset>,
    pub updated_time: DateTime<FixedOffset>,
    /// Once true, the report is subject to the shorter retention horizon.
    pub concluded: bool,
    pub updates: Vec<ReportUpdate>,
    pub reference: Option<ReportReference>,
    /// Local read marker. Never delivered by upstream; survives
    /// update-in-place merges and resets only for newly inserted reports.
    #[serde(default)]
    pub read: bool,
}

/// A normalized important notice. Simpler sibling of [`TrafficReport`]:
/// no region, no update chain, no references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportantNotice {
    pub id: String,
    pub text: String,
    pub created_time: DateTime<FixedOffset>,
    pub updated_time: DateTime<FixedOffset>,
    /// Local read marker, see [`TrafficReport::read`].
    #[serde(default)]
    pub read: bool,
}

/// One page of normalized traffic reports, newest-first as delivered.
#[derive(Debug, Clone)]
pub struct ReportPage {
    pub reports: Vec<TrafficReport>,
    /// Raw `createdTime` of the oldest record in the page, passed back as
    /// the `lastPostDate` cursor for the next page. `None` on empty pages.
    pub next_cursor: Option<String>,
}
