//! HTTP client for the public traffic bulletin feed.
//!
//! Endpoints used (as of 2026):
//!   * GET /posts?regions=...&transportTypes=...&lastPostDate=...
//!   * GET /importantnotices

use std::time::Duration;

use chrono_tz::Tz;
use reqwest::Client;
use tracing::debug;

use crate::errors::FeedResult;
use crate::normalize;
use crate::raw::{RawImportantNotice, RawTrafficPost};
use crate::types::{ImportantNotice, Region, ReportPage, TransportType};

/// Public feed base used when no override is configured.
pub const DEFAULT_BASE_API: &str = "https://api.dr.dk/trafik";

/// Runtime configuration for the feed client.
///
/// This configuration is usually injected from environment or higher-level
/// application settings.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// API base, e.g. "https://api.dr.dk/trafik".
    pub base_api: String,
    /// Region filter; empty means all regions (parameter omitted).
    pub regions: Vec<Region>,
    /// Transport filter; empty means all types (parameter omitted).
    pub transport_types: Vec<TransportType>,
    /// Zone every record timestamp is converted into.
    pub timezone: Tz,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

/// Feed HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: Client,
    cfg: FeedConfig,
}

impl FeedClient {
    /// Constructs a feed client with its own HTTP instance.
    ///
    /// Callers create one per refresh cycle; dropping it at the end of the
    /// cycle releases the connection on every exit path.
    pub fn from_config(cfg: FeedConfig) -> FeedResult<Self> {
        debug!("Creating FeedClient with base_api={}", cfg.base_api);

        let http = Client::builder()
            .user_agent("trafik-bridge/0.1")
            .timeout(cfg.request_timeout)
            .build()?;

        Ok(Self { http, cfg })
    }

    /// Fetches one page of traffic posts, newest-first.
    ///
    /// `cursor` is the raw `createdTime` of the oldest record of the
    /// previous page; `None` fetches from the top of the feed. An empty
    /// page is a valid terminal response, not an error.
    pub async fn fetch_report_page(&self, cursor: Option<&str>) -> FeedResult<ReportPage> {
        let url = format!("{}/posts", self.cfg.base_api);
        debug!("Feed fetch_report_page: {}, cursor={:?}", url, cursor);

        let raw: Vec<RawTrafficPost> = self
            .http
            .get(url)
            .query(&posts_query(
                &self.cfg.regions,
                &self.cfg.transport_types,
                cursor,
            ))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Cursor comes from the raw page so skipped records still move
        // pagination forward.
        let next_cursor = raw.last().map(|p| p.created_time.clone());
        let reports = normalize::normalize_posts(raw, self.cfg.timezone)?;

        Ok(ReportPage {
            reports,
            next_cursor,
        })
    }

    /// Fetches the flat list of important notices. Not paginated.
    pub async fn fetch_notices(&self) -> FeedResult<Vec<ImportantNotice>> {
        let url = format!("{}/importantnotices", self.cfg.base_api);
        debug!("Feed fetch_notices: {}", url);

        let raw: Vec<RawImportantNotice> = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        normalize::normalize_notices(raw, self.cfg.timezone)
    }
}

/// Builds the query for the posts endpoint. Empty filters are omitted
/// entirely: the server default is all regions / all transport types.
fn posts_query(
    regions: &[Region],
    transport_types: &[TransportType],
    cursor: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();

    if !regions.is_empty() {
        let joined = regions
            .iter()
            .map(|r| r.wire())
            .collect::<Vec<_>>()
            .join(",");
        query.push(("regions", joined));
    }

    if !transport_types.is_empty() {
        let joined = transport_types
            .iter()
            .map(|t| t.wire())
            .collect::<Vec<_>>()
            .join(",");
        query.push(("transportTypes", joined));
    }

    if let Some(cursor) = cursor {
        query.push(("lastPostDate", cursor.to_string()));
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_omit_parameters() {
        let query = posts_query(&[], &[], None);
        assert!(query.is_empty());
    }

    #[test]
    fn filters_are_comma_joined() {
        let query = posts_query(
            &[Region::Cph, Region::South],
            &[TransportType::Private],
            None,
        );

        assert_eq!(
            query,
            vec![
                ("regions", "cph,south".to_string()),
                ("transportTypes", "private".to_string()),
            ]
        );
    }

    #[test]
    fn cursor_is_passed_through_verbatim() {
        let query = posts_query(&[], &[], Some("2026-02-10T07:15:00+01:00"));

        assert_eq!(
            query,
            vec![("lastPostDate", "2026-02-10T07:15:00+01:00".to_string())]
        );
    }
}
