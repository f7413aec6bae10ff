//! Local desk for Danish traffic reports.
//!
//! `ReportDesk` owns the bounded in-memory collections (traffic reports
//! and important notices), reconciles them against the upstream feed,
//! tracks read flags and the rotation cursor, fires head-change events
//! and persists the small surviving state to disk.
//!
//! Flow per refresh:
//!   * sweep + paginated fetch-and-merge on a working copy
//!   * commit only when the whole cycle succeeded
//!   * compare head identity against the persisted signature, fire at
//!     most one event, persist

pub mod age;
pub mod board;
pub mod cfg;
pub mod errors;
pub mod matcher;
pub mod notify;
pub mod read_state;
pub mod render;
pub mod rotation;
pub mod sink;
pub mod store;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, info, warn};
use trafik_feed::{FeedClient, FeedError, ImportantNotice, ReportPage, TrafficReport};

use crate::age::AgePolicy;
use crate::board::MergeRules;
use crate::matcher::ReportMatcher;
use crate::rotation::RotationCursor;
use crate::sink::EventSink;
use crate::store::{PersistedState, SettingsStore};

pub use crate::cfg::{DeskConfig, DisplayConfig, SortKey};
pub use crate::errors::{DeskConfigError, DeskError, DeskResult, DeskStoreError};
pub use crate::rotation::NO_POSITION;

/// One desk instance: collections, policies and persistence for a
/// single configured feed.
pub struct ReportDesk {
    cfg: DeskConfig,
    matcher: ReportMatcher,
    age: AgePolicy,
    sink: EventSink,
    store: SettingsStore,
    state: PersistedState,
    reports: Vec<TrafficReport>,
    notices: Vec<ImportantNotice>,
    cursor: RotationCursor,
}

impl ReportDesk {
    /// Builds a desk from an explicit config, loading persisted state.
    /// Collections start empty and fill on the first refresh.
    pub async fn from_config(cfg: DeskConfig) -> DeskResult<Self> {
        let matcher = ReportMatcher::compile(&cfg.match_terms, cfg.match_word, cfg.match_case);
        let age = AgePolicy::new(cfg.max_age_hours, cfg.max_age_hours_concluded);
        let sink = EventSink::from_config(cfg.webhook_url.as_deref())?;
        let store = SettingsStore::new(&cfg.state_dir, &cfg.instance_id);
        let state = store.load().await?;

        Ok(Self {
            cfg,
            matcher,
            age,
            sink,
            store,
            state,
            reports: Vec::new(),
            notices: Vec::new(),
            cursor: RotationCursor::new(),
        })
    }

    /// Builds a desk from environment variables.
    pub async fn from_env() -> DeskResult<Self> {
        Self::from_config(DeskConfig::from_env()?).await
    }

    // ===== Refresh cycles =====

    /// One full reconciliation of the report collection: sweep, fetch
    /// backwards page by page, merge, commit, notify.
    ///
    /// Returns whether any net change occurred. A feed that keeps
    /// failing past the retry budget is `Ok(false)`: the collection is
    /// left untouched and the next cycle tries again.
    pub async fn refresh_traffic_reports(&mut self) -> DeskResult<bool> {
        let now = Utc::now();
        let feed = FeedClient::from_config(self.cfg.feed_config())?;
        debug!("starting traffic report refresh");

        // Working copy; committed only when the whole cycle succeeds.
        let mut working = self.reports.clone();
        let mut changed = board::sweep_reports(&mut working, &self.age, now);

        let rules = MergeRules {
            matcher: &self.matcher,
            age: &self.age,
            sort_key: self.cfg.sort_key,
            max_rows: self.cfg.max_rows,
        };

        let mut cursor: Option<String> = None;
        loop {
            let page = match self.fetch_page_with_retry(&feed, cursor.as_deref()).await? {
                Some(page) => page,
                None => return Ok(false),
            };
            if page.reports.is_empty() && page.next_cursor.is_none() {
                break;
            }

            let next_cursor = page.next_cursor.clone();
            let outcome = board::merge_report_page(&mut working, page.reports, &rules, now);
            changed |= outcome.changed;
            if outcome.done {
                break;
            }

            match next_cursor {
                // A cursor that does not advance would loop forever.
                Some(next) if Some(next.as_str()) != cursor.as_deref() => cursor = Some(next),
                _ => break,
            }
        }

        self.reports = working;
        self.cursor.clamp(self.reports.len());
        self.after_traffic_refresh(changed).await?;

        if changed {
            info!(reports = self.reports.len(), "traffic report refresh committed");
        } else {
            debug!(reports = self.reports.len(), "traffic report refresh found no change");
        }
        Ok(changed)
    }

    /// One reconciliation of the notice collection (single fetch, no
    /// pagination).
    pub async fn refresh_important_notices(&mut self) -> DeskResult<bool> {
        let now = Utc::now();
        let feed = FeedClient::from_config(self.cfg.feed_config())?;
        debug!("starting important notice refresh");

        let mut working = self.notices.clone();
        let mut changed = board::sweep_notices(&mut working, &self.age, now);

        let fetched = match self.fetch_notices_with_retry(&feed).await? {
            Some(notices) => notices,
            None => return Ok(false),
        };
        changed |= board::merge_notices(&mut working, fetched, &self.age, now);

        self.notices = working;
        self.after_notice_refresh(changed).await?;

        if changed {
            info!(notices = self.notices.len(), "important notice refresh committed");
        }
        Ok(changed)
    }

    async fn fetch_page_with_retry(
        &self,
        feed: &FeedClient,
        cursor: Option<&str>,
    ) -> DeskResult<Option<ReportPage>> {
        let mut attempt = 0u32;
        loop {
            match feed.fetch_report_page(cursor).await {
                Ok(page) => return Ok(Some(page)),
                Err(FeedError::Upstream(err)) if attempt < self.cfg.fetch_retries => {
                    attempt += 1;
                    warn!(?err, attempt, "report page fetch failed, retrying");
                    tokio::time::sleep(self.cfg.fetch_retry_delay).await;
                }
                Err(FeedError::Upstream(err)) => {
                    warn!(?err, "report page fetch failed, giving up until the next cycle");
                    return Ok(None);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn fetch_notices_with_retry(
        &self,
        feed: &FeedClient,
    ) -> DeskResult<Option<Vec<ImportantNotice>>> {
        let mut attempt = 0u32;
        loop {
            match feed.fetch_notices().await {
                Ok(notices) => return Ok(Some(notices)),
                Err(FeedError::Upstream(err)) if attempt < self.cfg.fetch_retries => {
                    attempt += 1;
                    warn!(?err, attempt, "notice fetch failed, retrying");
                    tokio::time::sleep(self.cfg.fetch_retry_delay).await;
                }
                Err(FeedError::Upstream(err)) => {
                    warn!(?err, "notice fetch failed, giving up until the next cycle");
                    return Ok(None);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Fires at most one head-change event and persists when anything
    /// observable moved. An emptied collection clears the signature
    /// without firing.
    async fn after_traffic_refresh(&mut self, changed: bool) -> DeskResult<()> {
        let signature = notify::report_signature(&self.reports);
        let mut dirty = changed;

        if signature != self.state.last_traffic_signature {
            if let Some(head) = self.reports.first() {
                let payload = notify::traffic_report_payload(head, &self.cfg.display);
                self.sink
                    .fire(
                        &self.cfg.event_domain,
                        notify::EVENT_NEW_TRAFFIC_REPORT,
                        &payload,
                    )
                    .await;
            }
            self.state.last_traffic_signature = signature;
            dirty = true;
        }

        if dirty {
            self.persist().await?;
        }
        Ok(())
    }

    async fn after_notice_refresh(&mut self, changed: bool) -> DeskResult<()> {
        let signature = notify::notice_signature(&self.notices);
        let mut dirty = changed;

        if signature != self.state.last_notice_signature {
            if let Some(head) = self.notices.first() {
                let payload = notify::important_notice_payload(head);
                self.sink
                    .fire(
                        &self.cfg.event_domain,
                        notify::EVENT_NEW_IMPORTANT_NOTICE,
                        &payload,
                    )
                    .await;
            }
            self.state.last_notice_signature = signature;
            dirty = true;
        }

        if dirty {
            self.persist().await?;
        }
        Ok(())
    }

    /// Recomputes the read counter snapshot and writes the state file.
    async fn persist(&mut self) -> DeskResult<()> {
        self.state.read_count = read_state::read_count(&self.reports);
        self.store.save(&self.state).await
    }

    // ===== Read-state services =====

    pub async fn mark_all_traffic_reports(&mut self, read: bool) -> DeskResult<bool> {
        let changed = read_state::mark_all_reports(&mut self.reports, read);
        if changed {
            self.persist().await?;
        }
        Ok(changed)
    }

    pub async fn mark_latest_traffic_report(&mut self, read: bool) -> DeskResult<bool> {
        let changed = read_state::mark_report_at(&mut self.reports, 0, read);
        if changed {
            self.persist().await?;
        }
        Ok(changed)
    }

    /// Flips the report under the rotation cursor. No selection is a
    /// silent no-op.
    pub async fn mark_current_traffic_report(&mut self, read: bool) -> DeskResult<bool> {
        let changed = match self.cursor.index() {
            Some(index) => read_state::mark_report_at(&mut self.reports, index, read),
            None => false,
        };
        if changed {
            self.persist().await?;
        }
        Ok(changed)
    }

    pub async fn mark_all_important_notices(&mut self, read: bool) -> DeskResult<bool> {
        let changed = read_state::mark_all_notices(&mut self.notices, read);
        if changed {
            self.persist().await?;
        }
        Ok(changed)
    }

    /// Composite service: notices, then reports, then the cursor. After
    /// marking everything read the cursor parks at the sentinel.
    pub async fn mark_everything(&mut self, read: bool) -> DeskResult<bool> {
        let mut changed = read_state::mark_all_notices(&mut self.notices, read);
        changed |= read_state::mark_all_reports(&mut self.reports, read);
        if read {
            self.cursor.advance(&self.reports, 0);
        }
        if changed {
            self.persist().await?;
        }
        Ok(changed)
    }

    // ===== Rotation =====

    /// Moves the cursor to the next unread report, wrapping around.
    pub fn rotate_to_next(&mut self) -> i64 {
        self.cursor.advance(&self.reports, 0);
        self.cursor.position()
    }

    /// Moves the cursor back to the previous unread report.
    pub fn rotate_to_previous(&mut self) -> i64 {
        self.cursor.retreat(&self.reports, 0);
        self.cursor.position()
    }

    // ===== Views =====

    pub fn latest_report(&self) -> Option<&TrafficReport> {
        self.reports.first()
    }

    /// Report under the rotation cursor, when one is selected.
    pub fn rotating_report(&self) -> Option<&TrafficReport> {
        self.cursor.index().and_then(|i| self.reports.get(i))
    }

    pub fn latest_notice(&self) -> Option<&ImportantNotice> {
        self.notices.first()
    }

    pub fn reports(&self) -> &[TrafficReport] {
        &self.reports
    }

    pub fn notices(&self) -> &[ImportantNotice] {
        &self.notices
    }

    pub fn rotation_position(&self) -> i64 {
        self.cursor.position()
    }

    pub fn read_count(&self) -> usize {
        read_state::read_count(&self.reports)
    }

    pub fn config(&self) -> &DeskConfig {
        &self.cfg
    }

    /// When the head report drops out of the retention window.
    pub fn expires_at(&self, updated_time: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        self.age.expires_at(updated_time)
    }

    /// Emits an event through this desk's sink under its configured
    /// domain. Used by the host surface for its own outward events.
    pub async fn fire_host_event(&self, event_type: &str, payload: &serde_json::Value) {
        self.sink
            .fire(&self.cfg.event_domain, event_type, payload)
            .await;
    }

    /// Deletes the state file. Used when the owning instance goes away.
    pub async fn remove_persisted_state(&self) -> DeskResult<()> {
        self.store.remove().await
    }
}
