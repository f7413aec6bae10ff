//! Runtime configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use trafik_feed::{DEFAULT_BASE_API, FeedConfig, Region, TransportType};

use crate::errors::DeskConfigError;

/// Cap applied when `TRAFIK_MAX_ROWS` is set to `0`.
pub const DEFAULT_MAX_ROWS: usize = 40;

/// Which timestamp orders the report collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Updated,
    Created,
}

impl FromStr for SortKey {
    type Err = DeskConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "updated" => Ok(SortKey::Updated),
            "created" => Ok(SortKey::Created),
            other => Err(DeskConfigError::InvalidSortKey(other.to_string())),
        }
    }
}

/// Toggles for the rendered summaries.
#[derive(Debug, Clone, Copy)]
pub struct DisplayConfig {
    pub show_only_last_update: bool,
    pub include_updates: bool,
    pub include_reference: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_only_last_update: false,
            include_updates: true,
            include_reference: true,
        }
    }
}

/// Config bag for one desk instance. All fields have defaults via
/// `from_env`; only malformed values error.
#[derive(Debug, Clone)]
pub struct DeskConfig {
    // Upstream feed
    pub base_api: String,
    pub regions: Vec<Region>,
    pub transport_types: Vec<TransportType>,
    pub timezone: Tz,
    pub request_timeout: Duration,
    pub fetch_retries: u32,
    pub fetch_retry_delay: Duration,

    // Collection shape
    pub max_age_hours: i64,
    pub max_age_hours_concluded: i64,
    pub max_rows: usize,
    pub sort_key: SortKey,

    // Keyword relevance
    pub match_terms: Vec<String>,
    pub match_word: bool,
    pub match_case: bool,

    // Rendering
    pub display: DisplayConfig,

    // Persistence and events
    pub state_dir: String,
    pub instance_id: String,
    pub event_domain: String,
    pub webhook_url: Option<String>,
}

impl DeskConfig {
    /// Build from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, DeskConfigError> {
        let timezone_raw = env("TRAFIK_TIMEZONE", "Europe/Copenhagen");
        let timezone: Tz = timezone_raw
            .parse()
            .map_err(|_| DeskConfigError::InvalidTimezone(timezone_raw))?;

        let max_rows = match parse("TRAFIK_MAX_ROWS", 20usize) {
            0 => DEFAULT_MAX_ROWS,
            n => n,
        };

        Ok(Self {
            base_api: env("TRAFIK_API_BASE", DEFAULT_BASE_API),
            regions: parse_regions(&env("TRAFIK_REGIONS", "all"))?,
            transport_types: parse_transport_types(&env("TRAFIK_TRANSPORT_TYPES", "all"))?,
            timezone,
            request_timeout: Duration::from_secs(parse("TRAFIK_REQUEST_TIMEOUT_SECS", 10)),
            fetch_retries: parse("TRAFIK_FETCH_RETRIES", 3u32),
            fetch_retry_delay: Duration::from_millis(parse("TRAFIK_FETCH_RETRY_DELAY_MS", 1000)),

            max_age_hours: parse("TRAFIK_MAX_AGE_HOURS", 24i64),
            max_age_hours_concluded: parse("TRAFIK_MAX_AGE_HOURS_CONCLUDED", 4i64),
            max_rows,
            sort_key: env("TRAFIK_SORT_KEY", "updated").parse()?,

            match_terms: csv(&env("TRAFIK_MATCH_TERMS", "")),
            match_word: env("TRAFIK_MATCH_WORD", "false") == "true",
            match_case: env("TRAFIK_MATCH_CASE", "false") == "true",

            display: DisplayConfig {
                show_only_last_update: env("TRAFIK_SHOW_ONLY_LAST_UPDATE", "false") == "true",
                include_updates: env("TRAFIK_INCLUDE_UPDATES", "true") == "true",
                include_reference: env("TRAFIK_INCLUDE_REFERENCE", "true") == "true",
            },

            state_dir: env("TRAFIK_STATE_DIR", "trafik_data/state"),
            instance_id: env("TRAFIK_INSTANCE_ID", "default"),
            event_domain: env("TRAFIK_EVENT_DOMAIN", "trafik_bridge"),
            webhook_url: std::env::var("TRAFIK_EVENT_WEBHOOK_URL").ok(),
        })
    }

    /// Convert to the `trafik_feed::FeedConfig` used by `FeedClient`.
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            base_api: self.base_api.clone(),
            regions: self.regions.clone(),
            transport_types: self.transport_types.clone(),
            timezone: self.timezone,
            request_timeout: self.request_timeout,
        }
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k).unwrap_or_else(|_| dflt.to_string())
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(dflt)
}

fn csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Region filter from a csv of wire names. The `all` sentinel (and an
/// empty list) means no server-side filter at all.
fn parse_regions(value: &str) -> Result<Vec<Region>, DeskConfigError> {
    let mut regions = Vec::new();
    let mut saw_all = false;
    for token in csv(value) {
        let token = token.to_lowercase();
        if token == "all" {
            saw_all = true;
            continue;
        }
        match Region::from_wire(&token) {
            Some(region) if !regions.contains(&region) => regions.push(region),
            Some(_) => {}
            None => return Err(DeskConfigError::UnknownRegion(token)),
        }
    }
    if saw_all {
        return Ok(Vec::new());
    }
    Ok(regions)
}

fn parse_transport_types(value: &str) -> Result<Vec<TransportType>, DeskConfigError> {
    let mut types = Vec::new();
    let mut saw_all = false;
    for token in csv(value) {
        let token = token.to_lowercase();
        if token == "all" {
            saw_all = true;
            continue;
        }
        match TransportType::from_wire(&token) {
            Some(transport) if !types.contains(&transport) => types.push(transport),
            Some(_) => {}
            None => return Err(DeskConfigError::UnknownTransportType(token)),
        }
    }
    if saw_all {
        return Ok(Vec::new());
    }
    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_trims_and_drops_empty_tokens() {
        assert_eq!(csv(" metro , s-tog ,,bro"), vec!["metro", "s-tog", "bro"]);
        assert!(csv("").is_empty());
        assert!(csv(" , ").is_empty());
    }

    #[test]
    fn all_sentinel_means_unfiltered() {
        assert!(parse_regions("all").unwrap().is_empty());
        assert!(parse_regions("").unwrap().is_empty());
        // The sentinel overrides any concrete names next to it.
        assert!(parse_regions("cph,all").unwrap().is_empty());
    }

    #[test]
    fn region_names_are_validated_and_deduped() {
        assert_eq!(
            parse_regions("cph, south ,cph").unwrap(),
            vec![Region::Cph, Region::South]
        );
        assert!(matches!(
            parse_regions("cph,bogus"),
            Err(DeskConfigError::UnknownRegion(t)) if t == "bogus"
        ));
    }

    #[test]
    fn transport_types_parse_like_regions() {
        assert_eq!(
            parse_transport_types("PUBLIC").unwrap(),
            vec![TransportType::Public]
        );
        assert!(parse_transport_types("all").unwrap().is_empty());
        assert!(matches!(
            parse_transport_types("cykel"),
            Err(DeskConfigError::UnknownTransportType(t)) if t == "cykel"
        ));
    }

    #[test]
    fn sort_key_parses_case_insensitively() {
        assert_eq!("updated".parse::<SortKey>().unwrap(), SortKey::Updated);
        assert_eq!(" Created ".parse::<SortKey>().unwrap(), SortKey::Created);
        assert!(matches!(
            "newest".parse::<SortKey>(),
            Err(DeskConfigError::InvalidSortKey(t)) if t == "newest"
        ));
    }
}
