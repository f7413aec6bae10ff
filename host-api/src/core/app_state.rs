use std::sync::{Arc, Mutex};
use std::time::Duration;

use report_desk::ReportDesk;

use crate::error_handler::AppError;
use crate::timer::TimerTrigger;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The desk behind a mutex: schedulers and handlers mutate it
    /// concurrently.
    pub desk: Arc<tokio::sync::Mutex<ReportDesk>>,
    pub host: Arc<HostConfig>,
    pub rotation: Arc<TimerTrigger>,
    pub issues: Arc<IssueRegistry>,
}

impl AppState {
    /// Load shared state from environment variables.
    pub async fn from_env() -> Result<Self, AppError> {
        let host = HostConfig::from_env()?;
        let issues = Arc::new(IssueRegistry::new());
        let rotation = TimerTrigger::new(
            host.rotate_timer_entity.as_deref(),
            &host.timer_entities,
            host.rotate_every,
            host.rotate_auto_restart,
            &issues,
        )?;
        let desk = ReportDesk::from_env().await?;

        Ok(Self {
            desk: Arc::new(tokio::sync::Mutex::new(desk)),
            host: Arc::new(host),
            rotation: Arc::new(rotation),
            issues,
        })
    }
}

/// Host-side knobs: bind address, polling cadence, rotation wiring.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Bind address, e.g. "127.0.0.1:8080". Required.
    pub api_address: String,
    pub refresh_every: Duration,
    pub notice_refresh_every: Duration,
    pub rotate_every: Duration,
    /// External host timer driving rotation instead of the interval.
    pub rotate_timer_entity: Option<String>,
    pub rotate_auto_restart: bool,
    /// Timer entities this host knows about.
    pub timer_entities: Vec<String>,
}

impl HostConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let api_address =
            std::env::var("API_ADDRESS").map_err(|_| AppError::MissingEnv("API_ADDRESS"))?;

        Ok(Self {
            api_address,
            refresh_every: Duration::from_secs(parse("TRAFIK_REFRESH_EVERY_SECS", 120)),
            notice_refresh_every: Duration::from_secs(parse(
                "TRAFIK_NOTICE_REFRESH_EVERY_SECS",
                300,
            )),
            rotate_every: Duration::from_secs(parse("TRAFIK_ROTATE_EVERY_SECS", 30)),
            rotate_timer_entity: std::env::var("TRAFIK_ROTATE_TIMER_ENTITY").ok(),
            rotate_auto_restart: env("TRAFIK_ROTATE_AUTO_RESTART", "false") == "true",
            timer_entities: csv(&env("HOST_TIMER_ENTITIES", "")),
        })
    }
}

/// Persistent warnings surfaced through diagnostics. A message is
/// recorded once and kept for the process lifetime.
#[derive(Debug, Default)]
pub struct IssueRegistry {
    issues: Mutex<Vec<String>>,
}

impl IssueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, message: String) {
        let mut issues = self.issues.lock().unwrap_or_else(|e| e.into_inner());
        if !issues.contains(&message) {
            issues.push(message);
        }
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.issues.lock().unwrap_or_else(|e| e.into_inner()).clone()
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
