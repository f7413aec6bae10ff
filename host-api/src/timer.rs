//! Rotation trigger: either an internal interval or an external host
//! timer entity whose `timer_finished` events arrive over HTTP.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::core::app_state::IssueRegistry;

/// Outward event asking the host to restart its rotation timer.
pub const EVENT_TIMER_RESTART: &str = "timer_restart";

#[derive(Debug, Error)]
pub enum TimerTriggerError {
    /// Neither a timer entity nor a positive rotation interval was
    /// configured.
    #[error("rotation needs a timer entity or a positive interval")]
    Parameter,
}

#[derive(Debug)]
enum TimerMode {
    /// Internal `tokio` interval loop.
    Interval(Duration),
    /// External host timer; ticks arrive via the events route. `valid`
    /// is false when the entity is not known to the host, which leaves
    /// rotation disabled.
    Entity { entity_id: String, valid: bool },
}

/// Drives the rotation cursor. Construction validates the configuration
/// once; an unknown timer entity degrades to no rotation instead of
/// failing the boot.
#[derive(Debug)]
pub struct TimerTrigger {
    mode: TimerMode,
    auto_restart: bool,
    restarting: AtomicBool,
}

impl TimerTrigger {
    /// Builds the trigger. An entity always wins over the interval; no
    /// entity and a zero interval is a configuration error.
    pub fn new(
        timer_entity: Option<&str>,
        known_entities: &[String],
        rotate_every: Duration,
        auto_restart: bool,
        issues: &IssueRegistry,
    ) -> Result<Self, TimerTriggerError> {
        let mode = match timer_entity {
            Some(entity) => {
                let valid = known_entities.iter().any(|e| e == entity);
                if !valid {
                    warn!(entity, "rotation timer entity is not known to this host");
                    issues.record(format!(
                        "rotation timer entity '{entity}' is not known to this host; rotation is disabled"
                    ));
                }
                TimerMode::Entity {
                    entity_id: entity.to_string(),
                    valid,
                }
            }
            None if rotate_every > Duration::ZERO => TimerMode::Interval(rotate_every),
            None => return Err(TimerTriggerError::Parameter),
        };
        Ok(Self {
            mode,
            auto_restart,
            restarting: AtomicBool::new(false),
        })
    }

    /// Interval for the internal rotation loop, when that mode is active.
    pub fn interval(&self) -> Option<Duration> {
        match self.mode {
            TimerMode::Interval(every) => Some(every),
            TimerMode::Entity { .. } => None,
        }
    }

    /// Whether a `timer_finished` event for `entity` drives this trigger.
    pub fn accepts(&self, entity: &str) -> bool {
        match &self.mode {
            TimerMode::Entity { entity_id, valid } => *valid && entity_id == entity,
            TimerMode::Interval(_) => false,
        }
    }

    pub fn auto_restart(&self) -> bool {
        self.auto_restart
    }

    /// Claims the restart latch. Returns false when a restart is
    /// already in flight, so overlapping ticks fire at most one.
    pub fn begin_restart(&self) -> bool {
        !self.restarting.swap(true, Ordering::SeqCst)
    }

    pub fn finish_restart(&self) {
        self.restarting.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn interval_mode_without_an_entity() {
        let issues = IssueRegistry::new();
        let trigger = TimerTrigger::new(
            None,
            &[],
            Duration::from_secs(30),
            false,
            &issues,
        )
        .unwrap();

        assert_eq!(trigger.interval(), Some(Duration::from_secs(30)));
        assert!(!trigger.accepts("timer.rotate"));
        assert!(issues.snapshot().is_empty());
    }

    #[test]
    fn zero_interval_and_no_entity_is_a_parameter_error() {
        let issues = IssueRegistry::new();
        let result = TimerTrigger::new(None, &[], Duration::ZERO, false, &issues);
        assert!(matches!(result, Err(TimerTriggerError::Parameter)));
    }

    #[test]
    fn known_entity_drives_rotation() {
        let issues = IssueRegistry::new();
        let trigger = TimerTrigger::new(
            Some("timer.trafik_rotate"),
            &entities(&["timer.trafik_rotate", "timer.other"]),
            Duration::from_secs(30),
            true,
            &issues,
        )
        .unwrap();

        assert!(trigger.interval().is_none());
        assert!(trigger.accepts("timer.trafik_rotate"));
        assert!(!trigger.accepts("timer.other"));
        assert!(trigger.auto_restart());
    }

    #[test]
    fn unknown_entity_degrades_and_records_an_issue() {
        let issues = IssueRegistry::new();
        let trigger = TimerTrigger::new(
            Some("timer.missing"),
            &entities(&["timer.other"]),
            Duration::from_secs(30),
            false,
            &issues,
        )
        .unwrap();

        assert!(trigger.interval().is_none());
        assert!(!trigger.accepts("timer.missing"));
        assert_eq!(issues.snapshot().len(), 1);
        assert!(issues.snapshot()[0].contains("timer.missing"));
    }

    #[test]
    fn restart_latch_admits_one_at_a_time() {
        let issues = IssueRegistry::new();
        let trigger = TimerTrigger::new(
            Some("timer.trafik_rotate"),
            &entities(&["timer.trafik_rotate"]),
            Duration::from_secs(30),
            true,
            &issues,
        )
        .unwrap();

        assert!(trigger.begin_restart());
        assert!(!trigger.begin_restart());
        trigger.finish_restart();
        assert!(trigger.begin_restart());
    }
}
