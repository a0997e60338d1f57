//! Device event counters

use crate::types::InterfaceChange;
use std::time::{Duration, Instant};

/// Counters for events seen by a device plugin
#[derive(Debug, Clone, Default)]
pub struct EventMetrics {
    /// Records taken from the monitor
    pub events_received: u64,

    /// Readable wakeups with nothing pending
    pub empty_wakeups: u64,

    /// Records dropped because they were not network devices
    pub foreign_subsystem: u64,

    /// Network records whose action is not tracked
    pub ignored_actions: u64,

    /// Present notifications sent to the daemon
    pub interfaces_present: u64,

    /// Gone notifications sent to the daemon
    pub interfaces_gone: u64,

    /// When the last record was received
    pub last_event: Option<Instant>,
}

impl EventMetrics {
    /// Create new metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a received event
    pub fn record_event(&mut self) {
        self.events_received += 1;
        self.last_event = Some(Instant::now());
    }

    /// Record a wakeup that yielded no event
    pub fn record_empty(&mut self) {
        self.empty_wakeups += 1;
    }

    /// Record an event outside the network device class
    pub fn record_foreign(&mut self) {
        self.foreign_subsystem += 1;
    }

    /// Record a network event with an untracked action
    pub fn record_ignored(&mut self) {
        self.ignored_actions += 1;
    }

    /// Record a notification sent to the daemon
    pub fn record_change(&mut self, change: InterfaceChange) {
        match change {
            InterfaceChange::Present => self.interfaces_present += 1,
            InterfaceChange::Gone => self.interfaces_gone += 1,
        }
    }

    /// Total notifications sent to the daemon
    pub fn notifications(&self) -> u64 {
        self.interfaces_present + self.interfaces_gone
    }

    /// Time since the last record, if any arrived
    pub fn since_last_event(&self) -> Option<Duration> {
        self.last_event.map(|t| t.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = EventMetrics::new();
        assert_eq!(metrics.events_received, 0);
        assert_eq!(metrics.notifications(), 0);
        assert!(metrics.since_last_event().is_none());
    }

    #[test]
    fn test_record_changes() {
        let mut metrics = EventMetrics::new();
        metrics.record_event();
        metrics.record_change(InterfaceChange::Present);
        metrics.record_event();
        metrics.record_change(InterfaceChange::Gone);
        metrics.record_event();
        metrics.record_ignored();

        assert_eq!(metrics.events_received, 3);
        assert_eq!(metrics.interfaces_present, 1);
        assert_eq!(metrics.interfaces_gone, 1);
        assert_eq!(metrics.ignored_actions, 1);
        assert_eq!(metrics.notifications(), 2);
        assert!(metrics.since_last_event().is_some());
    }
}
