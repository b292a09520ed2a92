use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const WINDOW_10S: i64 = 10;
const WINDOW_30S: i64 = 30;
const WINDOW_60S: i64 = 60;

/// Rolling tab-switch counts over nested windows plus a derived rate.
///
/// Invariant: `count_10s <= count_30s <= count_60s`. Enforced by raising
/// smaller counts up to satisfy ordering, never lowering larger ones.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabStats {
    pub count_10s: u32,
    pub count_30s: u32,
    pub count_60s: u32,
    pub rate_per_minute: f64,
}

impl TabStats {
    /// Raise the larger windows so the nested-window ordering holds.
    fn clamp_monotone(mut self) -> Self {
        self.count_30s = self.count_30s.max(self.count_10s);
        self.count_60s = self.count_60s.max(self.count_30s);
        self
    }
}

/// Partial stats delivered by an external, separately-clocked counter
/// (e.g. a background process with its own 10-second hard reset). Absent
/// fields mean "no data for this window", not zero.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabStatsPatch {
    pub count_10s: Option<u32>,
    pub count_30s: Option<u32>,
    pub count_60s: Option<u32>,
    pub rate_per_minute: Option<f64>,
}

/// Aggregates tab-switch activity from two sources: locally recorded
/// switch events (exact timestamps, pruned per window) and pre-aggregated
/// counts merged in from an external counter. Snapshots reconcile the two
/// without ever contradicting the nested-window invariant.
#[derive(Debug, Default)]
pub struct TabTracker {
    events: VecDeque<DateTime<Utc>>,
    merged: TabStats,
}

impl TabTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one locally observed tab switch.
    pub fn record_switch(&mut self, now: DateTime<Utc>) {
        self.events.push_back(now);
        self.prune(now);
    }

    /// Fold in counts from the external counter. Missing windows keep the
    /// last known value so an independent reset never produces a spurious
    /// "burst ended" signal.
    pub fn merge(&mut self, patch: &TabStatsPatch) {
        let prior = self.merged;
        let next = TabStats {
            count_10s: patch.count_10s.unwrap_or(prior.count_10s),
            count_30s: patch.count_30s.unwrap_or(prior.count_30s),
            count_60s: patch.count_60s.unwrap_or(prior.count_60s),
            rate_per_minute: patch.rate_per_minute.unwrap_or(prior.rate_per_minute),
        };
        self.merged = next.clamp_monotone();
    }

    /// Current stats as a value copy. Local and merged counts are
    /// reconciled per window by taking whichever is larger.
    pub fn snapshot(&self, now: DateTime<Utc>) -> TabStats {
        let local_10 = self.count_since(now, WINDOW_10S);
        let local_30 = self.count_since(now, WINDOW_30S);
        let local_60 = self.count_since(now, WINDOW_60S);

        let rate = if self.merged.rate_per_minute > 0.0 {
            self.merged.rate_per_minute
        } else {
            local_60.max(self.merged.count_60s) as f64
        };

        TabStats {
            count_10s: local_10.max(self.merged.count_10s),
            count_30s: local_30.max(self.merged.count_30s),
            count_60s: local_60.max(self.merged.count_60s),
            rate_per_minute: rate,
        }
        .clamp_monotone()
    }

    fn count_since(&self, now: DateTime<Utc>, window_secs: i64) -> u32 {
        let cutoff = now - Duration::seconds(window_secs);
        self.events.iter().filter(|t| **t > cutoff).count() as u32
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = now - Duration::seconds(WINDOW_60S);
        while let Some(front) = self.events.front() {
            if *front > cutoff {
                break;
            }
            self.events.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_monotone(stats: &TabStats) {
        assert!(
            stats.count_10s <= stats.count_30s && stats.count_30s <= stats.count_60s,
            "window ordering violated: {stats:?}"
        );
    }

    #[test]
    fn local_switches_age_out_of_windows() {
        let mut tracker = TabTracker::new();
        let start = Utc::now();

        for i in 0..4 {
            tracker.record_switch(start + Duration::seconds(i));
        }

        let at_5s = tracker.snapshot(start + Duration::seconds(5));
        assert_eq!(at_5s.count_10s, 4);
        assert_eq!(at_5s.count_60s, 4);

        let at_25s = tracker.snapshot(start + Duration::seconds(25));
        assert_eq!(at_25s.count_10s, 0);
        assert_eq!(at_25s.count_30s, 4);

        let at_90s = tracker.snapshot(start + Duration::seconds(90));
        assert_eq!(at_90s.count_60s, 0);
    }

    #[test]
    fn merge_raises_smaller_windows_never_lowers_larger() {
        let mut tracker = TabTracker::new();
        tracker.merge(&TabStatsPatch {
            count_10s: Some(6),
            count_30s: Some(2),
            count_60s: Some(1),
            rate_per_minute: None,
        });

        let stats = tracker.snapshot(Utc::now());
        assert_eq!(stats.count_10s, 6);
        assert_eq!(stats.count_30s, 6);
        assert_eq!(stats.count_60s, 6);
        assert_monotone(&stats);
    }

    #[test]
    fn merge_missing_window_keeps_last_known_value() {
        let mut tracker = TabTracker::new();
        tracker.merge(&TabStatsPatch {
            count_10s: Some(2),
            count_30s: Some(5),
            count_60s: Some(8),
            rate_per_minute: Some(8.0),
        });
        // External counter reset: only the fine window reports.
        tracker.merge(&TabStatsPatch {
            count_10s: Some(0),
            ..Default::default()
        });

        let stats = tracker.snapshot(Utc::now());
        assert_eq!(stats.count_30s, 5);
        assert_eq!(stats.count_60s, 8);
        assert_eq!(stats.rate_per_minute, 8.0);
    }

    #[test]
    fn ordering_holds_for_interleaved_record_and_merge() {
        let mut tracker = TabTracker::new();
        let start = Utc::now();

        for i in 0..8 {
            tracker.record_switch(start + Duration::seconds(i * 7));
            tracker.merge(&TabStatsPatch {
                count_10s: Some(i as u32),
                count_60s: Some((i as u32).saturating_sub(2)),
                ..Default::default()
            });
            assert_monotone(&tracker.snapshot(start + Duration::seconds(i * 7)));
        }
    }

    #[test]
    fn rate_falls_back_to_sixty_second_count() {
        let mut tracker = TabTracker::new();
        let start = Utc::now();
        tracker.record_switch(start);
        tracker.record_switch(start + Duration::seconds(1));

        let stats = tracker.snapshot(start + Duration::seconds(2));
        assert_eq!(stats.rate_per_minute, 2.0);
    }
}
