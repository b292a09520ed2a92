use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{RawActivity, TabStats};

/// Immutable per-cycle view of all sensed signals. Recomputed fresh every
/// tick and discarded; never mutated after construction.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignalSnapshot {
    pub tab_switches_10s: u32,
    pub tab_switches_30s: u32,
    pub tab_switches_60s: u32,
    pub tab_rate_per_min: f64,
    pub seconds_since_key: f64,
    pub seconds_since_any_input: f64,
    pub seconds_since_pointer: f64,
}

/// Combine raw input recency with aggregated tab stats. Total: always
/// succeeds for any valid `now`; timestamps in the future read as zero
/// seconds ago rather than negative.
pub fn build_snapshot(raw: &RawActivity, tabs: TabStats, now: DateTime<Utc>) -> SignalSnapshot {
    SignalSnapshot {
        tab_switches_10s: tabs.count_10s,
        tab_switches_30s: tabs.count_30s,
        tab_switches_60s: tabs.count_60s,
        tab_rate_per_min: tabs.rate_per_minute,
        seconds_since_key: seconds_since(raw.last_key_at, now),
        seconds_since_any_input: seconds_since(raw.last_input_at, now),
        seconds_since_pointer: seconds_since(raw.last_pointer_at, now),
    }
}

fn seconds_since(then: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - then).num_milliseconds();
    (millis.max(0) as f64) / 1000.0
}
