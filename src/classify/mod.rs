//! Rule-based attention classifier.
//!
//! A pure total function over one signal snapshot. Precedence is load
//! bearing: idleness (absence of any input) overrides a stale distracted
//! reading from before the user stepped away; recent distraction overrides
//! a merely-not-idle state; keystroke recency is the weakest signal.

use crate::config::SensitivityProfile;
use crate::engine::state::Label;
use crate::signals::SignalSnapshot;

/// Keystroke recency window that reads as active focus, in seconds.
const FOCUS_KEY_WINDOW_SECS: f64 = 4.0;

/// Classify one snapshot. First rule that matches wins:
///
/// 1. no input for more than `idle_timeout_secs` -> idle
/// 2. more than `distraction_threshold` switches in 60s -> distracted
/// 3. keystroke within the last 4 seconds -> focused
/// 4. otherwise -> neutral
///
/// All threshold comparisons are strict.
pub fn classify(snapshot: &SignalSnapshot, profile: &SensitivityProfile) -> Label {
    if snapshot.seconds_since_any_input > profile.idle_timeout_secs as f64 {
        return Label::Idle;
    }
    if snapshot.tab_switches_60s > profile.distraction_threshold {
        return Label::Distracted;
    }
    if snapshot.seconds_since_key < FOCUS_KEY_WINDOW_SECS {
        return Label::Focused;
    }
    Label::Neutral
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot(
        seconds_since_any_input: f64,
        seconds_since_key: f64,
        tab_switches_60s: u32,
    ) -> SignalSnapshot {
        SignalSnapshot {
            tab_switches_10s: 0,
            tab_switches_30s: 0,
            tab_switches_60s,
            tab_rate_per_min: tab_switches_60s as f64,
            seconds_since_key,
            seconds_since_any_input,
            seconds_since_pointer: seconds_since_any_input,
        }
    }

    fn profile() -> SensitivityProfile {
        SensitivityProfile::default()
    }

    #[test]
    fn recent_typing_reads_as_focused() {
        assert_eq!(classify(&snapshot(2.0, 2.0, 0), &profile()), Label::Focused);
    }

    #[test]
    fn absence_of_input_reads_as_idle_regardless_of_tabs() {
        assert_eq!(classify(&snapshot(15.0, 15.0, 0), &profile()), Label::Idle);
        assert_eq!(classify(&snapshot(15.0, 1.0, 40), &profile()), Label::Idle);
    }

    #[test]
    fn tab_burst_overrides_stale_focus_signal() {
        // Pointer active 1s ago, last keystroke 8s ago, 7 switches in 60s.
        assert_eq!(classify(&snapshot(1.0, 8.0, 7), &profile()), Label::Distracted);
    }

    #[test]
    fn distraction_outranks_recent_typing() {
        assert_eq!(classify(&snapshot(1.0, 1.0, 7), &profile()), Label::Distracted);
    }

    #[test]
    fn quiet_hands_and_quiet_tabs_read_as_neutral() {
        assert_eq!(classify(&snapshot(5.0, 6.0, 2), &profile()), Label::Neutral);
    }

    #[test]
    fn thresholds_are_strict() {
        // Exactly the idle timeout is not idle.
        assert_eq!(classify(&snapshot(10.0, 10.0, 0), &profile()), Label::Neutral);
        // Exactly the distraction threshold is not distracted.
        assert_eq!(classify(&snapshot(1.0, 9.0, 5), &profile()), Label::Neutral);
        // Exactly 4 seconds since a keystroke is not focused.
        assert_eq!(classify(&snapshot(1.0, 4.0, 0), &profile()), Label::Neutral);
        // Just inside each boundary flips the label.
        assert_eq!(classify(&snapshot(10.1, 10.1, 0), &profile()), Label::Idle);
        assert_eq!(classify(&snapshot(1.0, 9.0, 6), &profile()), Label::Distracted);
        assert_eq!(classify(&snapshot(1.0, 3.9, 0), &profile()), Label::Focused);
    }

    #[test]
    fn classification_is_deterministic() {
        let input = snapshot(3.0, 1.5, 4);
        let first = classify(&input, &profile());
        for _ in 0..10 {
            assert_eq!(classify(&input, &profile()), first);
        }
    }
}
