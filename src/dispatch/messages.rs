//! Status message generation: per-label message pools, a context line
//! derived from cues or the current page, and the compact status prefix
//! shown every cycle.

use rand::seq::SliceRandom;

use crate::context::{preview_text, Mood, PageContext, TextCues};
use crate::engine::state::Label;
use crate::signals::TabStats;

const SNIPPET_STATUS_LEN: usize = 110;
const TITLE_STATUS_LEN: usize = 60;

const FOCUSED_MESSAGES: [&str; 3] = [
    "You're in the zone! Keep going.",
    "Great focus. You've got this.",
    "Flowing nicely. Stay with it.",
];

const NEUTRAL_MESSAGES: [&str; 3] = [
    "Taking it steady. All good.",
    "Finding your rhythm.",
    "No rush, you're doing fine.",
];

const DISTRACTED_MESSAGES: [&str; 3] = [
    "Lots happening. Let's refocus gently.",
    "It's okay. One thing at a time.",
    "Breathe. You can return to center.",
];

const IDLE_MESSAGES: [&str; 3] = [
    "Taking a break? That's wise.",
    "Rest is part of the process.",
    "Recharging. Come back when ready.",
];

pub fn message_pool(label: Label) -> &'static [&'static str] {
    match label {
        Label::Focused => &FOCUSED_MESSAGES,
        Label::Neutral => &NEUTRAL_MESSAGES,
        Label::Distracted => &DISTRACTED_MESSAGES,
        Label::Idle => &IDLE_MESSAGES,
    }
}

/// Pick a status message for a new label, appending a context line when
/// page or cue context gives us something to say.
pub fn compose_message(
    label: Label,
    page: Option<&PageContext>,
    cues: Option<&TextCues>,
) -> String {
    let pool = message_pool(label);
    let mut message = pool
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(NEUTRAL_MESSAGES[0])
        .to_string();

    if let Some(line) = context_line(page, cues) {
        message.push(' ');
        message.push_str(&line);
    }

    message
}

fn context_line(page: Option<&PageContext>, cues: Option<&TextCues>) -> Option<String> {
    if let Some(cues) = cues {
        if let Some(hours) = cues.sleep_hours {
            if hours <= 3 {
                return Some(format!(
                    "Running on {hours} hours of sleep, adding energizing drums."
                ));
            }
        }
        match cues.mood {
            Some(Mood::Tired) => {
                return Some("Feeling the fatigue, boosting the energy a little.".into())
            }
            Some(Mood::Happy) => {
                return Some("Mood is bright, keeping the soundtrack upbeat but focused.".into())
            }
            None => {}
        }
    }

    let page = page?;
    let host = page.host.to_lowercase();
    if host.contains("ycombinator") {
        return Some("YC page spotted, let's make something people want.".into());
    }
    if host.contains("metorial") {
        return Some("Metorial memory mode engaged, celebrating those notes.".into());
    }

    let snippet = preview_text(&page.snippet, SNIPPET_STATUS_LEN);
    if !snippet.is_empty() {
        return Some(format!("I see \"{snippet}\"."));
    }
    if !page.title.is_empty() {
        return Some(format!(
            "Locked on {}.",
            preview_text(&page.title, TITLE_STATUS_LEN)
        ));
    }
    None
}

/// Compact status prefix: label, window counts, optional rate and host,
/// joined with the last status message.
pub fn format_status_line(
    label: Label,
    stats: &TabStats,
    page: Option<&PageContext>,
    message: &str,
) -> String {
    let mut parts = vec![
        titleize(label.as_str()),
        format!("10s:{}", stats.count_10s),
        format!("60s:{}", stats.count_60s),
    ];
    if stats.rate_per_minute > 0.0 {
        parts.push(format!("{:.1} tabs/min", stats.rate_per_minute));
    }
    if let Some(page) = page {
        if !page.host.is_empty() {
            parts.push(format!("@ {}", page.host.trim_start_matches("www.")));
        }
    }

    let prefix = parts.join(" | ");
    if message.is_empty() {
        prefix
    } else {
        format!("{prefix} -- {message}")
    }
}

fn titleize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn composed_message_comes_from_the_label_pool() {
        for _ in 0..20 {
            let message = compose_message(Label::Focused, None, None);
            assert!(FOCUSED_MESSAGES.iter().any(|m| message.starts_with(m)));
        }
    }

    #[test]
    fn low_sleep_beats_other_context_lines() {
        let cues = TextCues {
            sleep_hours: Some(2),
            mood: Some(Mood::Happy),
        };
        let page = PageContext {
            host: "news.ycombinator.com".into(),
            ..Default::default()
        };
        let message = compose_message(Label::Neutral, Some(&page), Some(&cues));
        assert!(message.contains("Running on 2 hours of sleep"));
    }

    #[test]
    fn page_snippet_feeds_the_context_line() {
        let page = PageContext {
            host: "example.com".into(),
            title: "Docs".into(),
            snippet: "async cancellation semantics".into(),
        };
        let line = context_line(Some(&page), None).unwrap();
        assert_eq!(line, "I see \"async cancellation semantics\".");
    }

    #[test]
    fn title_is_the_fallback_when_no_snippet() {
        let page = PageContext {
            host: "example.com".into(),
            title: "Quarterly Plan".into(),
            snippet: String::new(),
        };
        let line = context_line(Some(&page), None).unwrap();
        assert_eq!(line, "Locked on Quarterly Plan.");
    }

    #[test]
    fn status_line_shows_counts_rate_and_host() {
        let stats = TabStats {
            count_10s: 1,
            count_30s: 2,
            count_60s: 4,
            rate_per_minute: 4.0,
        };
        let page = PageContext {
            host: "www.github.com".into(),
            ..Default::default()
        };

        let line = format_status_line(Label::Distracted, &stats, Some(&page), "Breathe.");
        assert_eq!(
            line,
            "Distracted | 10s:1 | 60s:4 | 4.0 tabs/min | @ github.com -- Breathe."
        );
    }

    #[test]
    fn status_line_omits_empty_segments() {
        let line = format_status_line(Label::Neutral, &TabStats::default(), None, "");
        assert_eq!(line, "Neutral | 10s:0 | 60s:0");
    }
}
