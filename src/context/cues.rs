use regex::Regex;

use super::{Mood, TextCues};

/// Keep only this much recent typed text.
const BUFFER_LIMIT: usize = 500;
/// Trailing slice of each input event that enters the buffer.
const INPUT_TAIL: usize = 160;
/// Few enough hours of sleep to imply tiredness even without a mood phrase.
const TIRED_SLEEP_HOURS: u8 = 4;

const TIRED_PHRASES: [&str; 6] = [
    "so tired",
    "exhausted",
    "burned out",
    "low energy",
    "running on fumes",
    "need more sleep",
];

const HAPPY_PHRASES: [&str; 4] = ["so happy", "feeling great", "good mood", "energized"];

/// Extracts mood and sleep-hour cues from a rolling, ephemeral buffer of
/// typed text. Opt-in: when disabled the buffer is dropped immediately
/// and extraction yields nothing.
#[derive(Debug)]
pub struct CueExtractor {
    buffer: String,
    opt_in: bool,
    sleep_patterns: Vec<Regex>,
}

impl CueExtractor {
    pub fn new() -> Self {
        let sleep_patterns = [
            r"\b(?:slept|sleep)\b.*?\b(\d{1,2})\s*(?:h|hr|hrs|hours)\b",
            r"\b(\d{1,2})\s*(?:h|hr|hrs|hours)\b.*\bsleep\b",
            r"\brunning on\s+(\d{1,2})\s*(?:h|hr|hrs|hours)\b.*\bsleep\b",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("static cue pattern"))
        .collect();

        Self {
            buffer: String::new(),
            opt_in: true,
            sleep_patterns,
        }
    }

    pub fn set_opt_in(&mut self, opt_in: bool) {
        self.opt_in = opt_in;
        if !opt_in {
            self.buffer.clear();
        }
    }

    /// Append the tail of one typed-input event to the rolling buffer.
    pub fn push_text(&mut self, text: &str) {
        if !self.opt_in {
            return;
        }
        let tail: String = tail_chars(text, INPUT_TAIL);
        self.buffer.push(' ');
        self.buffer.push_str(&tail);
        if self.buffer.chars().count() > BUFFER_LIMIT {
            self.buffer = tail_chars(&self.buffer, BUFFER_LIMIT);
        }
    }

    pub fn extract(&self) -> TextCues {
        if !self.opt_in {
            return TextCues::default();
        }

        let lower = self.buffer.to_lowercase();

        let sleep_hours = self.sleep_patterns.iter().find_map(|pattern| {
            pattern
                .captures(&lower)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<u8>().ok())
        });

        let mut mood = if HAPPY_PHRASES.iter().any(|p| lower.contains(p)) {
            Some(Mood::Happy)
        } else if TIRED_PHRASES.iter().any(|p| lower.contains(p)) {
            Some(Mood::Tired)
        } else {
            None
        };

        if mood.is_none() {
            if let Some(hours) = sleep_hours {
                if hours <= TIRED_SLEEP_HOURS {
                    mood = Some(Mood::Tired);
                }
            }
        }

        TextCues { sleep_hours, mood }
    }
}

impl Default for CueExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn tail_chars(value: &str, limit: usize) -> String {
    let count = value.chars().count();
    value.chars().skip(count.saturating_sub(limit)).collect()
}
