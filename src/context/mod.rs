pub mod cues;

pub use cues::CueExtractor;

use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh3::xxh3_64;

const TITLE_PREVIEW_LEN: usize = 80;
const SNIPPET_PREVIEW_LEN: usize = 160;

/// Page-level context delivered by the event source. Only a host plus
/// short previews ever feed the fingerprint, so deep-page edits beyond
/// the preview length do not churn the audio session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PageContext {
    pub host: String,
    pub title: String,
    pub snippet: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Mood {
    Tired,
    Happy,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mood::Tired => f.write_str("tired"),
            Mood::Happy => f.write_str("happy"),
        }
    }
}

/// Ephemeral cues extracted from typed text (opt-in).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TextCues {
    pub sleep_hours: Option<u8>,
    pub mood: Option<Mood>,
}

/// Opaque stable hash used purely for change detection, never decoded.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Fingerprint of "no context at all".
    pub const EMPTY: Fingerprint = Fingerprint(0);

    fn of(input: &str) -> Self {
        Fingerprint(xxh3_64(input.as_bytes()))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Collapse whitespace runs, trim, and cut to at most `limit` characters.
pub fn preview_text(value: &str, limit: usize) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(limit).collect()
}

/// Stable hash over `(host, title prefix, snippet prefix)`.
pub fn page_fingerprint(page: Option<&PageContext>) -> Fingerprint {
    let Some(page) = page else {
        return Fingerprint::EMPTY;
    };
    let raw = format!(
        "{}|{}|{}",
        page.host,
        preview_text(&page.title, TITLE_PREVIEW_LEN),
        preview_text(&page.snippet, SNIPPET_PREVIEW_LEN),
    );
    Fingerprint::of(&raw)
}

/// Stable hash over `(mood, sleep hours)`.
pub fn cue_fingerprint(cues: Option<&TextCues>) -> Fingerprint {
    let Some(cues) = cues else {
        return Fingerprint::EMPTY;
    };
    let mood = cues.mood.map(|m| m.to_string()).unwrap_or_else(|| "none".into());
    let hours = cues
        .sleep_hours
        .map(|h| h.to_string())
        .unwrap_or_else(|| "na".into());
    Fingerprint::of(&format!("{mood}|{hours}"))
}
