use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::Fingerprint;
use crate::signals::{RawActivity, TabStats};

/// Attention label produced by the classifier. Exactly one holds at any
/// instant; transitions are instantaneous.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Label {
    Focused,
    Neutral,
    Distracted,
    Idle,
}

impl Default for Label {
    fn default() -> Self {
        Label::Neutral
    }
}

impl Label {
    /// Projection onto the audio-session mode. Idle and neutral both map
    /// to calm.
    pub fn mode(self) -> Mode {
        match self {
            Label::Focused => Mode::Focus,
            Label::Distracted => Mode::Refocus,
            Label::Idle | Label::Neutral => Mode::Calm,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Focused => "focused",
            Label::Neutral => "neutral",
            Label::Distracted => "distracted",
            Label::Idle => "idle",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio-session category used to select music behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Focus,
    Refocus,
    Calm,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Calm
    }
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::Refocus => "refocus",
            Mode::Calm => "calm",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only long-lived mutable core state. Owned by the tick cycle:
/// mutated inside a cycle, written back atomically at cycle end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub label: Label,
    pub is_playing: bool,
    pub last_page_fingerprint: Fingerprint,
    pub last_cue_fingerprint: Fingerprint,
    /// Mode dispatched on the most recent music refresh. Lets a manual
    /// override toggle force a refresh even when label and fingerprints
    /// are unchanged.
    pub last_mode: Option<Mode>,
    pub last_status_message: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            label: Label::Neutral,
            is_playing: false,
            last_page_fingerprint: Fingerprint::EMPTY,
            last_cue_fingerprint: Fingerprint::EMPTY,
            last_mode: None,
            last_status_message: String::new(),
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Snapshot handed to UI collaborators via `EngineController::get_state`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub session_id: String,
    pub label: Label,
    pub mode: Mode,
    pub is_playing: bool,
    pub status_line: String,
    pub tab_stats: TabStats,
    pub raw: RawActivity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn label_to_mode_projection() {
        assert_eq!(Label::Focused.mode(), Mode::Focus);
        assert_eq!(Label::Distracted.mode(), Mode::Refocus);
        assert_eq!(Label::Idle.mode(), Mode::Calm);
        assert_eq!(Label::Neutral.mode(), Mode::Calm);
    }

    #[test]
    fn labels_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Label::Focused).unwrap(), "\"focused\"");
        assert_eq!(serde_json::to_string(&Mode::Refocus).unwrap(), "\"refocus\"");
    }

    #[test]
    fn fresh_session_state_is_neutral_and_silent() {
        let state = SessionState::new();
        assert_eq!(state.label, Label::Neutral);
        assert!(!state.is_playing);
        assert_eq!(state.last_mode, None);
        assert_eq!(state.last_page_fingerprint, Fingerprint::EMPTY);
    }
}
