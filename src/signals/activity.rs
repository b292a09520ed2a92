use chrono::{DateTime, Utc};
use serde::Serialize;

/// Raw per-session input recency. Created at attach time with every field
/// set to "now" so a fresh session never reads as idle. Passive listeners
/// write these through the narrow mutators; the cycle body only reads.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivity {
    pub last_input_at: DateTime<Utc>,
    pub last_key_at: DateTime<Utc>,
    pub last_pointer_at: DateTime<Utc>,
}

impl RawActivity {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_input_at: now,
            last_key_at: now,
            last_pointer_at: now,
        }
    }

    /// A keystroke counts as both key and any-input activity.
    pub fn note_key(&mut self, now: DateTime<Utc>) {
        self.last_input_at = now;
        self.last_key_at = now;
    }

    /// Pointer movement counts as any-input activity but not as typing.
    pub fn note_pointer(&mut self, now: DateTime<Utc>) {
        self.last_input_at = now;
        self.last_pointer_at = now;
    }
}
