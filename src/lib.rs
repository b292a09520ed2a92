//! Focus-state reasoning engine.
//!
//! Folds raw activity events (keystrokes, pointer movement, tab
//! switches, page context, typed text) into sliding-window signals,
//! classifies the user's attention state on a cooperative single-flight
//! tick loop, and dispatches signature-gated side effects (adaptive
//! music, voice announcements, coaching, status text) through pluggable
//! adapters.
//!
//! ```no_run
//! use std::sync::Arc;
//! use focusloop::{Adapters, EngineController, MemoryConfigStore};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let store = Arc::new(MemoryConfigStore::default());
//! let engine = EngineController::attach(store, Adapters::default()).await?;
//!
//! let sensors = engine.sensor_handle();
//! sensors.note_key();
//! sensors.note_tab_switch(None);
//!
//! println!("{}", engine.get_state().status_line);
//! engine.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod classify;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod engine;
pub mod signals;
pub mod voice;

pub use adapters::{Adapters, MusicAdapter, MusicContext, PlayOptions, StatusSink, VoiceAdapter, VoiceCoach};
pub use classify::classify;
pub use config::{ConfigStore, EngineConfig, FileConfigStore, ManualOverride, MemoryConfigStore, SensitivityProfile};
pub use context::{CueExtractor, Fingerprint, Mood, PageContext, TextCues};
pub use engine::{EngineController, EngineState, Label, Mode, SensorHandle, SessionState};
pub use signals::{SignalSnapshot, TabStats, TabStatsPatch};
pub use voice::{parse_command, VoiceCommand};
