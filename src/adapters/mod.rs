//! Capability interfaces for the engine's external collaborators.
//!
//! Every collaborator has an always-present no-op default so the core
//! never branches on "is this adapter wired up".

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::context::{PageContext, TextCues};
use crate::dispatch::prompt::MusicPrompt;
use crate::engine::state::{Label, Mode};
use crate::signals::SignalSnapshot;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayOptions {
    pub instrumental_only: bool,
    pub allow_lyric: bool,
    pub duration_secs: u32,
}

/// Everything a music backend needs to pick or generate a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicContext {
    pub label: Label,
    pub signals: SignalSnapshot,
    pub page: Option<PageContext>,
    pub cues: Option<TextCues>,
    pub options: PlayOptions,
    pub prompt: MusicPrompt,
}

/// Mood-adaptive audio backend. `play` may be slow (remote generation);
/// failures are reflected in `is_playing=false` and retried on the next
/// qualifying cycle, never propagated to the scheduler.
#[async_trait]
pub trait MusicAdapter: Send + Sync {
    async fn play(&self, mode: Mode, context: MusicContext) -> Result<()>;
    async fn pause(&self);
}

/// Spoken status announcements, best effort.
#[async_trait]
pub trait VoiceAdapter: Send + Sync {
    async fn speak(&self, text: String) -> Result<()>;
}

/// Fire-and-forget coaching keyed to label transitions.
pub trait VoiceCoach: Send + Sync {
    fn celebrate_flow(&self);
    fn nudge_focus(&self);
}

/// Lightweight status text, updated every cycle.
pub trait StatusSink: Send + Sync {
    fn update_status(&self, line: &str);
}

pub struct NoopMusic;

#[async_trait]
impl MusicAdapter for NoopMusic {
    async fn play(&self, _mode: Mode, _context: MusicContext) -> Result<()> {
        Ok(())
    }

    async fn pause(&self) {}
}

pub struct NoopVoice;

#[async_trait]
impl VoiceAdapter for NoopVoice {
    async fn speak(&self, _text: String) -> Result<()> {
        Ok(())
    }
}

pub struct NoopCoach;

impl VoiceCoach for NoopCoach {
    fn celebrate_flow(&self) {}
    fn nudge_focus(&self) {}
}

pub struct NoopStatus;

impl StatusSink for NoopStatus {
    fn update_status(&self, _line: &str) {}
}

/// The full adapter set handed to the engine at attach time.
#[derive(Clone)]
pub struct Adapters {
    pub music: Arc<dyn MusicAdapter>,
    pub voice: Arc<dyn VoiceAdapter>,
    pub coach: Arc<dyn VoiceCoach>,
    pub status: Arc<dyn StatusSink>,
}

impl Default for Adapters {
    fn default() -> Self {
        Self {
            music: Arc::new(NoopMusic),
            voice: Arc::new(NoopVoice),
            coach: Arc::new(NoopCoach),
            status: Arc::new(NoopStatus),
        }
    }
}
