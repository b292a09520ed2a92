//! Demo driver: wires the engine to logging adapters and replays a short
//! scripted activity session (typing, a tab burst, idle) so the label
//! transitions are visible on stderr.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use tokio::time::sleep;

use focusloop::{
    Adapters, EngineController, MemoryConfigStore, Mode, MusicAdapter, MusicContext, PageContext,
    StatusSink, TabStatsPatch, VoiceAdapter,
};

struct LoggingMusic;

#[async_trait]
impl MusicAdapter for LoggingMusic {
    async fn play(&self, mode: Mode, context: MusicContext) -> Result<()> {
        info!("music refresh: mode={mode} prompt={:?}", context.prompt.prompt);
        Ok(())
    }

    async fn pause(&self) {
        info!("music paused");
    }
}

struct LoggingVoice;

#[async_trait]
impl VoiceAdapter for LoggingVoice {
    async fn speak(&self, text: String) -> Result<()> {
        info!("voice: {text}");
        Ok(())
    }
}

struct LoggingStatus;

impl StatusSink for LoggingStatus {
    fn update_status(&self, line: &str) {
        info!("status: {line}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Reads RUST_LOG, defaults to info.
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let store = Arc::new(MemoryConfigStore::default());
    let adapters = Adapters {
        music: Arc::new(LoggingMusic),
        voice: Arc::new(LoggingVoice),
        status: Arc::new(LoggingStatus),
        ..Default::default()
    };

    let engine = EngineController::attach(store, adapters).await?;
    let sensors = engine.sensor_handle();

    // Steady typing on a documentation page.
    sensors.set_page_context(Some(PageContext {
        host: "docs.rs".into(),
        title: "tokio::time - Rust".into(),
        snippet: "Utilities for tracking time and scheduling work.".into(),
    }));
    for _ in 0..6 {
        sensors.push_typed_text("working through the scheduler notes, feeling great");
        sleep(Duration::from_millis(500)).await;
    }
    info!("after typing: {}", engine.get_state().status_line);

    // A burst of tab switches.
    for _ in 0..7 {
        sensors.note_tab_switch(None);
        sleep(Duration::from_millis(150)).await;
    }
    sensors.tab_burst(Some(&TabStatsPatch {
        count_60s: Some(8),
        ..Default::default()
    }));
    sleep(Duration::from_millis(500)).await;
    info!("after tab burst: {}", engine.get_state().status_line);

    // Go quiet long enough for the interval tick to see idle input.
    sleep(Duration::from_secs(12)).await;
    info!("after going idle: {}", engine.get_state().status_line);

    engine.shutdown().await
}
