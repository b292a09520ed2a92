use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, error, info, warn};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex as StdMutex,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::adapters::{Adapters, PlayOptions};
use crate::classify::classify;
use crate::config::{ConfigStore, EngineConfig, ManualOverride};
use crate::context::{cue_fingerprint, page_fingerprint, CueExtractor, PageContext, TextCues};
use crate::dispatch::{CycleInput, Dispatcher};
use crate::signals::{build_snapshot, RawActivity, TabStatsPatch, TabTracker};
use crate::voice::VoiceCommand;

use super::gate::TickGate;
use super::state::{EngineState, Mode, SessionState};

/// Baseline reasoning cadence.
pub const TICK_INTERVAL: Duration = Duration::from_secs(10);
/// Pause before a coalesced follow-up cycle, so just-settled side effects
/// flush first.
pub const FOLLOW_UP_DELAY: Duration = Duration::from_millis(120);

const TRIGGER_QUEUE_CAPACITY: usize = 16;

/// Sensor records written by passive listeners, read by the cycle body.
struct Sensors {
    raw: RawActivity,
    tabs: TabTracker,
    cues: CueExtractor,
    latest_cues: Option<TextCues>,
    page: Option<PageContext>,
}

/// Session state plus config, written back atomically at cycle end and
/// read by UI collaborators between cycles.
struct View {
    session: SessionState,
    config: EngineConfig,
    manual_override: ManualOverride,
    status_line: String,
}

struct Inner {
    session_id: Uuid,
    sensors: StdMutex<Sensors>,
    view: StdMutex<View>,
    gate: StdMutex<TickGate>,
    trigger_tx: mpsc::Sender<String>,
    dispatcher: Dispatcher,
    config_store: Arc<dyn ConfigStore>,
    cancel: CancellationToken,
    voice_muted: AtomicBool,
}

/// The focus-state reasoning engine. Owns the reasoning loop task; hands
/// out a [`SensorHandle`] so listeners can write activity without ever
/// invoking the cycle body directly.
pub struct EngineController {
    inner: Arc<Inner>,
    handle: StdMutex<Option<JoinHandle<()>>>,
}

impl EngineController {
    /// Load config, spawn the reasoning loop, and return the controller.
    /// The loop's first cycle runs immediately.
    pub async fn attach(config_store: Arc<dyn ConfigStore>, adapters: Adapters) -> Result<Self> {
        let config = config_store
            .load()
            .await
            .context("failed to load engine config")?;

        let now = Utc::now();
        let mut cues = CueExtractor::new();
        cues.set_opt_in(config.allow_typed_cues);

        let (trigger_tx, trigger_rx) = mpsc::channel(TRIGGER_QUEUE_CAPACITY);
        let config_rx = config_store.changes();

        let inner = Arc::new(Inner {
            session_id: Uuid::new_v4(),
            sensors: StdMutex::new(Sensors {
                raw: RawActivity::new(now),
                tabs: TabTracker::new(),
                cues,
                latest_cues: None,
                page: None,
            }),
            view: StdMutex::new(View {
                session: SessionState::new(),
                manual_override: config.manual_override,
                config,
                status_line: String::new(),
            }),
            gate: StdMutex::new(TickGate::new()),
            trigger_tx,
            dispatcher: Dispatcher::new(adapters),
            config_store,
            cancel: CancellationToken::new(),
            voice_muted: AtomicBool::new(false),
        });

        info!("focus engine attached (session {})", inner.session_id);

        let handle = tokio::spawn(run_loop(Arc::clone(&inner), trigger_rx, config_rx));

        Ok(Self {
            inner,
            handle: StdMutex::new(Some(handle)),
        })
    }

    /// Request an out-of-band cycle. Idempotent under concurrent calls:
    /// requests landing while a cycle is in flight coalesce into exactly
    /// one follow-up.
    pub fn request_tick(&self, reason: &str) {
        self.inner.request_tick(reason);
    }

    /// Synchronous state read for UI polling.
    pub fn get_state(&self) -> EngineState {
        let now = Utc::now();
        let (raw, tab_stats) = {
            let sensors = self.inner.sensors.lock().unwrap();
            (sensors.raw, sensors.tabs.snapshot(now))
        };
        let view = self.inner.view.lock().unwrap();
        let mode = if view.manual_override.active {
            view.manual_override
                .mode
                .unwrap_or_else(|| view.session.label.mode())
        } else {
            view.session.label.mode()
        };

        EngineState {
            session_id: self.inner.session_id.to_string(),
            label: view.session.label,
            mode,
            is_playing: view.session.is_playing,
            status_line: view.status_line.clone(),
            tab_stats,
            raw,
        }
    }

    /// Force a mode (`Some`) or resume automatic selection (`None`).
    /// The classifier keeps running either way, so clearing the override
    /// yields a correct automatic mode on the very next cycle.
    pub fn set_manual_mode(&self, mode: Option<Mode>) {
        {
            let mut view = self.inner.view.lock().unwrap();
            view.manual_override = match mode {
                Some(mode) => ManualOverride {
                    active: true,
                    mode: Some(mode),
                },
                None => ManualOverride::default(),
            };
        }
        self.request_tick("set-mode");
    }

    pub async fn pause_music(&self) {
        self.inner.dispatcher.pause().await;
        let mut view = self.inner.view.lock().unwrap();
        view.session.is_playing = false;
    }

    /// Suppress spoken announcements and coaching without touching the
    /// persisted config.
    pub fn set_voice_muted(&self, muted: bool) {
        self.inner.voice_muted.store(muted, Ordering::Relaxed);
    }

    pub async fn apply_voice_command(&self, command: VoiceCommand) {
        match command {
            VoiceCommand::Mute => self.set_voice_muted(true),
            VoiceCommand::Pause => self.pause_music().await,
            // Not playing any more, so the next cycle refreshes the session.
            VoiceCommand::Resume => self.request_tick("voice-resume"),
            VoiceCommand::Focus => self.set_manual_mode(Some(Mode::Focus)),
            VoiceCommand::Refocus => self.set_manual_mode(Some(Mode::Refocus)),
            VoiceCommand::Calm => self.set_manual_mode(Some(Mode::Calm)),
            VoiceCommand::Auto => self.set_manual_mode(None),
        }
    }

    /// Write-capability handle for passive event listeners.
    pub fn sensor_handle(&self) -> SensorHandle {
        SensorHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.inner.cancel.cancel();
        let handle = self.handle.lock().unwrap().take();
        if let Some(handle) = handle {
            handle.await.context("engine loop task failed to join")?;
        }
        Ok(())
    }
}

/// Narrow mutation surface handed to keystroke/pointer/tab listeners.
/// Listeners never run the cycle body; they write sensor fields and
/// request a trigger, preserving the single-flight discipline.
#[derive(Clone)]
pub struct SensorHandle {
    inner: Arc<Inner>,
}

impl SensorHandle {
    pub fn note_key(&self) {
        let mut sensors = self.inner.sensors.lock().unwrap();
        sensors.raw.note_key(Utc::now());
    }

    pub fn note_pointer(&self) {
        let mut sensors = self.inner.sensors.lock().unwrap();
        sensors.raw.note_pointer(Utc::now());
    }

    /// One locally observed tab activation, optionally with the external
    /// counter's latest stats.
    pub fn note_tab_switch(&self, patch: Option<&TabStatsPatch>) {
        {
            let mut sensors = self.inner.sensors.lock().unwrap();
            sensors.tabs.record_switch(Utc::now());
            if let Some(patch) = patch {
                sensors.tabs.merge(patch);
            }
        }
        self.inner.request_tick("tab-switch");
    }

    /// Pre-aggregated stats from the external counter.
    pub fn merge_tab_stats(&self, patch: &TabStatsPatch) {
        {
            let mut sensors = self.inner.sensors.lock().unwrap();
            sensors.tabs.merge(patch);
        }
        self.inner.request_tick("tab-activity");
    }

    /// Burst alert from the external counter: merge, nudge, tick.
    pub fn tab_burst(&self, patch: Option<&TabStatsPatch>) {
        if let Some(patch) = patch {
            let mut sensors = self.inner.sensors.lock().unwrap();
            sensors.tabs.merge(patch);
        }

        let coach_enabled = {
            let view = self.inner.view.lock().unwrap();
            view.config.use_voice_coach
        };
        if coach_enabled && !self.inner.voice_muted.load(Ordering::Relaxed) {
            self.inner.dispatcher.nudge_focus();
        }

        self.inner.request_tick("tab-burst");
    }

    pub fn set_page_context(&self, page: Option<PageContext>) {
        {
            let mut sensors = self.inner.sensors.lock().unwrap();
            sensors.page = page;
        }
        self.inner.request_tick("page-change");
    }

    /// Feed typed text into the cue extractor; only a changed cue reading
    /// requests a tick.
    pub fn push_typed_text(&self, text: &str) {
        let changed = {
            let mut sensors = self.inner.sensors.lock().unwrap();
            sensors.raw.note_key(Utc::now());
            sensors.cues.push_text(text);
            let cues = sensors.cues.extract();
            let changed = sensors.latest_cues != Some(cues);
            if changed {
                sensors.latest_cues = Some(cues);
            }
            changed
        };
        if changed {
            self.inner.request_tick("cue-change");
        }
    }
}

impl Inner {
    fn request_tick(&self, reason: &str) {
        {
            let mut gate = self.gate.lock().unwrap();
            if gate.is_running() {
                // Coalesce into the in-flight cycle's single follow-up.
                let _ = gate.try_begin();
                return;
            }
        }
        if self.trigger_tx.try_send(reason.to_string()).is_err() {
            // Backlog already guarantees a re-read of current sensor state.
            debug!("trigger queue full, dropping request ({reason})");
        }
    }

    /// Run one gated cycle plus any coalesced follow-up. The gate
    /// bookkeeping sits outside the fallible cycle body so the scheduler
    /// can never wedge in the running state.
    async fn run_gated(&self, reason: &str) {
        if !self.gate.lock().unwrap().try_begin() {
            return;
        }

        let mut current = reason;
        loop {
            if let Err(err) = self.run_cycle(current).await {
                error!("tick cycle failed ({current}): {err:?}");
            }
            let follow_up = self.gate.lock().unwrap().finish();
            if !follow_up {
                break;
            }
            sleep(FOLLOW_UP_DELAY).await;
            self.gate.lock().unwrap().begin_follow_up();
            current = "queued";
        }
    }

    async fn run_cycle(&self, reason: &str) -> Result<()> {
        debug!("tick cycle start ({reason})");
        let now = Utc::now();

        let (snapshot, stats, page, cues) = {
            let sensors = self.sensors.lock().unwrap();
            let stats = sensors.tabs.snapshot(now);
            let snapshot = build_snapshot(&sensors.raw, stats, now);
            let cues = sensors
                .latest_cues
                .or_else(|| Some(sensors.cues.extract()));
            (snapshot, stats, sensors.page.clone(), cues)
        };

        let (session, config, manual_override) = {
            let view = self.view.lock().unwrap();
            (view.session.clone(), view.config.clone(), view.manual_override)
        };

        let label = classify(&snapshot, &config.sensitivity);
        let page = if config.allow_page_context { page } else { None };
        let cues = if config.allow_typed_cues { cues } else { None };

        let input = CycleInput {
            label,
            snapshot,
            stats,
            page_fingerprint: page_fingerprint(page.as_ref()),
            cue_fingerprint: cue_fingerprint(cues.as_ref()),
            page,
            cues,
            manual_override,
            options: PlayOptions {
                instrumental_only: config.instrumental_only,
                allow_lyric: config.allow_lyric_hook,
                duration_secs: config.default_duration_secs,
            },
            use_voice_coach: config.use_voice_coach,
            voice_muted: self.voice_muted.load(Ordering::Relaxed),
        };

        let outcome = self.dispatcher.dispatch(input, session).await;

        let mut view = self.view.lock().unwrap();
        view.session = outcome.session;
        view.status_line = outcome.status_line;
        Ok(())
    }

    async fn reload_config(&self) -> Result<()> {
        let config = self
            .config_store
            .load()
            .await
            .context("config reload failed")?;

        {
            let mut sensors = self.sensors.lock().unwrap();
            sensors.cues.set_opt_in(config.allow_typed_cues);
        }
        // The runtime manual override survives a config reload; only the
        // stored defaults are replaced.
        let mut view = self.view.lock().unwrap();
        view.config = config;
        info!("engine config reloaded");
        Ok(())
    }
}

async fn run_loop(
    inner: Arc<Inner>,
    mut triggers: mpsc::Receiver<String>,
    mut config_rx: watch::Receiver<u64>,
) {
    let mut ticker = interval(TICK_INTERVAL);
    // Ad-hoc triggers and long cycles must not shift the baseline phase.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = inner.cancel.cancelled() => {
                info!("engine loop shutting down (session {})", inner.session_id);
                break;
            }
            _ = ticker.tick() => {
                inner.run_gated("interval").await;
            }
            Some(reason) = triggers.recv() => {
                inner.run_gated(&reason).await;
            }
            changed = config_rx.changed() => {
                if changed.is_ok() {
                    if let Err(err) = inner.reload_config().await {
                        warn!("config reload failed: {err:?}");
                    }
                    inner.run_gated("config-change").await;
                } else {
                    // Config store gone; nothing left to watch.
                    inner.cancel.cancelled().await;
                    break;
                }
            }
        }
    }
}
