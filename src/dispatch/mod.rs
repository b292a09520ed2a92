//! Signature-gated side-effect dispatch.
//!
//! One dispatch per cycle: decides whether the externally visible audio
//! session must refresh, emits label-change effects (status message,
//! voice announcement, coach), and always refreshes the lightweight
//! status line. Adapter failures are caught here and never reach the
//! scheduler.

pub mod messages;
pub mod prompt;

use log::{info, warn};

use crate::adapters::{Adapters, MusicContext, PlayOptions};
use crate::config::ManualOverride;
use crate::context::{Fingerprint, PageContext, TextCues};
use crate::engine::state::{Label, Mode, SessionState};
use crate::signals::{SignalSnapshot, TabStats};

/// Everything one cycle computed before dispatch. Fingerprints here were
/// taken before any mutation this cycle performs.
#[derive(Debug, Clone)]
pub struct CycleInput {
    pub label: Label,
    pub snapshot: SignalSnapshot,
    pub stats: TabStats,
    pub page: Option<PageContext>,
    pub cues: Option<TextCues>,
    pub page_fingerprint: Fingerprint,
    pub cue_fingerprint: Fingerprint,
    pub manual_override: ManualOverride,
    pub options: PlayOptions,
    pub use_voice_coach: bool,
    pub voice_muted: bool,
}

#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub session: SessionState,
    pub status_line: String,
}

pub struct Dispatcher {
    adapters: Adapters,
}

impl Dispatcher {
    pub fn new(adapters: Adapters) -> Self {
        Self { adapters }
    }

    pub async fn pause(&self) {
        self.adapters.music.pause().await;
    }

    /// Out-of-cycle coaching nudge, used by the tab-burst listener.
    pub fn nudge_focus(&self) {
        self.adapters.coach.nudge_focus();
    }

    /// Run one cycle's side effects against a copy of the session state
    /// and return the updated copy. The caller writes it back atomically.
    pub async fn dispatch(&self, input: CycleInput, mut session: SessionState) -> CycleOutcome {
        let changed = input.label != session.label;

        if changed {
            info!("attention label changed: {} -> {}", session.label, input.label);
            session.label = input.label;

            let message =
                messages::compose_message(input.label, input.page.as_ref(), input.cues.as_ref());
            session.last_status_message = message.clone();

            if !input.voice_muted {
                let voice = self.adapters.voice.clone();
                tokio::spawn(async move {
                    if let Err(err) = voice.speak(message).await {
                        warn!("voice announcement failed: {err:?}");
                    }
                });
            }

            if input.use_voice_coach && !input.voice_muted {
                match input.label {
                    Label::Focused => self.adapters.coach.celebrate_flow(),
                    Label::Distracted => self.adapters.coach.nudge_focus(),
                    _ => {}
                }
            }
        }

        let mode = self.effective_mode(&input, session.label);
        let mode_changed = session.last_mode != Some(mode);

        let should_refresh = !session.is_playing
            || changed
            || mode_changed
            || input.page_fingerprint != session.last_page_fingerprint
            || input.cue_fingerprint != session.last_cue_fingerprint;

        if should_refresh {
            let context = MusicContext {
                label: session.label,
                signals: input.snapshot,
                page: input.page.clone(),
                cues: input.cues,
                options: input.options,
                prompt: prompt::fuse_prompt(
                    session.label,
                    input.page.as_ref(),
                    input.cues.as_ref(),
                    &input.options,
                ),
            };

            match self.adapters.music.play(mode, context).await {
                Ok(()) => {
                    session.is_playing = true;
                    session.last_mode = Some(mode);
                    session.last_page_fingerprint = input.page_fingerprint;
                    session.last_cue_fingerprint = input.cue_fingerprint;
                }
                Err(err) => {
                    // Leave fingerprints alone so the next cycle retries.
                    warn!("music refresh failed ({mode}): {err:?}");
                    session.is_playing = false;
                }
            }
        }

        let status_line = messages::format_status_line(
            session.label,
            &input.stats,
            input.page.as_ref(),
            &session.last_status_message,
        );
        self.adapters.status.update_status(&status_line);

        CycleOutcome {
            session,
            status_line,
        }
    }

    fn effective_mode(&self, input: &CycleInput, label: Label) -> Mode {
        if input.manual_override.active {
            input.manual_override.mode.unwrap_or_else(|| label.mode())
        } else {
            label.mode()
        }
    }
}
