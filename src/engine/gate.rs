/// Single-flight tick arbitration.
///
/// Two flags, three states: Idle (`running=false`), Running
/// (`running=true, queued=false`), RunningWithPending (both true).
/// Overlapping trigger requests while a cycle is in flight collapse into
/// a single queued follow-up; no per-trigger payload is kept because a
/// cycle always re-reads current sensor state.
#[derive(Debug, Default)]
pub struct TickGate {
    running: bool,
    queued: bool,
}

impl TickGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to start a cycle. Returns false (and marks a follow-up as
    /// queued) when one is already in flight.
    pub fn try_begin(&mut self) -> bool {
        if self.running {
            self.queued = true;
            false
        } else {
            self.running = true;
            true
        }
    }

    /// Re-enter the running state for a coalesced follow-up cycle.
    pub fn begin_follow_up(&mut self) {
        self.running = true;
    }

    /// End the current cycle. Returns true when exactly one follow-up
    /// cycle must be scheduled.
    pub fn finish(&mut self) -> bool {
        self.running = false;
        std::mem::take(&mut self.queued)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
