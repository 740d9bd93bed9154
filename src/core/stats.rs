//! # Live statistics and run state.

/// Point-in-time counters of a scheduler.
///
/// `queued` and `pending` are gauges; `completed` and `failed` only grow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Tasks waiting in the store.
    pub queued: usize,
    /// Tasks currently executing (each holds one concurrency slot).
    pub pending: usize,
    /// Tasks that finished successfully.
    pub completed: usize,
    /// Tasks that returned an error, rejected, or panicked.
    pub failed: usize,
}

impl Stats {
    /// Every task the scheduler has seen: queued, running or finished.
    #[inline]
    pub fn total(&self) -> usize {
        self.queued + self.pending + self.completed + self.failed
    }

    /// Tasks that finished either way.
    #[inline]
    pub fn completed_or_failed(&self) -> usize {
        self.completed + self.failed
    }
}

/// Observable lifecycle state.
///
/// ```text
/// Stopped ──start()──► RunningIdle ◄──── drained (emits Idle) ──── RunningActive
///    ▲                    │                                            │
///    │ stop()             └──────── enqueue ──────────────────────────►│
///    │                                                                 │ stop()
///    └──── drained (silent) ──── Draining ◄── pending > 0 ─────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Not running and nothing executing.
    Stopped,
    /// Running with nothing queued or executing.
    RunningIdle,
    /// Running with queued or executing work.
    RunningActive,
    /// Stopped while tasks are still executing.
    Draining,
}

impl RunState {
    pub(crate) fn from_parts(running: bool, queued: usize, pending: usize) -> Self {
        match (running, queued > 0 || pending > 0) {
            (true, false) => RunState::RunningIdle,
            (true, true) => RunState::RunningActive,
            (false, _) if pending > 0 => RunState::Draining,
            (false, _) => RunState::Stopped,
        }
    }
}
