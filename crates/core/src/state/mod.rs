use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

/// Lifecycle of a sort run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    StopRequested,
}

impl RunPhase {
    fn to_raw(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::StopRequested => 2,
        }
    }

    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Running,
            2 => Self::StopRequested,
            _ => Self::Idle,
        }
    }
}

/// Shared run flag. All transitions are compare-and-swap so that only one
/// run can ever be active.
#[derive(Debug, Clone)]
pub struct RunState {
    phase: Arc<AtomicU8>,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    /// Starts Idle.
    pub fn new() -> Self {
        Self {
            phase: Arc::new(AtomicU8::new(RunPhase::Idle.to_raw())),
        }
    }

    /// Current phase. Another thread may change it right after the read.
    pub fn phase(&self) -> RunPhase {
        RunPhase::from_raw(self.phase.load(Ordering::Acquire))
    }

    pub fn is_idle(&self) -> bool {
        self.phase() == RunPhase::Idle
    }

    pub fn stop_requested(&self) -> bool {
        self.phase() == RunPhase::StopRequested
    }

    /// Idle -> Running. Returns `false` when a run is already active.
    pub fn try_begin(&self) -> bool {
        self.transition(RunPhase::Idle, RunPhase::Running)
    }

    /// Running -> StopRequested. A no-op in every other phase.
    pub fn request_stop(&self) -> bool {
        self.transition(RunPhase::Running, RunPhase::StopRequested)
    }

    /// Back to Idle once the routine has returned.
    pub fn finish(&self) {
        self.phase.store(RunPhase::Idle.to_raw(), Ordering::Release);
    }

    fn transition(&self, from: RunPhase, to: RunPhase) -> bool {
        self.phase
            .compare_exchange(from.to_raw(), to.to_raw(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_lifecycle() {
        let state = RunState::new();
        assert_eq!(state.phase(), RunPhase::Idle);

        assert!(state.try_begin());
        assert!(!state.try_begin());
        assert_eq!(state.phase(), RunPhase::Running);

        assert!(state.request_stop());
        assert!(state.stop_requested());
        assert!(!state.try_begin());

        state.finish();
        assert!(state.is_idle());
    }

    #[test]
    fn stop_is_idempotent_and_ignored_when_idle() {
        let state = RunState::new();
        assert!(!state.request_stop());
        assert!(state.is_idle());

        state.try_begin();
        assert!(state.request_stop());
        assert!(!state.request_stop());
        assert_eq!(state.phase(), RunPhase::StopRequested);
    }

    #[test]
    fn clones_share_the_flag() {
        let state = RunState::new();
        let remote = state.clone();
        state.try_begin();
        remote.request_stop();
        assert!(state.stop_requested());
    }
}
