//! Loop state machine.
//!
//! ```text
//! Stopped ──start──▶ Running ⇄ Paused
//!                       │         │
//!                       └──stop───┴──▶ Stopped
//! ```
//!
//! [`LoopStatus`] holds the current state and counts pause entries. Only
//! real transitions count: pausing an already paused loop changes nothing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
    Paused,
}

#[derive(Debug, Clone, Default)]
pub struct LoopStatus {
    current: LoopState,
    pause_count: u32,
    /// Set once the loop was stopped after having run.
    finished: bool,
}

impl LoopStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> LoopState {
        self.current
    }

    pub fn pause_count(&self) -> u32 {
        self.pause_count
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Stopped → Running. Returns false if the loop already ran or runs.
    pub fn start(&mut self) -> bool {
        if self.current != LoopState::Stopped || self.finished {
            return false;
        }
        self.current = LoopState::Running;
        true
    }

    /// Running → Paused; bumps the pause counter.
    pub fn pause(&mut self) -> bool {
        if self.current != LoopState::Running {
            return false;
        }
        self.current = LoopState::Paused;
        self.pause_count += 1;
        true
    }

    /// Paused → Running.
    pub fn resume(&mut self) -> bool {
        if self.current != LoopState::Paused {
            return false;
        }
        self.current = LoopState::Running;
        true
    }

    /// Running/Paused → Stopped. Terminal.
    pub fn stop(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.current = LoopState::Stopped;
        self.finished = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_stopped() {
        let status = LoopStatus::new();
        assert_eq!(status.get(), LoopState::Stopped);
        assert_eq!(status.pause_count(), 0);
        assert!(!status.is_finished());
    }

    #[test]
    fn test_pause_counts_transitions_only() {
        let mut status = LoopStatus::new();
        assert!(status.start());
        assert!(status.pause());
        assert!(!status.pause());
        assert_eq!(status.pause_count(), 1);
        assert!(status.resume());
        assert!(!status.resume());
        assert!(status.pause());
        assert_eq!(status.pause_count(), 2);
    }

    #[test]
    fn test_pause_requires_running() {
        let mut status = LoopStatus::new();
        assert!(!status.pause());
        assert_eq!(status.pause_count(), 0);
    }

    #[test]
    fn test_stop_is_terminal() {
        let mut status = LoopStatus::new();
        status.start();
        status.pause();
        assert!(status.stop());
        assert_eq!(status.get(), LoopState::Stopped);
        assert!(!status.start());
        assert!(!status.resume());
        assert!(!status.stop());
    }
}
