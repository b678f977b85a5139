//! Messages exchanged between the host and the frame thread.
//!
//! The host sends [`ControlCmd`]s through an
//! [`EngineHandle`](crate::engine::EngineHandle); the loop drains them at the
//! top of every iteration, so a command never interrupts a phase that is
//! already running. The loop reports back with [`EngineMessage`]s.

use glam::Vec2;

use crate::engine::EngineReport;
use crate::resources::gamestate::LoopState;

/// Commands sent *to* the frame thread.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCmd {
    Pause,
    Resume,
    Stop,
    /// A fresh set of touch/pointer samples. Only the first few are kept.
    Touch(Vec<Vec2>),
}

/// Messages sent *back* from the frame thread.
#[derive(Debug, Clone)]
pub enum EngineMessage {
    StateChanged(LoopState),
    FrameRate(u32),
    Fatal(String),
    Stopped(EngineReport),
}
