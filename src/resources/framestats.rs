//! Per-run frame counters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    /// Frames that ran the update phase.
    pub frames: u64,
    /// Frames presented to the render target.
    pub frames_rendered: u64,
    /// Frames that skipped rendering because the target was not ready.
    pub frames_skipped: u64,
    /// Frames completed in the last full one-second window.
    pub frame_rate: u32,
    pub sprites_reaped: u64,
    pub collisions_notified: u64,
}

/// Summary handed back when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineReport {
    #[serde(flatten)]
    pub stats: FrameStats,
    pub pause_count: u32,
    pub sprites_remaining: usize,
}
