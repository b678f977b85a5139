//! Touch/pointer samples delivered by the host.
//!
//! The host pushes samples with [`ControlCmd::Touch`](crate::events::control::ControlCmd::Touch);
//! the loop stores at most [`MAX_TOUCH_POINTS`] of them. The sample count
//! resets at every frame-rate window, so a game sees touches for at most
//! about a second after the last sample. Game logic reads this resource;
//! the core never does.

use arrayvec::ArrayVec;
use glam::Vec2;

pub const MAX_TOUCH_POINTS: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct InputState {
    points: ArrayVec<Vec2, MAX_TOUCH_POINTS>,
}

impl InputState {
    /// Replace the stored samples. Points beyond the limit are dropped.
    pub fn set_touches(&mut self, samples: &[Vec2]) {
        self.points.clear();
        self.points
            .extend(samples.iter().copied().take(MAX_TOUCH_POINTS));
    }

    pub fn touch_count(&self) -> usize {
        self.points.len()
    }

    /// Sample at `index`, clamped to the last valid sample.
    pub fn touch_point(&self, index: usize) -> Option<Vec2> {
        let last = self.points.len().checked_sub(1)?;
        self.points.get(index.min(last)).copied()
    }

    pub fn touches(&self) -> &[Vec2] {
        &self.points
    }

    pub fn reset(&mut self) {
        self.points.clear();
    }
}
