//! Per-frame behaviour modifiers attached to a [`Sprite`](super::sprite::Sprite).
//!
//! A [`Modifier`] is a small stateful transform. Every frame the owning
//! sprite threads its fields through each active modifier in attachment
//! order, always in the same field order:
//!
//! frame → alpha → rotation → scale → position → velocity → alive
//!
//! A modifier only overrides the hooks that matter to its kind; every other
//! hook returns its input unchanged. When a modifier decides it is finished
//! it clears its `active` flag. The sprite drops it the next time it
//! animates (see [`ModifierPolicy`]), so the final effect is still visible in
//! the frame the modifier finished.
//!
//! Kinds:
//! - [`FrameCycle`] – steps the sprite-sheet frame and wraps
//! - [`AlphaFade`] – fades alpha until a bound is hit
//! - [`Throb`] – pulses scale between two values
//! - [`Fence`] – keeps the position inside a rectangle
//! - [`Warp`] – moves at a fixed velocity and wraps around a rectangle
//! - [`Launch`] – moves along a launch angle, optionally with a lifetime

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::bounds::Rect;
use crate::resources::clock::Clock;

/// What a sprite does when it meets a finished modifier while animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModifierPolicy {
    /// Drop the finished modifier and stop animating this sprite for the
    /// rest of the frame. Modifiers after it run again next frame.
    #[default]
    StopOnInactive,
    /// Drop every finished modifier and keep applying the remaining ones.
    SkipInactive,
}

impl ModifierPolicy {
    /// Parse the config file spelling (`stop` / `skip`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stop" | "stop_on_inactive" => Some(ModifierPolicy::StopOnInactive),
            "skip" | "skip_inactive" => Some(ModifierPolicy::SkipInactive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierPolicy::StopOnInactive => "stop",
            ModifierPolicy::SkipInactive => "skip",
        }
    }
}

/// Cycles an integer frame index by a signed step.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameCycle {
    pub first: i32,
    pub last: i32,
    pub step: i32,
}

impl FrameCycle {
    fn next(&self, frame: i32) -> i32 {
        let next = frame + self.step;
        if next < self.first {
            self.last
        } else if next > self.last {
            self.first
        } else {
            next
        }
    }
}

/// Adds `change` to alpha every frame; finishes when clamped to a bound.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaFade {
    pub min: i32,
    pub max: i32,
    pub change: i32,
}

impl AlphaFade {
    /// Returns the new alpha and whether a bound was hit.
    fn next(&self, alpha: u8) -> (u8, bool) {
        let mut value = alpha as i32 + self.change;
        let mut finished = false;
        if value < self.min {
            value = self.min;
            finished = true;
        }
        if value > self.max {
            value = self.max;
            finished = true;
        }
        (value.clamp(0, 255) as u8, finished)
    }
}

/// Scale pulse between `start` and `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct Throb {
    pub start: f32,
    pub end: f32,
    pub speed: f32,
    pub repeat: bool,
    started: bool,
}

impl Throb {
    /// Returns the new scale and whether the pulse is over.
    fn next(&mut self, scale: Vec2) -> (Vec2, bool) {
        let mut s = scale;
        if !self.started {
            s = Vec2::splat(self.start);
            self.started = true;
        }
        s += Vec2::splat(self.speed);

        let mut finished = false;
        if s.x >= self.end {
            self.speed = -self.speed;
        } else if s.x <= self.start {
            if self.repeat {
                self.speed = -self.speed;
            } else {
                finished = true;
            }
        }
        (s, finished)
    }
}

/// Clamps position into a fixed rectangle. Velocity is left alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Fence {
    pub region: Rect,
}

/// Fixed-velocity motion with toroidal wrap around `bounds`.
#[derive(Debug, Clone, PartialEq)]
pub struct Warp {
    pub bounds: Rect,
    pub size: Vec2,
    pub velocity: Vec2,
}

impl Warp {
    fn next(&self, position: Vec2) -> Vec2 {
        let p = position + self.velocity;
        Vec2::new(
            wrap_axis(p.x, self.bounds.left, self.bounds.right, self.size.x),
            wrap_axis(p.y, self.bounds.top, self.bounds.bottom, self.size.y),
        )
    }
}

/// Wrap one axis. Leaving past `far - size` re-enters from `near` keeping
/// the overshoot measured against the full span; leaving before `near`
/// re-enters from the far side.
fn wrap_axis(value: f32, near: f32, far: f32, size: f32) -> f32 {
    let span = far - near;
    let far_limit = far - size;
    if value < near {
        (value + span).min(far_limit)
    } else if value > far_limit {
        (value - span).max(near)
    } else {
        value
    }
}

/// Motion along a launch angle at a fixed speed.
///
/// The per-frame displacement is computed once. With a positive lifetime the
/// sprite is flagged dead once that many active milliseconds have passed
/// since the modifier was built.
#[derive(Debug, Clone)]
pub struct Launch {
    velocity: Vec2,
    lifetime_ms: u64,
    clock: Clock,
}

impl Launch {
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn lifetime_ms(&self) -> u64 {
        self.lifetime_ms
    }

    fn expired(&mut self) -> bool {
        self.lifetime_ms > 0 && self.clock.interval_elapsed(self.lifetime_ms)
    }
}

/// The closed set of modifier kinds.
#[derive(Debug, Clone)]
pub enum ModifierKind {
    FrameCycle(FrameCycle),
    AlphaFade(AlphaFade),
    Throb(Throb),
    Fence(Fence),
    Warp(Warp),
    Launch(Launch),
}

#[derive(Debug, Clone)]
pub struct Modifier {
    kind: ModifierKind,
    active: bool,
}

impl Modifier {
    fn from_kind(kind: ModifierKind) -> Self {
        Modifier { kind, active: true }
    }

    pub fn frame_cycle(first: i32, last: i32, step: i32) -> Self {
        Self::from_kind(ModifierKind::FrameCycle(FrameCycle { first, last, step }))
    }

    pub fn alpha_fade(min: i32, max: i32, change: i32) -> Self {
        Self::from_kind(ModifierKind::AlphaFade(AlphaFade { min, max, change }))
    }

    /// Scale pulse that finishes when it returns to `start`.
    pub fn throb(start: f32, end: f32, speed: f32) -> Self {
        Self::from_kind(ModifierKind::Throb(Throb {
            start,
            end,
            speed,
            repeat: false,
            started: false,
        }))
    }

    /// Scale pulse that never finishes.
    pub fn throb_repeating(start: f32, end: f32, speed: f32) -> Self {
        Self::from_kind(ModifierKind::Throb(Throb {
            start,
            end,
            speed,
            repeat: true,
            started: false,
        }))
    }

    pub fn fence(region: Rect) -> Self {
        Self::from_kind(ModifierKind::Fence(Fence { region }))
    }

    pub fn warp(bounds: Rect, size: Vec2, velocity: Vec2) -> Self {
        Self::from_kind(ModifierKind::Warp(Warp {
            bounds,
            size,
            velocity,
        }))
    }

    /// Launch at `angle_degrees` with `speed` units per frame. A
    /// `lifetime_ms` of zero means the sprite never expires.
    pub fn launch(angle_degrees: f64, speed: f32, lifetime_ms: u64) -> Self {
        let radians = angle_degrees.to_radians();
        let velocity = Vec2::new(
            (radians.cos() * speed as f64) as f32,
            (radians.sin() * speed as f64) as f32,
        );
        Self::from_kind(ModifierKind::Launch(Launch {
            velocity,
            lifetime_ms,
            clock: Clock::new(),
        }))
    }

    pub fn kind(&self) -> &ModifierKind {
        &self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark the modifier finished; the owning sprite drops it lazily.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn adjust_frame(&mut self, frame: i32) -> i32 {
        match &self.kind {
            ModifierKind::FrameCycle(cycle) => cycle.next(frame),
            _ => frame,
        }
    }

    pub fn adjust_alpha(&mut self, alpha: u8) -> u8 {
        match &self.kind {
            ModifierKind::AlphaFade(fade) => {
                let (value, finished) = fade.next(alpha);
                if finished {
                    self.active = false;
                }
                value
            }
            _ => alpha,
        }
    }

    pub fn adjust_rotation(&mut self, rotation: f32) -> f32 {
        rotation
    }

    pub fn adjust_scale(&mut self, scale: Vec2) -> Vec2 {
        match &mut self.kind {
            ModifierKind::Throb(throb) => {
                let (value, finished) = throb.next(scale);
                if finished {
                    self.active = false;
                }
                value
            }
            _ => scale,
        }
    }

    pub fn adjust_position(&mut self, position: Vec2) -> Vec2 {
        match &self.kind {
            ModifierKind::Fence(fence) => fence.region.clamp(position),
            ModifierKind::Warp(warp) => warp.next(position),
            ModifierKind::Launch(launch) => position + launch.velocity,
            _ => position,
        }
    }

    pub fn adjust_velocity(&mut self, velocity: Vec2) -> Vec2 {
        velocity
    }

    pub fn adjust_alive(&mut self, alive: bool) -> bool {
        if let ModifierKind::Launch(launch) = &mut self.kind {
            if launch.expired() {
                return false;
            }
        }
        alive
    }

    pub(crate) fn freeze_clock(&mut self) {
        if let ModifierKind::Launch(launch) = &mut self.kind {
            launch.clock.freeze();
        }
    }

    pub(crate) fn thaw_clock(&mut self) {
        if let ModifierKind::Launch(launch) = &mut self.kind {
            launch.clock.thaw();
        }
    }
}
