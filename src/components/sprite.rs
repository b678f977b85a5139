//! The sprite: a drawable, possibly moving game object.
//!
//! A [`Sprite`] carries its transform (position, scale, rotation), visual
//! state (sprite-sheet frame, alpha), liveness and collision flags, and an
//! ordered list of [`Modifier`]s. Velocity is plain data: nothing moves a
//! sprite unless a modifier or game code does.
//!
//! Size is set once. Either the game sets it explicitly or the render
//! target reports the visual size at the first draw; after that, bounds
//! always use the cached value.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::components::bounds::Rect;
use crate::components::modifier::{Modifier, ModifierPolicy};
use crate::engine::EngineError;

/// Stable handle of a sprite inside a [`SpriteGroup`](crate::resources::group::SpriteGroup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(pub u64);

#[derive(Debug, Clone)]
pub struct Sprite {
    pub name: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub frame: i32,
    pub alpha: u8,
    pub scale: Vec2,
    /// Radians.
    pub rotation: f32,
    pub alive: bool,
    pub collidable: bool,
    /// Sprites sharing an identifier never collide with each other.
    pub identifier: i32,
    /// Frames per row in the sprite sheet.
    pub columns: u32,
    id: Option<SpriteId>,
    size: Option<(u32, u32)>,
    collided: bool,
    offender: Option<SpriteId>,
    modifiers: SmallVec<[Modifier; 4]>,
}

impl Default for Sprite {
    fn default() -> Self {
        Self::new()
    }
}

impl Sprite {
    pub fn new() -> Self {
        Sprite {
            name: String::new(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            frame: 0,
            alpha: 255,
            scale: Vec2::ONE,
            rotation: 0.0,
            alive: true,
            collidable: false,
            identifier: 0,
            columns: 1,
            id: None,
            size: None,
            collided: false,
            offender: None,
            modifiers: SmallVec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn with_columns(mut self, columns: u32) -> Self {
        self.columns = columns.max(1);
        self
    }

    pub fn with_collidable(mut self, collidable: bool) -> Self {
        self.collidable = collidable;
        self
    }

    pub fn with_identifier(mut self, identifier: i32) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Handle assigned when the sprite joined a group.
    pub fn id(&self) -> Option<SpriteId> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: SpriteId) {
        self.id = Some(id);
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    /// Set the size explicitly. Fails once a size is already established.
    pub fn set_size(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        if self.size.is_some() {
            return Err(EngineError::SizeAlreadySet {
                name: self.name.clone(),
            });
        }
        self.size = Some((width, height));
        Ok(())
    }

    /// Cache the size inferred from the rendered visual, if none is set yet.
    pub(crate) fn infer_size(&mut self, width: u32, height: u32) {
        if self.size.is_none() {
            self.size = Some((width, height));
        }
    }

    pub fn set_scale_uniform(&mut self, scale: f32) {
        self.scale = Vec2::splat(scale);
    }

    pub fn collided(&self) -> bool {
        self.collided
    }

    /// The other sprite of the last detected collision, until notified.
    pub fn offender(&self) -> Option<SpriteId> {
        self.offender
    }

    pub(crate) fn mark_collided(&mut self, offender: SpriteId) {
        self.collided = true;
        self.offender = Some(offender);
    }

    pub(crate) fn take_offender(&mut self) -> Option<SpriteId> {
        self.offender.take()
    }

    pub(crate) fn clear_collided(&mut self) {
        self.collided = false;
    }

    /// Unscaled bounds. Zero-sized until a size is known.
    pub fn bounds(&self) -> Rect {
        let (w, h) = self.size.unwrap_or((0, 0));
        Rect::from_position_size(self.position, Vec2::new(w as f32, h as f32))
    }

    /// Bounds with width and height multiplied by `scale`. The far edges
    /// are truncated toward zero, as the renderer snaps them.
    pub fn scaled_bounds(&self) -> Rect {
        let mut r = self.bounds();
        r.right = (r.left + r.width() * self.scale.x).trunc();
        r.bottom = (r.top + r.height() * self.scale.y).trunc();
        r
    }

    /// Source rectangle of the current frame in the sprite sheet, as
    /// `(u, v, width, height)` in pixels.
    pub fn frame_source_rect(&self) -> (u32, u32, u32, u32) {
        let (w, h) = self.size.unwrap_or((0, 0));
        let frame = self.frame.max(0) as u32;
        let columns = self.columns.max(1);
        ((frame % columns) * w, (frame / columns) * h, w, h)
    }

    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn modifiers_mut(&mut self) -> &mut [Modifier] {
        &mut self.modifiers
    }

    /// Run every modifier over this sprite's fields, in attachment order.
    ///
    /// Finished modifiers are dropped here, the first time they are seen
    /// inactive. What happens next depends on `policy`.
    pub fn animate(&mut self, policy: ModifierPolicy) {
        let mut i = 0;
        while i < self.modifiers.len() {
            if !self.modifiers[i].is_active() {
                self.modifiers.remove(i);
                match policy {
                    ModifierPolicy::StopOnInactive => return,
                    ModifierPolicy::SkipInactive => continue,
                }
            }

            let m = &mut self.modifiers[i];
            self.frame = m.adjust_frame(self.frame);
            self.alpha = m.adjust_alpha(self.alpha);
            self.rotation = m.adjust_rotation(self.rotation);
            self.scale = m.adjust_scale(self.scale);
            self.position = m.adjust_position(self.position);
            self.velocity = m.adjust_velocity(self.velocity);
            self.alive = m.adjust_alive(self.alive);
            i += 1;
        }
    }

    pub(crate) fn freeze_clocks(&mut self) {
        self.modifiers.iter_mut().for_each(Modifier::freeze_clock);
    }

    pub(crate) fn thaw_clocks(&mut self) {
        self.modifiers.iter_mut().for_each(Modifier::thaw_clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_defaults() {
        let s = Sprite::new();
        assert_eq!(s.alpha, 255);
        assert_eq!(s.scale, Vec2::ONE);
        assert_eq!(s.rotation, 0.0);
        assert!(s.alive);
        assert!(!s.collidable);
        assert!(!s.collided());
        assert!(s.offender().is_none());
        assert!(s.id().is_none());
        assert!(s.size().is_none());
    }

    #[test]
    fn test_size_is_set_once() {
        let mut s = Sprite::new().with_name("ship");
        assert!(s.set_size(16, 16).is_ok());
        assert!(matches!(
            s.set_size(32, 32),
            Err(EngineError::SizeAlreadySet { .. })
        ));
        s.infer_size(64, 64);
        assert_eq!(s.size(), Some((16, 16)));
    }

    #[test]
    fn test_infer_size_only_when_unknown() {
        let mut s = Sprite::new();
        s.infer_size(8, 4);
        assert_eq!(s.size(), Some((8, 4)));
        s.infer_size(100, 100);
        assert_eq!(s.size(), Some((8, 4)));
    }

    #[test]
    fn test_scaled_bounds_truncates_far_edges() {
        let mut s = Sprite::new().with_position(10.0, 20.0).with_size(10, 10);
        s.scale = Vec2::new(1.55, 0.5);
        let r = s.scaled_bounds();
        assert_eq!(r.left, 10.0);
        assert_eq!(r.top, 20.0);
        assert_eq!(r.right, 25.0);
        assert_eq!(r.bottom, 25.0);
    }

    #[test]
    fn test_unsized_sprite_has_empty_bounds() {
        let s = Sprite::new().with_position(5.0, 5.0);
        let r = s.scaled_bounds();
        assert_eq!(r.width(), 0.0);
        assert!(!r.intersects(&Rect::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_frame_source_rect() {
        let mut s = Sprite::new().with_size(32, 16).with_columns(4);
        s.frame = 6;
        assert_eq!(s.frame_source_rect(), (64, 16, 32, 16));
    }

    #[test]
    fn test_animate_applies_in_attachment_order() {
        let fence = Rect::new(0.0, 0.0, 50.0, 50.0);
        // launch first then fence: fence wins
        let mut a = Sprite::new()
            .with_position(48.0, 10.0)
            .with_modifier(Modifier::launch(0.0, 5.0, 0))
            .with_modifier(Modifier::fence(fence));
        a.animate(ModifierPolicy::StopOnInactive);
        assert_eq!(a.position.x, 50.0);

        // fence first then launch: launch escapes this frame
        let mut b = Sprite::new()
            .with_position(48.0, 10.0)
            .with_modifier(Modifier::fence(fence))
            .with_modifier(Modifier::launch(0.0, 5.0, 0));
        b.animate(ModifierPolicy::StopOnInactive);
        assert_eq!(b.position.x, 53.0);
    }

    #[test]
    fn test_finished_modifier_effect_applies_then_dropped_next_frame() {
        let mut s = Sprite::new().with_modifier(Modifier::alpha_fade(0, 255, -10));
        s.alpha = 5;
        s.animate(ModifierPolicy::StopOnInactive);
        assert_eq!(s.alpha, 0);
        assert_eq!(s.modifiers().len(), 1);
        assert!(!s.modifiers()[0].is_active());

        s.animate(ModifierPolicy::StopOnInactive);
        assert!(s.modifiers().is_empty());
    }

    #[test]
    fn test_stop_on_inactive_skips_remaining_modifiers_for_the_frame() {
        let mut s = Sprite::new()
            .with_modifier(Modifier::alpha_fade(0, 255, -10))
            .with_modifier(Modifier::frame_cycle(0, 9, 1));
        s.alpha = 5;
        s.animate(ModifierPolicy::StopOnInactive);
        assert_eq!(s.frame, 1);

        // fade is seen inactive: dropped, and the frame cycle waits a frame
        s.animate(ModifierPolicy::StopOnInactive);
        assert_eq!(s.frame, 1);
        assert_eq!(s.modifiers().len(), 1);

        s.animate(ModifierPolicy::StopOnInactive);
        assert_eq!(s.frame, 2);
    }

    #[test]
    fn test_skip_inactive_keeps_applying_remaining_modifiers() {
        let mut s = Sprite::new()
            .with_modifier(Modifier::alpha_fade(0, 255, -10))
            .with_modifier(Modifier::frame_cycle(0, 9, 1));
        s.alpha = 5;
        s.animate(ModifierPolicy::SkipInactive);
        assert_eq!(s.frame, 1);

        s.animate(ModifierPolicy::SkipInactive);
        assert_eq!(s.frame, 2);
        assert_eq!(s.modifiers().len(), 1);
    }

    #[test]
    fn test_manually_deactivated_modifier_is_dropped() {
        let mut s = Sprite::new()
            .with_modifier(Modifier::frame_cycle(0, 3, 1))
            .with_modifier(Modifier::throb_repeating(1.0, 2.0, 0.1));
        s.modifiers_mut()[1].deactivate();
        s.animate(ModifierPolicy::SkipInactive);
        assert_eq!(s.modifiers().len(), 1);
        assert_eq!(s.scale, Vec2::ONE);
    }

    #[test]
    fn test_expired_launch_kills_sprite() {
        let mut s = Sprite::new().with_modifier(Modifier::launch(0.0, 1.0, 1));
        std::thread::sleep(std::time::Duration::from_millis(5));
        s.animate(ModifierPolicy::StopOnInactive);
        assert!(!s.alive);
        assert_eq!(s.position.x, 1.0);
    }
}
