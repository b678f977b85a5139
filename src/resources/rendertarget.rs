//! Rendering collaborator interface.
//!
//! The core never draws pixels itself. Each frame the loop asks the
//! [`RenderTarget`] whether it is ready, opens a frame, hands the open
//! frame to the game's draw hook and to every live sprite as a [`Canvas`],
//! then closes the frame. A target that is not ready, or that fails to
//! open a frame, makes the loop skip rendering for that frame only.
//!
//! [`HeadlessTarget`] is a recording implementation with no window, used by
//! the demo binary and by tests.

use glam::Vec2;

use crate::components::sprite::{Sprite, SpriteId};

/// Drawing surface of one open frame.
pub trait Canvas {
    /// Draw a sprite with its current frame, alpha, scale, rotation and
    /// position.
    fn draw_sprite(&mut self, sprite: &Sprite);

    fn draw_text(&mut self, text: &str, x: f32, y: f32);

    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Size of the sprite's visual, when known. Used once to establish the
    /// size of sprites that were not given one.
    fn visual_size(&self, _sprite: &Sprite) -> Option<(u32, u32)> {
        None
    }
}

pub trait RenderTarget: Canvas {
    fn is_ready(&self) -> bool;

    /// Lock the surface for drawing. Returns false if it could not be
    /// locked; the frame is then skipped.
    fn begin_frame(&mut self) -> bool;

    /// Present the frame opened by `begin_frame`.
    fn end_frame(&mut self);
}

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Sprite {
        id: Option<SpriteId>,
        frame: i32,
        alpha: u8,
        position: Vec2,
        scale: Vec2,
        rotation: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
    },
}

/// Windowless render target that records what would have been drawn.
#[derive(Debug, Clone)]
pub struct HeadlessTarget {
    pub width: u32,
    pub height: u32,
    pub ready: bool,
    /// Size reported for sprites without one.
    pub default_visual: Option<(u32, u32)>,
    frame_open: bool,
    frames_presented: u64,
    current: Vec<DrawCall>,
    last_frame: Vec<DrawCall>,
}

impl HeadlessTarget {
    pub fn new(width: u32, height: u32) -> Self {
        HeadlessTarget {
            width,
            height,
            ready: true,
            default_visual: None,
            frame_open: false,
            frames_presented: 0,
            current: Vec::new(),
            last_frame: Vec::new(),
        }
    }

    pub fn with_default_visual(mut self, width: u32, height: u32) -> Self {
        self.default_visual = Some((width, height));
        self
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Draw calls of the most recently presented frame.
    pub fn last_frame(&self) -> &[DrawCall] {
        &self.last_frame
    }

    pub fn last_frame_texts(&self) -> Vec<&str> {
        self.last_frame
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for HeadlessTarget {
    fn draw_sprite(&mut self, sprite: &Sprite) {
        if !self.frame_open {
            log::warn!("draw_sprite outside of an open frame");
            return;
        }
        self.current.push(DrawCall::Sprite {
            id: sprite.id(),
            frame: sprite.frame,
            alpha: sprite.alpha,
            position: sprite.position,
            scale: sprite.scale,
            rotation: sprite.rotation,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        if !self.frame_open {
            log::warn!("draw_text outside of an open frame");
            return;
        }
        self.current.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn visual_size(&self, _sprite: &Sprite) -> Option<(u32, u32)> {
        self.default_visual
    }
}

impl RenderTarget for HeadlessTarget {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn begin_frame(&mut self) -> bool {
        if !self.ready {
            return false;
        }
        self.frame_open = true;
        self.current.clear();
        true
    }

    fn end_frame(&mut self) {
        if !self.frame_open {
            return;
        }
        self.frame_open = false;
        self.frames_presented += 1;
        std::mem::swap(&mut self.current, &mut self.last_frame);
        self.current.clear();
    }
}
