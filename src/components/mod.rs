//! Per-sprite data.
//!
//! Submodules overview:
//! - [`bounds`] – axis-aligned rectangle used for collision and fences
//! - [`modifier`] – stateful per-frame transforms attached to a sprite
//! - [`sprite`] – the sprite itself: transform, visual state, flags, modifiers

pub mod bounds;
pub mod modifier;
pub mod sprite;
