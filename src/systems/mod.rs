//! Per-frame passes over the sprite group.
//!
//! Submodules overview
//! - [`collision`] – all-pairs overlap detection, first match wins
//! - [`reap`] – remove dead sprites and deliver collision notifications
//!
//! Sprite animation itself lives on [`Sprite::animate`](crate::components::sprite::Sprite::animate)
//! because it runs interleaved with drawing.

pub mod collision;
pub mod reap;
