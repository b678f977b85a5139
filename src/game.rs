//! Game hooks called by the frame loop.
//!
//! The embedding application implements [`Game`]. Every hook runs
//! synchronously on the frame thread; a hook that blocks stalls the loop.
//! Returning an error from any hook is fatal: the loop reports it and stops.

use thiserror::Error;

use crate::components::sprite::SpriteId;
use crate::engine::EngineContext;
use crate::resources::group::SpriteGroup;
use crate::resources::rendertarget::Canvas;

/// Unrecoverable failure reported by a game hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HookError(pub String);

impl From<&str> for HookError {
    fn from(value: &str) -> Self {
        HookError(value.to_string())
    }
}

impl From<String> for HookError {
    fn from(value: String) -> Self {
        HookError(value)
    }
}

pub type HookResult = Result<(), HookError>;

pub trait Game {
    /// Called once before anything else.
    fn init(&mut self, _ctx: &mut EngineContext) -> HookResult {
        Ok(())
    }

    /// Called once after `init`, before the first frame. Create the initial
    /// sprites here.
    fn load(&mut self, ctx: &mut EngineContext) -> HookResult;

    /// Game logic, once per running frame, before collision detection.
    fn update(&mut self, ctx: &mut EngineContext) -> HookResult;

    /// Custom drawing, once per rendered frame, before the sprites.
    fn draw(&mut self, _ctx: &mut EngineContext, _canvas: &mut dyn Canvas) -> HookResult {
        Ok(())
    }

    /// A sprite was part of a collision last detected. Its
    /// [`offender`](crate::components::sprite::Sprite::offender) names the
    /// other sprite, which may already be gone from `group`.
    fn collision(&mut self, group: &mut SpriteGroup, sprite: SpriteId) -> HookResult;
}
