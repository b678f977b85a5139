//! Spriteloop engine library.
//!
//! A small real-time 2D frame loop: a flat group of sprites, all-pairs
//! collision detection with at-most-one partner per sprite per frame, and a
//! pipeline of per-sprite modifiers (frame cycling, fades, pulses, fences,
//! wrap-around and launched motion) applied right before each sprite is
//! drawn.
//!
//! Windowing, drawing and input capture stay outside: the engine talks to a
//! [`RenderTarget`](resources::rendertarget::RenderTarget), calls back into a
//! [`Game`](game::Game), and takes pause/resume/stop and touch samples from
//! the host through an [`EngineHandle`](engine::EngineHandle).

pub mod components;
pub mod engine;
pub mod events;
pub mod game;
pub mod resources;
pub mod scene;
pub mod systems;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::components::bounds::Rect;
    pub use crate::components::modifier::{Modifier, ModifierPolicy};
    pub use crate::components::sprite::{Sprite, SpriteId};
    pub use crate::engine::{
        Engine, EngineContext, EngineController, EngineError, EngineHandle, EngineReport,
    };
    pub use crate::events::control::{ControlCmd, EngineMessage};
    pub use crate::game::{Game, HookError, HookResult};
    pub use crate::resources::gameconfig::EngineConfig;
    pub use crate::resources::gamestate::LoopState;
    pub use crate::resources::group::SpriteGroup;
    pub use crate::resources::rendertarget::{Canvas, HeadlessTarget, RenderTarget};
    pub use glam::Vec2;
}
