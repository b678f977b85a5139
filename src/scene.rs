//! Demo scene: a headless asteroid field.
//!
//! - Rocks drift with [`Modifier::warp`] and wrap around the field. They
//!   share an identifier, so rocks never hit each other.
//! - The ship sits in the middle, kept on the field by a fence, and fires
//!   bullets with [`Modifier::launch`] and a lifetime. Bullets share the
//!   ship's identifier: they never hit the ship or each other.
//! - A bullet hitting a rock kills both and leaves fading, pulsing debris.
//! - A rock hitting the ship costs a life and breaks the rock, so one rock
//!   costs at most one life. At zero lives the game quits.
//!
//! The latest touch sample, if any, is where the ship aims.

use glam::Vec2;
use log::{debug, info};

use crate::components::bounds::Rect;
use crate::components::modifier::Modifier;
use crate::components::sprite::{Sprite, SpriteId};
use crate::engine::EngineContext;
use crate::game::{Game, HookResult};
use crate::resources::group::SpriteGroup;
use crate::resources::rendertarget::Canvas;

const SHIP_ID: i32 = 1;
const ROCK_ID: i32 = 2;
const DEBRIS_ID: i32 = 3;

const SHIP: &str = "ship";
const ROCK: &str = "rock";
const BULLET: &str = "bullet";
const DEBRIS: &str = "debris";

const ROCK_SIZE: u32 = 24;
const SHIP_SIZE: u32 = 32;
const BULLET_SIZE: u32 = 4;
const BULLET_SPEED: f32 = 6.0;
const BULLET_LIFETIME_MS: u64 = 800;

#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub width: f32,
    pub height: f32,
    pub rocks: usize,
    pub lives: u32,
    /// Frames between two shots.
    pub fire_every: u64,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            width: 640.0,
            height: 360.0,
            rocks: 8,
            lives: 3,
            fire_every: 10,
            seed: 7,
        }
    }
}

#[derive(Debug)]
pub struct AsteroidsScene {
    config: SceneConfig,
    rng: fastrand::Rng,
    ship: Option<SpriteId>,
    aim_degrees: f64,
    score: u32,
    lives: u32,
    frames: u64,
}

impl AsteroidsScene {
    pub fn new(config: SceneConfig) -> Self {
        let rng = fastrand::Rng::with_seed(config.seed);
        let lives = config.lives;
        AsteroidsScene {
            config,
            rng,
            ship: None,
            aim_degrees: 0.0,
            score: 0,
            lives,
            frames: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    fn field(&self) -> Rect {
        Rect::new(0.0, 0.0, self.config.width, self.config.height)
    }

    fn spawn_rock(&mut self, group: &mut SpriteGroup) -> SpriteId {
        let size = Vec2::splat(ROCK_SIZE as f32);
        let x = self.rng.f32() * (self.config.width - size.x);
        let y = self.rng.f32() * (self.config.height - size.y);
        let velocity = Vec2::new(self.rng.f32() * 4.0 - 2.0, self.rng.f32() * 4.0 - 2.0);
        group.add(
            Sprite::new()
                .with_name(ROCK)
                .with_position(x, y)
                .with_size(ROCK_SIZE, ROCK_SIZE)
                .with_columns(4)
                .with_collidable(true)
                .with_identifier(ROCK_ID)
                .with_modifier(Modifier::warp(self.field(), size, velocity))
                .with_modifier(Modifier::frame_cycle(0, 7, 1)),
        )
    }

    fn fire(&mut self, group: &mut SpriteGroup) {
        let Some(origin) = self.ship.and_then(|id| group.get(id)).map(|s| s.position) else {
            return;
        };
        let center = origin + Vec2::splat((SHIP_SIZE / 2) as f32);
        group.add(
            Sprite::new()
                .with_name(BULLET)
                .with_position(center.x, center.y)
                .with_size(BULLET_SIZE, BULLET_SIZE)
                .with_collidable(true)
                .with_identifier(SHIP_ID)
                .with_modifier(Modifier::launch(
                    self.aim_degrees,
                    BULLET_SPEED,
                    BULLET_LIFETIME_MS,
                )),
        );
    }

    fn spawn_debris(group: &mut SpriteGroup, at: Vec2) {
        group.add(
            Sprite::new()
                .with_name(DEBRIS)
                .with_position(at.x, at.y)
                .with_size(ROCK_SIZE, ROCK_SIZE)
                .with_identifier(DEBRIS_ID)
                .with_modifier(Modifier::alpha_fade(0, 255, -15))
                .with_modifier(Modifier::throb(1.0, 1.6, 0.1)),
        );
    }
}

impl Game for AsteroidsScene {
    fn init(&mut self, _ctx: &mut EngineContext) -> HookResult {
        info!(
            "Asteroids scene: {}x{}, {} rocks",
            self.config.width, self.config.height, self.config.rocks
        );
        if self.config.width <= ROCK_SIZE as f32 || self.config.height <= ROCK_SIZE as f32 {
            return Err("field is smaller than a rock".into());
        }
        Ok(())
    }

    fn load(&mut self, ctx: &mut EngineContext) -> HookResult {
        let center = Vec2::new(self.config.width, self.config.height) / 2.0;
        let fence = Rect::new(
            0.0,
            0.0,
            self.config.width - SHIP_SIZE as f32,
            self.config.height - SHIP_SIZE as f32,
        );
        self.ship = Some(
            ctx.group.add(
                Sprite::new()
                    .with_name(SHIP)
                    .with_position(center.x, center.y)
                    .with_size(SHIP_SIZE, SHIP_SIZE)
                    .with_columns(4)
                    .with_collidable(true)
                    .with_identifier(SHIP_ID)
                    .with_modifier(Modifier::fence(fence))
                    .with_modifier(Modifier::frame_cycle(0, 3, 1)),
            ),
        );
        for _ in 0..self.config.rocks {
            self.spawn_rock(&mut ctx.group);
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext) -> HookResult {
        self.frames += 1;

        if self.lives == 0 {
            info!("Game over, score {}", self.score);
            ctx.quit();
            return Ok(());
        }

        if let (Some(target), Some(ship)) = (
            ctx.input.touch_point(0),
            self.ship.and_then(|id| ctx.group.get(id)),
        ) {
            let d = target - ship.position;
            self.aim_degrees = f64::from(d.y.atan2(d.x)).to_degrees();
        } else {
            self.aim_degrees = (self.aim_degrees + 12.0) % 360.0;
        }

        if self.config.fire_every > 0 && self.frames % self.config.fire_every == 0 {
            self.fire(&mut ctx.group);
        }

        // finished fades leave invisible debris behind
        for sprite in ctx.group.iter_mut() {
            if sprite.name == DEBRIS && sprite.alpha == 0 {
                sprite.alive = false;
            }
        }
        Ok(())
    }

    fn draw(&mut self, _ctx: &mut EngineContext, canvas: &mut dyn Canvas) -> HookResult {
        canvas.draw_text(
            &format!("Score: {}  Lives: {}", self.score, self.lives),
            10.0,
            20.0,
        );
        Ok(())
    }

    fn collision(&mut self, group: &mut SpriteGroup, sprite: SpriteId) -> HookResult {
        let Some(me) = group.get(sprite) else {
            return Ok(());
        };
        let mine = me.name.clone();
        let at = me.position;
        let offender = me.offender();
        let theirs = offender
            .and_then(|id| group.get(id))
            .map(|s| s.name.clone());

        match (mine.as_str(), theirs.as_deref()) {
            (ROCK, Some(BULLET)) => {
                self.score += 1;
                debug!("rock {:?} destroyed, score {}", sprite, self.score);
                if let Some(s) = group.get_mut(sprite) {
                    s.alive = false;
                }
                Self::spawn_debris(group, at);
                self.spawn_rock(group);
            }
            (BULLET, Some(ROCK)) => {
                if let Some(s) = group.get_mut(sprite) {
                    s.alive = false;
                }
            }
            (SHIP, Some(ROCK)) => {
                self.lives = self.lives.saturating_sub(1);
                info!("Ship hit, {} lives left", self.lives);
                if let Some(s) = group.get_mut(sprite) {
                    s.add_modifier(Modifier::throb(1.0, 1.3, 0.05));
                }
                // the rock would overlap again next frame
                let rock_at = offender.and_then(|id| group.get_mut(id)).map(|rock| {
                    rock.alive = false;
                    rock.position
                });
                if let Some(rock_at) = rock_at {
                    Self::spawn_debris(group, rock_at);
                    self.spawn_rock(group);
                }
            }
            _ => {}
        }
        Ok(())
    }
}
