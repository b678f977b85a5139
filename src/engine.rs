//! The frame loop.
//!
//! [`Engine`] owns everything a running game needs: the sprite group, the
//! frame clock, the render target and the game hooks. There is no global
//! instance; the host builds an engine, then either runs it on the current
//! thread ([`Engine::run`]) or on a dedicated frame thread
//! ([`Engine::start`]) and controls it through an [`EngineHandle`].
//!
//! # Frame phases
//!
//! Each running frame executes, in order:
//!
//! 1. frame-rate sampling (one-second windows; touch samples reset too)
//! 2. the game's `update` hook
//! 3. collision detection over the group
//! 4. rendering, if the target is ready: the game's `draw` hook, then for
//!    every live sprite `animate` immediately followed by its draw call,
//!    then the debug overlay
//! 5. reaping dead sprites and collision notifications
//! 6. pacing: wait out the rest of the frame period, if any
//!
//! Host commands are drained at the top of every iteration only. The pacing
//! wait listens on the command channel until the frame deadline: touch
//! samples are queued and the wait goes on, while `Pause` and `Stop` end it
//! early. While paused the loop blocks on that channel and nothing else
//! happens; every clock the engine owns is frozen until it resumes. Once
//! every controller is gone a paused loop stops.
//!
//! Messages go to the controllers that exist when they are sent. With no
//! controller alive nothing is queued.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use glam::Vec2;
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::events::control::{ControlCmd, EngineMessage};
use crate::game::{Game, HookError};
use crate::resources::clock::Clock;
use crate::resources::gameconfig::EngineConfig;
use crate::resources::gamestate::{LoopState, LoopStatus};
use crate::resources::group::SpriteGroup;
use crate::resources::input::InputState;
use crate::resources::rendertarget::RenderTarget;
use crate::systems::collision::detect_collisions;
use crate::systems::reap::reap_and_notify;

pub use crate::resources::framestats::{EngineReport, FrameStats};

/// Length of one frame-rate sampling window.
const FRAME_RATE_WINDOW_MS: u64 = 1000;
/// Debug overlay column, measured from the right edge of the canvas.
const OVERLAY_RIGHT_MARGIN: f32 = 150.0;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("config file {path:?}: {message}")]
    ConfigFile { path: PathBuf, message: String },
    #[error("{hook} hook failed: {source}")]
    Hook {
        hook: &'static str,
        #[source]
        source: HookError,
    },
    #[error("size of sprite '{name}' is already set")]
    SizeAlreadySet { name: String },
    #[error("failed to spawn frame thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("frame thread panicked")]
    ThreadPanicked,
}

fn hook_error(hook: &'static str) -> impl FnOnce(HookError) -> EngineError {
    move |source| EngineError::Hook { hook, source }
}

/// State shared with the game hooks.
#[derive(Debug, Default)]
pub struct EngineContext {
    pub group: SpriteGroup,
    pub input: InputState,
    stats: FrameStats,
    status: LoopStatus,
    quit_requested: bool,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Frames completed in the last full one-second window.
    pub fn frame_rate(&self) -> u32 {
        self.stats.frame_rate
    }

    pub fn state(&self) -> LoopState {
        self.status.get()
    }

    pub fn pause_count(&self) -> u32 {
        self.status.pause_count()
    }

    /// Ask the loop to stop after the current frame.
    pub fn quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn report(&self) -> EngineReport {
        EngineReport {
            stats: self.stats,
            pause_count: self.status.pause_count(),
            sprites_remaining: self.group.len(),
        }
    }
}

pub struct Engine<G: Game, R: RenderTarget> {
    config: EngineConfig,
    game: G,
    target: R,
    context: EngineContext,
    frame_clock: Clock,
    window_frames: u32,
    booted: bool,
    pending: VecDeque<ControlCmd>,
    /// Dropped when the loop starts running, so only controllers keep the
    /// command channel open.
    tx_cmd: Option<Sender<ControlCmd>>,
    rx_cmd: Receiver<ControlCmd>,
    /// One sender per live controller.
    listeners: Vec<Sender<EngineMessage>>,
}

impl<G: Game, R: RenderTarget> Engine<G, R> {
    /// Build an engine. Fails if `config` does not validate.
    pub fn new(config: EngineConfig, game: G, target: R) -> Result<Self, EngineError> {
        config.validate()?;
        let (tx_cmd, rx_cmd) = unbounded::<ControlCmd>();
        Ok(Engine {
            config,
            game,
            target,
            context: EngineContext::new(),
            frame_clock: Clock::new(),
            window_frames: 0,
            booted: false,
            pending: VecDeque::new(),
            tx_cmd: Some(tx_cmd),
            rx_cmd,
            listeners: Vec::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.context
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut R {
        &mut self.target
    }

    pub fn state(&self) -> LoopState {
        self.context.state()
    }

    /// A control surface usable from any thread. It receives every message
    /// sent from now on; earlier ones are not replayed.
    pub fn controller(&mut self) -> EngineController {
        let (tx_msg, rx_msg) = unbounded::<EngineMessage>();
        self.listeners.push(tx_msg);
        EngineController {
            tx_cmd: self.tx_cmd.clone(),
            rx_msg,
        }
    }

    /// Run `init` and `load`, then enter Running. Does nothing the second
    /// time.
    pub fn boot(&mut self) -> Result<(), EngineError> {
        if self.booted {
            return Ok(());
        }
        self.booted = true;
        info!("Engine boot: target {} fps", self.config.target_fps);

        let result = self
            .game
            .init(&mut self.context)
            .map_err(hook_error("init"))
            .and_then(|_| self.game.load(&mut self.context).map_err(hook_error("load")));
        if let Err(e) = result {
            self.fail(&e);
            return Err(e);
        }

        if self.context.status.start() {
            self.frame_clock = Clock::new();
            info!("Engine running with {} sprites", self.context.group.len());
            self.send(EngineMessage::StateChanged(LoopState::Running));
        }
        Ok(())
    }

    /// One loop iteration without pacing.
    ///
    /// Applies pending host commands, then runs the frame phases if the
    /// loop is running. Returns the state after the iteration. A hook error
    /// stops the loop and is returned.
    pub fn tick(&mut self) -> Result<LoopState, EngineError> {
        self.drain_commands();

        if self.context.state() != LoopState::Running {
            return Ok(self.context.state());
        }

        if let Err(e) = self.run_frame() {
            self.fail(&e);
            return Err(e);
        }

        if self.context.quit_requested {
            self.context.quit_requested = false;
            self.stop();
        }
        Ok(self.context.state())
    }

    /// Boot, then loop until stopped. Blocks the calling thread.
    pub fn run(mut self) -> Result<EngineReport, EngineError> {
        info!("Engine.run start");
        self.tx_cmd = None;
        self.boot()?;

        loop {
            let frame_start = Instant::now();
            match self.tick()? {
                LoopState::Stopped => break,
                LoopState::Paused => self.wait_for_command(),
                LoopState::Running => self.wait_until(frame_start + self.config.frame_period()),
            }
        }

        let report = self.context.report();
        info!(
            "Engine.run end: {} frames, {} pauses",
            report.stats.frames, report.pause_count
        );
        self.send(EngineMessage::Stopped(report));
        Ok(report)
    }

    /// Move the engine to its own frame thread.
    pub fn start(mut self) -> Result<EngineHandle, EngineError>
    where
        G: Send + 'static,
        R: Send + 'static,
    {
        let controller = self.controller();
        let thread = std::thread::Builder::new()
            .name("spriteloop-frame".to_string())
            .spawn(move || self.run())
            .map_err(EngineError::Spawn)?;
        Ok(EngineHandle { controller, thread })
    }

    fn send(&mut self, message: EngineMessage) {
        self.listeners
            .retain(|tx| tx.send(message.clone()).is_ok());
    }

    fn drain_commands(&mut self) {
        while let Ok(cmd) = self.rx_cmd.try_recv() {
            self.pending.push_back(cmd);
        }
        while let Some(cmd) = self.pending.pop_front() {
            self.apply_command(cmd);
        }
    }

    fn wait_for_command(&mut self) {
        match self.rx_cmd.recv() {
            Ok(cmd) => self.pending.push_back(cmd),
            Err(_) => {
                warn!("Every controller is gone while paused, stopping");
                self.pending.push_back(ControlCmd::Stop);
            }
        }
    }

    /// Pacing primitive. Commands arriving before `deadline` are queued;
    /// only `Pause` and `Stop` end the wait early.
    fn wait_until(&mut self, deadline: Instant) {
        loop {
            match self.rx_cmd.recv_deadline(deadline) {
                Ok(cmd) => {
                    let lifecycle = matches!(cmd, ControlCmd::Pause | ControlCmd::Stop);
                    self.pending.push_back(cmd);
                    if lifecycle {
                        return;
                    }
                }
                Err(RecvTimeoutError::Timeout) => return,
                Err(RecvTimeoutError::Disconnected) => {
                    std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
                    return;
                }
            }
        }
    }

    fn apply_command(&mut self, cmd: ControlCmd) {
        match cmd {
            ControlCmd::Pause => {
                if self.context.status.pause() {
                    self.frame_clock.freeze();
                    self.context.group.freeze_clocks();
                    info!("Engine paused (pause #{})", self.context.pause_count());
                    self.send(EngineMessage::StateChanged(LoopState::Paused));
                }
            }
            ControlCmd::Resume => {
                if self.context.status.resume() {
                    self.frame_clock.thaw();
                    self.context.group.thaw_clocks();
                    info!("Engine resumed");
                    self.send(EngineMessage::StateChanged(LoopState::Running));
                }
            }
            ControlCmd::Stop => self.stop(),
            ControlCmd::Touch(points) => self.context.input.set_touches(&points),
        }
    }

    fn stop(&mut self) {
        if self.context.status.stop() {
            info!("Engine stopped");
            self.send(EngineMessage::StateChanged(LoopState::Stopped));
        }
    }

    fn fail(&mut self, e: &EngineError) {
        error!("FATAL ERROR: {}", e);
        self.send(EngineMessage::Fatal(e.to_string()));
        self.stop();
    }

    fn run_frame(&mut self) -> Result<(), EngineError> {
        self.sample_frame_rate();

        self.game
            .update(&mut self.context)
            .map_err(hook_error("update"))?;

        detect_collisions(&mut self.context.group);

        self.render()?;

        let game = &mut self.game;
        let summary = reap_and_notify(&mut self.context.group, |group, id| {
            game.collision(group, id)
        })
        .map_err(hook_error("collision"))?;
        self.context.stats.sprites_reaped += summary.removed.len() as u64;
        self.context.stats.collisions_notified += summary.notified.len() as u64;

        Ok(())
    }

    fn sample_frame_rate(&mut self) {
        self.context.stats.frames += 1;
        self.window_frames += 1;
        if self.frame_clock.interval_elapsed(FRAME_RATE_WINDOW_MS) {
            self.context.stats.frame_rate = self.window_frames;
            self.window_frames = 0;
            self.context.input.reset();
            let fps = self.context.stats.frame_rate;
            debug!("{} FPS", fps);
            self.send(EngineMessage::FrameRate(fps));
        }
    }

    fn render(&mut self) -> Result<(), EngineError> {
        if !self.target.is_ready() || !self.target.begin_frame() {
            self.context.stats.frames_skipped += 1;
            return Ok(());
        }

        let result = self.draw_frame();
        self.target.end_frame();
        if result.is_ok() {
            self.context.stats.frames_rendered += 1;
        }
        result
    }

    fn draw_frame(&mut self) -> Result<(), EngineError> {
        self.game
            .draw(&mut self.context, &mut self.target)
            .map_err(hook_error("draw"))?;

        let policy = self.config.modifier_policy;
        for sprite in self.context.group.iter_mut() {
            if !sprite.alive {
                continue;
            }
            sprite.animate(policy);
            if sprite.size().is_none() {
                if let Some((w, h)) = self.target.visual_size(sprite) {
                    sprite.infer_size(w, h);
                }
            }
            self.target.draw_sprite(sprite);
        }

        if self.config.debug_overlay {
            let x = self.target.width() as f32 - OVERLAY_RIGHT_MARGIN;
            self.target.draw_text("ENGINE", x, 20.0);
            self.target
                .draw_text(&format!("{} FPS", self.context.frame_rate()), x, 40.0);
            self.target
                .draw_text(&format!("Pauses: {}", self.context.pause_count()), x, 60.0);
        }
        Ok(())
    }
}

/// Sends commands to an engine and receives its messages.
#[derive(Debug, Clone)]
pub struct EngineController {
    tx_cmd: Option<Sender<ControlCmd>>,
    rx_msg: Receiver<EngineMessage>,
}

impl EngineController {
    fn send(&self, cmd: ControlCmd) {
        // A stopped engine no longer listens.
        if let Some(tx) = &self.tx_cmd {
            let _ = tx.send(cmd);
        }
    }

    pub fn pause(&self) {
        self.send(ControlCmd::Pause);
    }

    pub fn resume(&self) {
        self.send(ControlCmd::Resume);
    }

    pub fn stop(&self) {
        self.send(ControlCmd::Stop);
    }

    pub fn touch(&self, points: Vec<Vec2>) {
        self.send(ControlCmd::Touch(points));
    }

    pub fn messages(&self) -> &Receiver<EngineMessage> {
        &self.rx_msg
    }
}

/// A running frame thread.
pub struct EngineHandle {
    controller: EngineController,
    thread: JoinHandle<Result<EngineReport, EngineError>>,
}

impl EngineHandle {
    pub fn controller(&self) -> &EngineController {
        &self.controller
    }

    pub fn pause(&self) {
        self.controller.pause();
    }

    pub fn resume(&self) {
        self.controller.resume();
    }

    pub fn stop(&self) {
        self.controller.stop();
    }

    pub fn touch(&self, points: Vec<Vec2>) {
        self.controller.touch(points);
    }

    pub fn messages(&self) -> &Receiver<EngineMessage> {
        self.controller.messages()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the frame thread to end and collect its result.
    pub fn join(self) -> Result<EngineReport, EngineError> {
        self.thread
            .join()
            .map_err(|_| EngineError::ThreadPanicked)?
    }
}
