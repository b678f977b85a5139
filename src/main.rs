//! Spriteloop demo.
//!
//! Runs the headless asteroid field from [`spriteloop::scene`] on its own
//! frame thread, drives it the way a windowing host would (a pause, a touch
//! sample, a stop) and prints the run report.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --seconds 5 --pause-at-ms 1500 --pause-for-ms 500
//! RUST_LOG=debug cargo run -- --json
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_channel::RecvTimeoutError;
use log::{error, info, warn};

use spriteloop::prelude::*;
use spriteloop::scene::{AsteroidsScene, SceneConfig};

const FIELD_WIDTH: u32 = 640;
const FIELD_HEIGHT: u32 = 360;

/// Spriteloop 2D frame loop demo
#[derive(Parser)]
#[command(version, about = "Headless asteroid field running on the spriteloop frame loop")]
struct Cli {
    /// INI file with an [engine] section. Defaults to ./config.ini if present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// How long to run before stopping the loop.
    #[arg(long, default_value_t = 3.0)]
    seconds: f64,

    /// Rocks on the field at start.
    #[arg(long, default_value_t = 8)]
    rocks: usize,

    /// Override the configured target frame rate.
    #[arg(long)]
    target_fps: Option<u32>,

    /// Pause the loop this many milliseconds after start.
    #[arg(long, value_name = "MS")]
    pause_at_ms: Option<u64>,

    /// How long the pause lasts.
    #[arg(long, value_name = "MS", default_value_t = 500)]
    pause_for_ms: u64,

    /// Seed for rock placement and drift.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Print the run report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = EngineConfig::with_path(path);
            if let Err(e) = config.load_from_file() {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
            config
        }
        None => {
            let mut config = EngineConfig::new();
            config.load_from_file().ok(); // ignore errors, use defaults
            config
        }
    };
    if let Some(fps) = cli.target_fps {
        config = config.with_target_fps(fps);
    }

    let scene = AsteroidsScene::new(SceneConfig {
        width: FIELD_WIDTH as f32,
        height: FIELD_HEIGHT as f32,
        rocks: cli.rocks,
        seed: cli.seed,
        ..SceneConfig::default()
    });
    let target = HeadlessTarget::new(FIELD_WIDTH, FIELD_HEIGHT);

    let handle = match Engine::new(config, scene, target).and_then(Engine::start) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    drive(&handle, &cli);

    let report = match handle.join() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!(
            "{} frames ({} rendered, {} skipped), {} FPS at the end, {} pauses, \
             {} sprites reaped, {} collisions, {} sprites left",
            report.stats.frames,
            report.stats.frames_rendered,
            report.stats.frames_skipped,
            report.stats.frame_rate,
            report.pause_count,
            report.stats.sprites_reaped,
            report.stats.collisions_notified,
            report.sprites_remaining
        );
    }
}

/// Host side of the run: a scripted pause, a touch sample, then stop.
fn drive(handle: &EngineHandle, cli: &Cli) {
    let run_for = Duration::from_secs_f64(cli.seconds.max(0.0));
    let start = Instant::now();

    // aim once at the top-left corner of the field
    handle.touch(vec![Vec2::new(0.0, 0.0)]);

    if let Some(pause_at) = cli.pause_at_ms {
        if !watch(handle, Duration::from_millis(pause_at)) {
            return;
        }
        handle.pause();
        if !watch(handle, Duration::from_millis(cli.pause_for_ms)) {
            return;
        }
        handle.resume();
    }

    if watch(handle, run_for.saturating_sub(start.elapsed())) {
        handle.stop();
    }
}

/// Log engine messages for `duration`. Returns false once the engine has
/// stopped on its own.
fn watch(handle: &EngineHandle, duration: Duration) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match handle.messages().recv_timeout(remaining) {
            Ok(EngineMessage::StateChanged(state)) => info!("Loop is now {:?}", state),
            Ok(EngineMessage::FrameRate(fps)) => info!("{} FPS", fps),
            Ok(EngineMessage::Fatal(message)) => error!("Engine failed: {}", message),
            Ok(EngineMessage::Stopped(_)) => return false,
            Err(RecvTimeoutError::Timeout) => return !handle.is_finished(),
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Engine message channel closed");
                return false;
            }
        }
    }
}
