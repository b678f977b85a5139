//! Long-lived state owned by the engine.
//!
//! Overview
//! - `clock` – millisecond stopwatch with interval checks and freezing
//! - `framestats` – frame counters and the end-of-run report
//! - `gameconfig` – engine settings and INI loading
//! - `gamestate` – loop state machine and pause counter
//! - `group` – the ordered sprite collection
//! - `input` – touch samples delivered by the host
//! - `rendertarget` – rendering collaborator traits and a headless target
pub mod clock;
pub mod framestats;
pub mod gameconfig;
pub mod gamestate;
pub mod group;
pub mod input;
pub mod rendertarget;
