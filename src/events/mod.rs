//! Messages crossing the host/frame-thread boundary.
//!
//! Submodules:
//! - [`control`] – host commands to the loop and loop messages to the host
pub mod control;
