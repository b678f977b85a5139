//! Engine configuration.
//!
//! Settings for the frame loop, with safe defaults and optional loading from
//! an INI file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [engine]
//! target_fps = 40
//! debug_overlay = true
//! modifier_policy = stop
//! ```
//!
//! `modifier_policy` is `stop` (drop a finished modifier and stop animating
//! that sprite for the frame) or `skip` (drop it and keep going).

use std::path::PathBuf;
use std::time::Duration;

use configparser::ini::Ini;
use log::info;
use serde::{Deserialize, Serialize};

use crate::components::modifier::ModifierPolicy;
use crate::engine::EngineError;

/// Default safe values for startup
const DEFAULT_TARGET_FPS: u32 = 40;
const DEFAULT_DEBUG_OVERLAY: bool = true;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Frames per second the loop tries to hold.
    pub target_fps: u32,
    /// Draw the engine name, frame rate and pause count each frame.
    pub debug_overlay: bool,
    pub modifier_policy: ModifierPolicy,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            debug_overlay: DEFAULT_DEBUG_OVERLAY,
            modifier_policy: ModifierPolicy::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn with_debug_overlay(mut self, enabled: bool) -> Self {
        self.debug_overlay = enabled;
        self
    }

    pub fn with_modifier_policy(mut self, policy: ModifierPolicy) -> Self {
        self.modifier_policy = policy;
        self
    }

    /// Reject settings the loop cannot run with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.target_fps == 0 {
            return Err(EngineError::Config(
                "target_fps must be greater than zero".to_string(),
            ));
        }
        if self.target_fps > 1000 {
            return Err(EngineError::Config(format!(
                "target_fps {} leaves a frame period under one millisecond",
                self.target_fps
            )));
        }
        Ok(())
    }

    /// Time budget of one frame.
    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.target_fps.max(1)))
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values. Returns an error if the
    /// file cannot be read or a value is malformed.
    pub fn load_from_file(&mut self) -> Result<(), EngineError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| self.file_error(e))?;

        if let Some(fps) = config
            .getuint("engine", "target_fps")
            .map_err(|e| self.file_error(e))?
        {
            self.target_fps = u32::try_from(fps).map_err(|e| self.file_error(e.to_string()))?;
        }
        if let Some(overlay) = config
            .getbool("engine", "debug_overlay")
            .map_err(|e| self.file_error(e))?
        {
            self.debug_overlay = overlay;
        }
        if let Some(policy) = config.get("engine", "modifier_policy") {
            self.modifier_policy = ModifierPolicy::parse(&policy).ok_or_else(|| {
                self.file_error(format!("unknown modifier_policy '{}'", policy))
            })?;
        }

        info!(
            "Loaded config: fps={}, debug_overlay={}, modifier_policy={}",
            self.target_fps,
            self.debug_overlay,
            self.modifier_policy.as_str()
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), EngineError> {
        let mut config = Ini::new();

        config.set("engine", "target_fps", Some(self.target_fps.to_string()));
        config.set(
            "engine",
            "debug_overlay",
            Some(self.debug_overlay.to_string()),
        );
        config.set(
            "engine",
            "modifier_policy",
            Some(self.modifier_policy.as_str().to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| self.file_error(e.to_string()))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    fn file_error(&self, message: String) -> EngineError {
        EngineError::ConfigFile {
            path: self.config_path.clone(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.target_fps, 40);
        assert!(config.debug_overlay);
        assert_eq!(config.modifier_policy, ModifierPolicy::StopOnInactive);
        assert_eq!(config.frame_period(), Duration::from_millis(25));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_fps_is_rejected() {
        let config = EngineConfig::new().with_target_fps(0);
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_sub_millisecond_period_is_rejected() {
        let config = EngineConfig::new().with_target_fps(2000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[engine]\ntarget_fps = 60\ndebug_overlay = false\nmodifier_policy = skip"
        )
        .unwrap();

        let mut config = EngineConfig::with_path(file.path());
        config.load_from_file().unwrap();
        assert_eq!(config.target_fps, 60);
        assert!(!config.debug_overlay);
        assert_eq!(config.modifier_policy, ModifierPolicy::SkipInactive);
    }

    #[test]
    fn test_missing_keys_keep_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\ntarget_fps = 30").unwrap();

        let mut config = EngineConfig::with_path(file.path()).with_debug_overlay(false);
        config.load_from_file().unwrap();
        assert_eq!(config.target_fps, 30);
        assert!(!config.debug_overlay);
    }

    #[test]
    fn test_bad_policy_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nmodifier_policy = bounce").unwrap();

        let mut config = EngineConfig::with_path(file.path());
        assert!(matches!(
            config.load_from_file(),
            Err(EngineError::ConfigFile { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut config = EngineConfig::with_path("/nonexistent/spriteloop.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config.target_fps, 40);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let saved = EngineConfig::with_path(&path)
            .with_target_fps(50)
            .with_modifier_policy(ModifierPolicy::SkipInactive);
        saved.save_to_file().unwrap();

        let mut loaded = EngineConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded.target_fps, 50);
        assert_eq!(loaded.modifier_policy, ModifierPolicy::SkipInactive);
    }
}
