//! Engine loop configuration.
//!
//! Settings for the demo frame loop, loaded from an INI file. Missing
//! values keep their defaults so the binary always starts.
//!
//! # Configuration File Format
//!
//! ```ini
//! [loop]
//! target_fps = 60
//! max_frames = 600
//!
//! [scenes]
//! blueprint = ./demo_scene.json
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_MAX_FRAMES: u64 = 600;
const DEFAULT_CONFIG_PATH: &str = "./stagehand.ini";

/// Frame-loop configuration for the demo binary.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Target frames per second; the loop uses a fixed delta of `1/target_fps`.
    pub target_fps: u32,
    /// Number of frames to run before quitting.
    pub max_frames: u64,
    /// Optional scene blueprint to load into the opening scene.
    pub blueprint: Option<PathBuf>,
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
            max_frames: DEFAULT_MAX_FRAMES,
            blueprint: None,
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

    /// Fixed per-frame delta time in seconds.
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {e}"))?;

        // [loop] section
        if let Some(fps) = config.getuint("loop", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(frames) = config.getuint("loop", "max_frames").ok().flatten() {
            self.max_frames = frames;
        }

        // [scenes] section
        if let Some(path) = config.get("scenes", "blueprint") {
            self.blueprint = Some(PathBuf::from(path));
        }

        info!(
            "Loaded config: fps={}, max_frames={}, blueprint={:?}",
            self.target_fps, self.max_frames, self.blueprint
        );

        Ok(())
    }
}
