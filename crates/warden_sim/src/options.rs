//! Run options
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. Environment (`WARDEN_SCENE`, `WARDEN_TICKS`, `WARDEN_COMPACT`)
//! 3. Command line (first non-flag argument is the scene path, `--compact`)

use std::path::PathBuf;

/// Scene bundled with the crate
pub const DEFAULT_SCENE: &str = "crates/warden_sim/scenes/basement.toml";

/// Options for one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimOptions {
    /// Scene file to load
    pub scene: PathBuf,
    /// Step count overriding the scene's own
    pub ticks: Option<u32>,
    /// Print the summary on a single line
    pub compact: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            scene: PathBuf::from(DEFAULT_SCENE),
            ticks: None,
            compact: false,
        }
    }
}

impl SimOptions {
    /// Load from the process environment and arguments
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_sources(|key| std::env::var(key).ok(), &args)
    }

    /// Resolve options from an environment lookup and argument list
    pub fn from_sources<F>(env: F, args: &[String]) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(scene) = env("WARDEN_SCENE").filter(|s| !s.is_empty()) {
            options.scene = PathBuf::from(scene);
            log::info!("Scene from env: {}", options.scene.display());
        }

        if let Some(ticks) = env("WARDEN_TICKS") {
            match ticks.parse() {
                Ok(ticks) => options.ticks = Some(ticks),
                Err(_) => log::warn!("Ignoring WARDEN_TICKS={:?}, not a step count", ticks),
            }
        }

        if env("WARDEN_COMPACT").map(|v| v == "1" || v == "true").unwrap_or(false) {
            options.compact = true;
        }

        let mut scene_from_args = false;
        for arg in args {
            if arg == "--compact" {
                options.compact = true;
                continue;
            }
            // Skip other flags
            if arg.starts_with("--") {
                continue;
            }
            if !scene_from_args {
                options.scene = PathBuf::from(arg);
                scene_from_args = true;
                log::info!("Scene from args: {}", options.scene.display());
            }
        }

        options
    }
}
