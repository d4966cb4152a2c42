//! Scene files
//!
//! A scene is a TOML document describing the level layout, the pursuers and
//! a scripted target route.
//!
//! ```toml
//! [scene]
//! name = "Basement"
//! cell_size = 1.0
//! dt = 0.1
//! ticks = 600
//! map = """
//! ..........
//! .####.....
//! ..........
//! """
//!
//! [target]
//! route = [[8.5, 0.5], [8.5, 2.5]]
//! speed = 1.5
//!
//! [[pursuers]]
//! name = "warden"
//! spawn = [0.5, 0.5]
//! patrol = [[0.5, 2.5], [9.5, 0.5]]
//!
//! [pursuers.config]
//! chase_speed = 2.5
//!
//! [[noises]]
//! tick = 120
//! position = [5.5, 2.5]
//! radius = 10.0
//! ```
//!
//! Positions are `[x, z]` pairs on the ground plane.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use warden_ai::{AiError, PursuitConfig};
use warden_math::Vec3;
use warden_nav::{NavAgentConfig, NavError};
use warden_physics::PhysicsError;

/// Errors raised while loading or building a scene
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Navigation error: {0}")]
    Nav(#[from] NavError),

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("Pursuer error: {0}")]
    Ai(#[from] AiError),

    #[error("Invalid scene: {0}")]
    Invalid(String),
}

/// Ground-plane position
pub type GroundPoint = [f32; 2];

/// Convert a ground-plane pair to a world position
pub fn ground(point: GroundPoint) -> Vec3 {
    Vec3::ground(point[0], point[1])
}

/// Complete scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDefinition {
    pub scene: SceneMeta,
    pub target: TargetDef,
    #[serde(default)]
    pub pursuers: Vec<PursuerDef>,
    #[serde(default)]
    pub noises: Vec<NoiseDef>,
}

/// Level layout and stepping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneMeta {
    #[serde(default = "default_name")]
    pub name: String,
    /// ASCII walkability map, `#` is a wall
    pub map: String,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    /// Height of the wall occluders
    #[serde(default = "default_wall_height")]
    pub wall_height: f32,
    /// Fixed step in seconds
    #[serde(default = "default_dt")]
    pub dt: f32,
    /// Number of steps to run unless overridden
    #[serde(default = "default_ticks")]
    pub ticks: u32,
    /// Stop as soon as any pursuer catches the target
    #[serde(default = "default_true")]
    pub stop_on_caught: bool,
}

/// Scripted target route, walked in a loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDef {
    pub route: Vec<GroundPoint>,
    #[serde(default = "default_target_speed")]
    pub speed: f32,
    #[serde(default = "default_target_radius")]
    pub radius: f32,
    #[serde(default = "default_target_height")]
    pub height: f32,
}

/// One pursuer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PursuerDef {
    pub name: String,
    pub spawn: GroundPoint,
    /// Initial facing direction
    #[serde(default)]
    pub heading: Option<GroundPoint>,
    pub patrol: Vec<GroundPoint>,
    #[serde(default)]
    pub config: PursuitConfig,
    #[serde(default)]
    pub nav: NavAgentConfig,
}

/// A sound published on the alert bus at a given tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseDef {
    pub tick: u32,
    pub position: GroundPoint,
    pub radius: f32,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_name() -> String {
    "Untitled".to_string()
}

fn default_cell_size() -> f32 {
    1.0
}

fn default_wall_height() -> f32 {
    3.0
}

fn default_dt() -> f32 {
    0.1
}

fn default_ticks() -> u32 {
    600
}

fn default_true() -> bool {
    true
}

fn default_target_speed() -> f32 {
    1.5
}

fn default_target_radius() -> f32 {
    0.3
}

fn default_target_height() -> f32 {
    1.8
}

fn default_volume() -> f32 {
    1.0
}

impl SceneDefinition {
    /// Reject scenes the simulation cannot run
    pub fn validate(&self) -> Result<(), SceneError> {
        if !(self.scene.dt.is_finite() && self.scene.dt > 0.0) {
            return Err(SceneError::Invalid(format!(
                "dt must be positive, got {}",
                self.scene.dt
            )));
        }
        if self.target.route.is_empty() {
            return Err(SceneError::Invalid("target route is empty".to_string()));
        }
        if self.target.height < 2.0 * self.target.radius {
            return Err(SceneError::Invalid(format!(
                "target height {} is less than its diameter",
                self.target.height
            )));
        }
        if self.pursuers.is_empty() {
            return Err(SceneError::Invalid("scene has no pursuers".to_string()));
        }
        Ok(())
    }
}

/// Load a scene definition from a TOML file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneDefinition, SceneError> {
    let content = std::fs::read_to_string(path)?;
    load_scene_from_str(&content)
}

/// Load a scene definition from a TOML string
pub fn load_scene_from_str(content: &str) -> Result<SceneDefinition, SceneError> {
    let scene: SceneDefinition = toml::from_str(content)?;
    scene.validate()?;
    Ok(scene)
}
