//! Fixed-step simulation
//!
//! Owns the shared world (navigation grid, occlusion colliders, alert bus),
//! the pursuers and the scripted target, and advances them in a fixed
//! order every step: target, scheduled noises, then each pursuer's
//! decision followed by its movement.

use crate::scene::{ground, SceneDefinition, SceneError};
use serde::Serialize;
use std::collections::BTreeMap;
use warden_ai::{AlertAggregator, PursuitEvent, PursuitState, PursuitWorld, Pursuer, Vocalization};
use warden_math::Vec3;
use warden_nav::{NavGrid, NavigationAgent, SimNavAgent};
use warden_physics::{BodyId, CollisionLayer, OccluderDesc, OccluderShape, OcclusionWorld};

/// Target walking its route in a loop, straight from point to point
#[derive(Debug, Clone)]
pub struct ScriptedTarget {
    route: Vec<Vec3>,
    next: usize,
    position: Vec3,
    speed: f32,
}

impl ScriptedTarget {
    /// Start at the first route point
    pub fn new(route: Vec<Vec3>, speed: f32) -> Self {
        let position = route.first().copied().unwrap_or(Vec3::ZERO);
        Self {
            next: 1 % route.len().max(1),
            route,
            position,
            speed: speed.max(0.0),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Walk for `delta_time` seconds
    pub fn advance(&mut self, delta_time: f32) {
        if self.route.len() < 2 || self.loop_length() <= 0.0 {
            return;
        }

        let mut budget = self.speed * delta_time;
        while budget > 0.0 {
            let waypoint = self.route[self.next];
            let to_waypoint = waypoint - self.position;
            let distance = to_waypoint.length();
            if distance <= budget {
                self.position = waypoint;
                budget -= distance;
                self.next = (self.next + 1) % self.route.len();
            } else {
                self.position += to_waypoint * (budget / distance);
                budget = 0.0;
            }
        }
    }

    fn loop_length(&self) -> f32 {
        self.route
            .iter()
            .zip(self.route.iter().cycle().skip(1))
            .map(|(a, b)| a.distance(*b))
            .sum()
    }
}

/// One state change as it happened
#[derive(Debug, Clone, Serialize)]
pub struct TransitionRecord {
    pub tick: u32,
    pub from: PursuitState,
    pub to: PursuitState,
}

/// Per-pursuer results
#[derive(Debug, Clone, Serialize)]
pub struct PursuerSummary {
    pub name: String,
    pub final_state: PursuitState,
    pub final_position: [f32; 3],
    pub caught: u32,
    pub spotted: u32,
    pub alerted: u32,
    pub seconds_in_state: BTreeMap<String, f32>,
    pub transitions: Vec<TransitionRecord>,
}

/// Results of a run, printed as JSON by the binary
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub scene: String,
    pub ticks: u32,
    pub seconds: f32,
    pub noise_deliveries: usize,
    pub target_caught: bool,
    pub pursuers: Vec<PursuerSummary>,
}

struct PursuerSlot {
    name: String,
    pursuer: Pursuer<SimNavAgent>,
    summary: PursuerSummary,
}

/// Running simulation
pub struct Simulation {
    name: String,
    dt: f32,
    stop_on_caught: bool,
    grid: NavGrid,
    occlusion: OcclusionWorld,
    bus: AlertAggregator,
    target: ScriptedTarget,
    target_body: BodyId,
    target_center_height: f32,
    pursuers: Vec<PursuerSlot>,
    noises: Vec<(u32, Vec3, f32, f32)>,
    tick: u32,
    noise_deliveries: usize,
    target_caught: bool,
}

impl Simulation {
    /// Build every runtime object described by `scene`
    pub fn from_scene(scene: &SceneDefinition) -> Result<Self, SceneError> {
        scene.validate()?;
        let meta = &scene.scene;

        let grid = NavGrid::from_ascii(&meta.map, meta.cell_size)?;

        let mut occlusion = OcclusionWorld::new();
        let half_cell = grid.cell_size() * 0.5;
        let half_height = meta.wall_height * 0.5;
        let walls: Vec<(usize, usize)> = grid.blocked_cells().collect();
        for (col, row) in &walls {
            let center = grid.cell_center(*col, *row) + Vec3::Y * half_height;
            occlusion.add_static_box(center, [half_cell, half_height, half_cell])?;
        }
        log::info!(
            "Scene '{}': {}x{} grid, {} wall occluders",
            meta.name,
            grid.cols(),
            grid.rows(),
            walls.len()
        );

        let route: Vec<Vec3> = scene.target.route.iter().copied().map(ground).collect();
        let target = ScriptedTarget::new(route, scene.target.speed);
        let target_center_height = scene.target.height * 0.5;
        let capsule_half_height = (scene.target.height * 0.5 - scene.target.radius).max(0.0);
        let target_body = occlusion.add_body(OccluderDesc::new(
            OccluderShape::capsule(capsule_half_height, scene.target.radius),
            target.position() + Vec3::Y * target_center_height,
            CollisionLayer::TARGET,
        ))?;

        let bus = AlertAggregator::new();
        let mut pursuers = Vec::with_capacity(scene.pursuers.len());
        for def in &scene.pursuers {
            let agent = SimNavAgent::new(ground(def.spawn), def.nav);
            let patrol = def.patrol.iter().copied().map(ground).collect();
            let mut pursuer = Pursuer::new(agent, patrol, target_body, def.config.clone())?;
            if let Some(heading) = def.heading {
                pursuer = pursuer.with_heading(ground(heading));
            }
            bus.subscribe(pursuer.ear());

            pursuers.push(PursuerSlot {
                name: def.name.clone(),
                summary: PursuerSummary {
                    name: def.name.clone(),
                    final_state: pursuer.state(),
                    final_position: pursuer.agent().position().to_array(),
                    caught: 0,
                    spotted: 0,
                    alerted: 0,
                    seconds_in_state: BTreeMap::new(),
                    transitions: Vec::new(),
                },
                pursuer,
            });
        }

        let noises = scene
            .noises
            .iter()
            .map(|noise| (noise.tick, ground(noise.position), noise.radius, noise.volume))
            .collect();

        Ok(Self {
            name: meta.name.clone(),
            dt: meta.dt,
            stop_on_caught: meta.stop_on_caught,
            grid,
            occlusion,
            bus,
            target,
            target_body,
            target_center_height,
            pursuers,
            noises,
            tick: 0,
            noise_deliveries: 0,
            target_caught: false,
        })
    }

    /// Steps taken so far
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Whether a pursuer has caught the target
    pub fn target_caught(&self) -> bool {
        self.target_caught
    }

    pub fn target_position(&self) -> Vec3 {
        self.target.position()
    }

    /// Current state of the named pursuer
    pub fn pursuer_state(&self, name: &str) -> Option<PursuitState> {
        self.pursuers
            .iter()
            .find(|slot| slot.name == name)
            .map(|slot| slot.pursuer.state())
    }

    /// Advance one fixed step
    pub fn step(&mut self) -> Result<(), SceneError> {
        let dt = self.dt;

        self.target.advance(dt);
        let target_position = self.target.position();
        self.occlusion.set_body_position(
            self.target_body,
            target_position + Vec3::Y * self.target_center_height,
        )?;

        for (tick, position, radius, volume) in &self.noises {
            if *tick == self.tick {
                let heard = self.bus.publish(&self.grid, *position, *radius, *volume);
                log::info!("Noise at {:?} heard by {} pursuer(s)", position, heard);
                self.noise_deliveries += heard;
            }
        }

        let world = PursuitWorld {
            nav: &self.grid,
            sight: &self.occlusion,
            target_position,
        };

        for slot in &mut self.pursuers {
            slot.pursuer.tick(dt, &world);

            for event in slot.pursuer.drain_events() {
                match event {
                    PursuitEvent::StateChanged { from, to } => {
                        log::info!("[{}] tick {}: {:?} -> {:?}", slot.name, self.tick, from, to);
                        slot.summary.transitions.push(TransitionRecord {
                            tick: self.tick,
                            from,
                            to,
                        });
                    }
                    PursuitEvent::Vocalize(Vocalization::Spotted) => slot.summary.spotted += 1,
                    PursuitEvent::Vocalize(Vocalization::Alerted) => slot.summary.alerted += 1,
                    PursuitEvent::Caught { position } => {
                        log::info!("[{}] caught the target at {:?}", slot.name, position);
                        slot.summary.caught += 1;
                        self.target_caught = true;
                    }
                }
            }

            slot.pursuer.agent_mut().advance(dt);

            *slot
                .summary
                .seconds_in_state
                .entry(format!("{:?}", slot.pursuer.state()))
                .or_insert(0.0) += dt;
        }

        self.tick += 1;
        Ok(())
    }

    /// Step until `ticks` have run or the target is caught
    pub fn run(&mut self, ticks: u32) -> Result<SimulationSummary, SceneError> {
        while self.tick < ticks {
            self.step()?;
            if self.stop_on_caught && self.target_caught {
                log::info!("Target caught after {} ticks, stopping", self.tick);
                break;
            }
        }
        Ok(self.summary())
    }

    /// Snapshot of the results so far
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            scene: self.name.clone(),
            ticks: self.tick,
            seconds: self.tick as f32 * self.dt,
            noise_deliveries: self.noise_deliveries,
            target_caught: self.target_caught,
            pursuers: self
                .pursuers
                .iter()
                .map(|slot| {
                    let mut summary = slot.summary.clone();
                    summary.final_state = slot.pursuer.state();
                    summary.final_position = slot.pursuer.agent().position().to_array();
                    summary
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::load_scene_from_str;

    const CORRIDOR: &str = r#"
[scene]
name = "Corridor"
dt = 0.1
map = """
....................
.######.######.####.
....................
"""

[target]
route = [[19.5, 2.5], [19.5, 0.5]]
speed = 0.5

[[pursuers]]
name = "warden"
spawn = [0.5, 0.5]
heading = [1.0, 0.0]
patrol = [[0.5, 2.5], [10.5, 0.5]]

[pursuers.config]
rng_seed = 1
"#;

    #[test]
    fn test_target_loops_route() {
        let mut target = ScriptedTarget::new(
            vec![Vec3::ground(0.0, 0.0), Vec3::ground(2.0, 0.0)],
            1.0,
        );
        target.advance(1.5);
        assert_eq!(target.position(), Vec3::ground(1.5, 0.0));
        target.advance(1.0);
        assert_eq!(target.position(), Vec3::ground(1.5, 0.0));
    }

    #[test]
    fn test_single_point_target_stays() {
        let mut target = ScriptedTarget::new(vec![Vec3::ground(3.0, 3.0)], 2.0);
        target.advance(1.0);
        assert_eq!(target.position(), Vec3::ground(3.0, 3.0));
    }

    #[test]
    fn test_build_and_run() {
        let scene = load_scene_from_str(CORRIDOR).unwrap();
        let mut sim = Simulation::from_scene(&scene).unwrap();
        let summary = sim.run(50).unwrap();

        assert!(summary.ticks <= 50);
        assert_eq!(summary.pursuers.len(), 1);
        let warden = &summary.pursuers[0];
        assert_eq!(warden.transitions[0].from, PursuitState::Initial);
        assert_eq!(warden.transitions[0].to, PursuitState::Patrolling);
        assert!(serde_json::to_string(&summary).is_ok());
    }

    #[test]
    fn test_target_in_plain_view_is_chased() {
        let scene = load_scene_from_str(
            r#"
[scene]
map = """
..........
..........
"""

[target]
route = [[6.5, 0.5]]

[[pursuers]]
name = "warden"
spawn = [0.5, 0.5]
heading = [1.0, 0.0]
patrol = [[0.5, 1.5]]
"#,
        )
        .unwrap();
        let mut sim = Simulation::from_scene(&scene).unwrap();
        let summary = sim.run(200).unwrap();

        assert!(summary.target_caught);
        assert!(summary.pursuers[0].spotted >= 1);
        assert_eq!(summary.pursuers[0].caught, 1);
    }

    #[test]
    fn test_step_advances_everything() {
        let scene = load_scene_from_str(CORRIDOR).unwrap();
        let mut sim = Simulation::from_scene(&scene).unwrap();
        assert_eq!(sim.pursuer_state("warden"), Some(PursuitState::Initial));
        assert_eq!(sim.pursuer_state("nobody"), None);

        sim.step().unwrap();
        assert_eq!(sim.tick(), 1);
        assert_eq!(sim.pursuer_state("warden"), Some(PursuitState::Patrolling));
        assert!((sim.target_position().z - 2.45).abs() < 1e-4);
        assert!(!sim.target_caught());
    }

    #[test]
    fn test_noise_draws_pursuer() {
        let scene = load_scene_from_str(&format!(
            "{}\n{}",
            CORRIDOR,
            r#"
[[noises]]
tick = 3
position = [4.5, 0.5]
radius = 10.0
volume = 2.0
"#
        ))
        .unwrap();
        let mut sim = Simulation::from_scene(&scene).unwrap();
        for _ in 0..5 {
            sim.step().unwrap();
        }
        assert_eq!(sim.summary().noise_deliveries, 1);
        assert_eq!(sim.summary().pursuers[0].alerted, 1);
    }
}
