//! Integration tests for warden_ai pursuit behaviour

use std::cell::Cell;
use std::sync::Arc;
use warden_ai::prelude::*;
use warden_math::Ray;
use warden_physics::{
    CollisionGroups, CollisionLayer, OccluderDesc, OccluderShape, OcclusionWorld, SightHit,
};

const TARGET: BodyId = BodyId(100);
const WALL: BodyId = BodyId(200);

/// Line of sight whose answer is set by the test each tick
struct ScriptedSight {
    visible: Cell<bool>,
}

impl LineOfSight for ScriptedSight {
    fn first_hit(&self, ray: &Ray, _max: f32, _groups: CollisionGroups) -> Option<SightHit> {
        let body = if self.visible.get() { TARGET } else { WALL };
        Some(SightHit {
            body,
            point: ray.at(0.1),
            distance: 0.1,
        })
    }
}

struct Harness {
    grid: NavGrid,
    sight: ScriptedSight,
    pursuer: Pursuer<SimNavAgent>,
    events: Vec<PursuitEvent>,
}

impl Harness {
    fn new(grid: NavGrid, spawn: Vec3, patrol_points: Vec<Vec3>) -> Self {
        // Wide cone so scripted visibility alone decides
        let config = PursuitConfig::default().with_vision_half_angle(180.0).with_seed(11);
        let agent = SimNavAgent::new(spawn, NavAgentConfig::default());
        let pursuer = Pursuer::new(agent, patrol_points, TARGET, config).unwrap();
        Self {
            grid,
            sight: ScriptedSight {
                visible: Cell::new(false),
            },
            pursuer,
            events: Vec::new(),
        }
    }

    /// Tick without moving the agent
    fn step(&mut self, dt: f32, target: Vec3, visible: bool) {
        self.sight.visible.set(visible);
        let world = PursuitWorld {
            nav: &self.grid,
            sight: &self.sight,
            target_position: target,
        };
        self.pursuer.tick(dt, &world);
        self.events.extend(self.pursuer.drain_events());
    }

    /// Tick, then let the agent walk
    fn step_and_move(&mut self, dt: f32, target: Vec3, visible: bool) {
        self.step(dt, target, visible);
        self.pursuer.agent_mut().advance(dt);
    }

    fn destination(&self) -> Option<Vec3> {
        self.pursuer.agent().destination()
    }

    fn entered(&self, state: PursuitState) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, PursuitEvent::StateChanged { to, .. } if *to == state))
    }

    fn caught_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, PursuitEvent::Caught { .. }))
            .count()
    }

    fn assert_speed_matches_state(&self) {
        let config = self.pursuer.config();
        let expected = match self.pursuer.state() {
            PursuitState::Initial => return,
            PursuitState::Patrolling => config.patrol_speed,
            PursuitState::Chasing | PursuitState::RunningToLastSeen | PursuitState::Searching => {
                config.chase_speed
            }
            PursuitState::Waiting => 0.0,
        };
        assert_eq!(self.pursuer.agent().speed(), expected);
    }
}

fn open_grid(cols: usize, rows: usize) -> NavGrid {
    NavGrid::open(cols, rows, 1.0).unwrap()
}

/// Chase a target standing next to the agent, then lose it so the
/// pursuer arrives at its last destination immediately.
fn lose_target_nearby(harness: &mut Harness, dt: f32) {
    let agent = harness.pursuer.agent().position();
    let target = agent + Vec3::ground(0.0, 0.2);

    harness.step(dt, target, true);
    assert_eq!(harness.pursuer.state(), PursuitState::Chasing);
    harness.step(dt, target, true);
    harness.step(dt, target, false);
    assert_eq!(harness.pursuer.state(), PursuitState::RunningToLastSeen);
}

#[test]
fn test_patrol_timer_picks_new_point() {
    let points = vec![
        Vec3::ground(1.5, 1.5),
        Vec3::ground(10.5, 1.5),
        Vec3::ground(10.5, 10.5),
        Vec3::ground(1.5, 10.5),
    ];
    let mut harness = Harness::new(open_grid(12, 12), Vec3::ground(5.5, 5.5), points);
    let target = Vec3::ground(6.0, 6.0);

    harness.step(0.5, target, false);
    assert_eq!(harness.pursuer.state(), PursuitState::Patrolling);
    let mut previous = harness.destination().unwrap();

    for _ in 0..3 {
        // 19 more half-second ticks stay below the 10s period
        for _ in 0..19 {
            harness.step(0.5, target, false);
            assert_eq!(harness.destination(), Some(previous));
            harness.assert_speed_matches_state();
        }

        harness.step(0.5, target, false);
        let next = harness.destination().unwrap();
        assert_ne!(next, previous);
        previous = next;
    }
}

#[test]
fn test_single_patrol_point_is_reused() {
    let mut harness = Harness::new(open_grid(6, 6), Vec3::ground(0.5, 0.5), vec![Vec3::ground(4.5, 4.5)]);
    for _ in 0..25 {
        harness.step(0.5, Vec3::ground(5.5, 0.5), false);
    }
    assert_eq!(harness.destination(), Some(Vec3::ground(4.5, 4.5)));
}

#[test]
fn test_caught_fires_once_per_approach() {
    let mut harness = Harness::new(open_grid(10, 10), Vec3::ground(5.5, 5.5), vec![Vec3::ground(1.5, 1.5)]);
    let close = Vec3::ground(5.5, 5.8);
    let far = Vec3::ground(5.5, 8.5);

    harness.step(0.1, close, true);
    assert_eq!(harness.pursuer.state(), PursuitState::Chasing);

    for _ in 0..5 {
        harness.step(0.1, close, true);
    }
    assert_eq!(harness.caught_count(), 1);
    assert!(harness.events.contains(&PursuitEvent::Caught { position: close }));

    // Target slips out of reach, then is reached again
    harness.step(0.1, far, true);
    assert_eq!(harness.caught_count(), 1);
    harness.step(0.1, close, true);
    harness.step(0.1, close, true);
    assert_eq!(harness.caught_count(), 2);
}

#[test]
fn test_losing_sight_overshoots_along_velocity() {
    let mut harness = Harness::new(open_grid(20, 5), Vec3::ground(2.5, 2.5), vec![Vec3::ground(1.5, 1.5)]);

    harness.step(0.1, Vec3::ground(6.0, 2.5), true);
    harness.step(0.1, Vec3::ground(6.25, 2.5), true);
    harness.step(0.1, Vec3::ground(6.5, 2.5), true);
    assert_eq!(harness.destination(), Some(Vec3::ground(6.5, 2.5)));

    harness.step(0.1, Vec3::ground(6.75, 2.5), false);
    assert_eq!(harness.pursuer.state(), PursuitState::RunningToLastSeen);
    harness.assert_speed_matches_state();

    let destination = harness.destination().unwrap();
    assert!((destination.x - 8.5).abs() < 1e-4);
    assert!((destination.z - 2.5).abs() < 1e-4);
}

#[test]
fn test_overshoot_stops_at_wall() {
    let mut grid = open_grid(20, 5);
    for row in 0..5 {
        grid.set_walkable(8, row, false).unwrap();
    }
    let mut harness = Harness::new(grid, Vec3::ground(2.5, 2.5), vec![Vec3::ground(1.5, 1.5)]);

    harness.step(0.1, Vec3::ground(6.25, 2.5), true);
    harness.step(0.1, Vec3::ground(6.25, 2.5), true);
    harness.step(0.1, Vec3::ground(6.5, 2.5), true);
    harness.step(0.1, Vec3::ground(6.75, 2.5), false);

    let destination = harness.destination().unwrap();
    assert_eq!(harness.pursuer.state(), PursuitState::RunningToLastSeen);
    assert!(destination.x > 6.5);
    assert!(destination.x < 8.0);
}

#[test]
fn test_no_hidden_points_goes_straight_to_waiting() {
    // Open room: every patrol point is directly reachable in a straight line
    let points = vec![Vec3::ground(1.5, 1.5), Vec3::ground(8.5, 8.5)];
    let mut harness = Harness::new(open_grid(10, 10), Vec3::ground(5.5, 5.5), points);

    lose_target_nearby(&mut harness, 0.5);
    harness.step(0.5, Vec3::ground(9.5, 0.5), false);

    assert_eq!(harness.pursuer.state(), PursuitState::Waiting);
    assert!(!harness.entered(PursuitState::Searching));
    harness.assert_speed_matches_state();
}

#[test]
fn test_waiting_ends_after_exact_duration() {
    let points = vec![Vec3::ground(1.5, 1.5), Vec3::ground(8.5, 8.5)];
    let mut harness = Harness::new(open_grid(10, 10), Vec3::ground(5.5, 5.5), points);
    let away = Vec3::ground(9.5, 0.5);

    lose_target_nearby(&mut harness, 0.5);
    harness.step(0.5, away, false);
    assert_eq!(harness.pursuer.state(), PursuitState::Waiting);

    // Default wait is 4s: seven half-second ticks are one short
    for _ in 0..7 {
        harness.step(0.5, away, false);
        assert_eq!(harness.pursuer.state(), PursuitState::Waiting);
    }
    harness.step(0.5, away, false);
    assert_eq!(harness.pursuer.state(), PursuitState::Patrolling);
    harness.assert_speed_matches_state();
}

#[test]
fn test_search_visits_hidden_points_then_waits() {
    let grid = NavGrid::from_ascii(
        "
        ..........
        ..........
        ####.#####
        ..........
        ..........
        ",
        1.0,
    )
    .unwrap();
    let near_hidden = Vec3::ground(1.5, 4.5);
    let far_hidden = Vec3::ground(8.5, 4.5);
    let in_view = Vec3::ground(8.5, 0.5);
    let mut harness = Harness::new(grid, Vec3::ground(4.5, 0.5), vec![in_view, far_hidden, near_hidden]);
    let away = Vec3::ground(9.5, 0.5);

    lose_target_nearby(&mut harness, 0.25);
    harness.step(0.25, away, false);
    assert_eq!(harness.pursuer.state(), PursuitState::Searching);
    assert_eq!(harness.destination(), Some(near_hidden));
    assert_eq!(harness.pursuer.candidates(), &[far_hidden]);

    let mut visited = vec![near_hidden];
    for _ in 0..400 {
        harness.step_and_move(0.25, away, false);
        harness.assert_speed_matches_state();
        match harness.pursuer.state() {
            PursuitState::Searching => {
                let destination = harness.destination().unwrap();
                if visited.last() != Some(&destination) {
                    visited.push(destination);
                }
            }
            PursuitState::Waiting => break,
            other => panic!("unexpected state {:?}", other),
        }
    }

    assert_eq!(harness.pursuer.state(), PursuitState::Waiting);
    assert_eq!(visited, vec![near_hidden, far_hidden]);
    assert!(!visited.contains(&in_view));
}

#[test]
fn test_sighting_during_search_resumes_chase() {
    let grid = NavGrid::from_ascii(
        "
        ..........
        ####.#####
        ..........
        ",
        1.0,
    )
    .unwrap();
    let mut harness = Harness::new(grid, Vec3::ground(4.5, 0.5), vec![Vec3::ground(1.5, 2.5)]);

    lose_target_nearby(&mut harness, 0.25);
    harness.step(0.25, Vec3::ground(9.5, 0.5), false);
    assert_eq!(harness.pursuer.state(), PursuitState::Searching);

    harness.step(0.25, Vec3::ground(9.5, 0.5), true);
    assert_eq!(harness.pursuer.state(), PursuitState::Chasing);
    assert!(harness.pursuer.candidates().is_empty());
}

#[test]
fn test_publish_attenuates_linearly() {
    let grid = open_grid(20, 1);
    let bus = AlertAggregator::new();
    let agent = SimNavAgent::new(Vec3::ground(0.5, 0.5), NavAgentConfig::default());
    let pursuer = Pursuer::new(agent, vec![Vec3::ground(1.5, 0.5)], TARGET, PursuitConfig::default()).unwrap();
    bus.subscribe(pursuer.ear());

    assert_eq!(bus.publish(&grid, Vec3::ground(5.5, 0.5), 10.0, 1.0), 1);
    assert!((pursuer.suspicion() - 0.5).abs() < 1e-5);

    // At or beyond the radius nothing is delivered
    assert_eq!(bus.publish(&grid, Vec3::ground(10.5, 0.5), 10.0, 1.0), 0);
    assert_eq!(bus.publish(&grid, Vec3::ground(15.5, 0.5), 10.0, 1.0), 0);
    assert!((pursuer.suspicion() - 0.5).abs() < 1e-5);
}

#[test]
fn test_loud_sound_forces_investigation() {
    let points = vec![Vec3::ground(1.5, 1.5), Vec3::ground(8.5, 8.5)];
    let mut harness = Harness::new(open_grid(10, 10), Vec3::ground(5.5, 5.5), points);
    let bus = AlertAggregator::new();
    bus.subscribe(harness.pursuer.ear());
    let target = Vec3::ground(0.5, 9.5);

    harness.step(0.1, target, false);
    assert_eq!(harness.pursuer.state(), PursuitState::Patrolling);

    let sound = Vec3::ground(5.5, 7.5);
    assert_eq!(bus.publish(&harness.grid, sound, 10.0, 2.0), 1);
    // Latched only; the state machine reacts on its own tick
    assert_eq!(harness.pursuer.state(), PursuitState::Patrolling);

    harness.step(0.1, target, false);
    assert_eq!(harness.pursuer.state(), PursuitState::RunningToLastSeen);
    assert_eq!(harness.destination(), Some(sound));
    assert!(harness.events.contains(&PursuitEvent::Vocalize(Vocalization::Alerted)));
    assert_eq!(harness.pursuer.suspicion(), 0.0);
    harness.assert_speed_matches_state();
}

#[test]
fn test_quiet_sounds_accumulate_and_decay() {
    let points = vec![Vec3::ground(1.5, 1.5), Vec3::ground(8.5, 8.5)];
    let mut harness = Harness::new(open_grid(10, 10), Vec3::ground(5.5, 5.5), points);
    let bus = AlertAggregator::new();
    bus.subscribe(harness.pursuer.ear());
    let target = Vec3::ground(0.5, 9.5);

    harness.step(0.5, target, false);
    bus.publish(&harness.grid, Vec3::ground(5.5, 7.5), 4.0, 1.0);
    assert!((harness.pursuer.suspicion() - 0.5).abs() < 1e-5);

    // 0.25 per second decay
    harness.step(1.0, target, false);
    assert!((harness.pursuer.suspicion() - 0.25).abs() < 1e-5);
    assert_eq!(harness.pursuer.state(), PursuitState::Patrolling);
}

#[test]
fn test_chase_is_not_preempted_by_sound() {
    let mut harness = Harness::new(open_grid(10, 10), Vec3::ground(5.5, 5.5), vec![Vec3::ground(1.5, 1.5)]);
    let bus = AlertAggregator::new();
    bus.subscribe(harness.pursuer.ear());
    let target = Vec3::ground(5.5, 8.5);

    harness.step(0.1, target, true);
    assert_eq!(harness.pursuer.state(), PursuitState::Chasing);

    bus.publish(&harness.grid, Vec3::ground(1.5, 5.5), 10.0, 5.0);
    harness.step(0.1, target, true);
    assert_eq!(harness.pursuer.state(), PursuitState::Chasing);
    assert_eq!(harness.destination(), Some(target));
    assert!(!harness.events.contains(&PursuitEvent::Vocalize(Vocalization::Alerted)));

    // Losing sight is a transition and clears the meter
    harness.step(0.1, target, false);
    assert_eq!(harness.pursuer.state(), PursuitState::RunningToLastSeen);
    assert_eq!(harness.pursuer.suspicion(), 0.0);
}

#[test]
fn test_occlusion_world_blocks_and_reveals() {
    let grid = open_grid(10, 10);
    let mut occlusion = OcclusionWorld::new();
    occlusion
        .add_static_box(Vec3::new(5.5, 1.5, 5.0), [1.0, 1.5, 0.25])
        .unwrap();

    let hidden_spot = Vec3::ground(5.5, 8.5);
    let target_body = occlusion
        .add_body(OccluderDesc::new(
            OccluderShape::capsule(0.6, 0.3),
            hidden_spot + Vec3::new(0.0, 1.0, 0.0),
            CollisionLayer::TARGET,
        ))
        .unwrap();

    let config = PursuitConfig::default()
        .with_vision_half_angle(180.0)
        .with_seed(5);
    let agent = SimNavAgent::new(Vec3::ground(5.5, 1.5), NavAgentConfig::default());
    let mut pursuer = Pursuer::new(agent, vec![Vec3::ground(1.5, 1.5)], target_body, config).unwrap();

    let world = PursuitWorld {
        nav: &grid,
        sight: &occlusion,
        target_position: hidden_spot,
    };
    pursuer.tick(0.1, &world);
    assert_eq!(pursuer.state(), PursuitState::Patrolling);

    let open_spot = Vec3::ground(8.5, 6.5);
    occlusion
        .set_body_position(target_body, open_spot + Vec3::new(0.0, 1.0, 0.0))
        .unwrap();
    let world = PursuitWorld {
        nav: &grid,
        sight: &occlusion,
        target_position: open_spot,
    };
    pursuer.tick(0.1, &world);
    assert_eq!(pursuer.state(), PursuitState::Chasing);
    assert_eq!(pursuer.last_known().map(|state| state.position), Some(open_spot));
}

#[test]
fn test_ears_are_shared_handles() {
    let agent = SimNavAgent::new(Vec3::ground(0.5, 0.5), NavAgentConfig::default());
    let pursuer = Pursuer::new(agent, vec![Vec3::ground(1.5, 0.5)], TARGET, PursuitConfig::default()).unwrap();
    let ear = pursuer.ear();
    assert!(Arc::ptr_eq(&ear, &pursuer.ear()));
}
