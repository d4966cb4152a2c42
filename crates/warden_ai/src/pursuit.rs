//! Pursuit and search state machine

use crate::alert::AgentEar;
use crate::config::PursuitConfig;
use crate::error::{AiError, Result};
use crate::perception::{LastKnownTargetState, Perception};
use crate::scoring::{select_search_set, sort_nearest_last};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warden_math::{radians, Vec3};
use warden_nav::{NavigationAgent, NavigationPort};
use warden_physics::{BodyId, LineOfSight};

/// Behaviour state of a pursuer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PursuitState {
    /// Before the first tick; never re-entered
    Initial,
    /// Walking between patrol points
    Patrolling,
    /// Following a visible target
    Chasing,
    /// Heading for where the target was last seen, or for a heard sound
    RunningToLastSeen,
    /// Visiting hidden patrol points near the last sighting
    Searching,
    /// Standing still and looking around
    Waiting,
}

/// Cue for external audio playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vocalization {
    /// The target was spotted
    Spotted,
    /// A sound drew the pursuer's attention
    Alerted,
}

/// Something the host may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PursuitEvent {
    StateChanged { from: PursuitState, to: PursuitState },
    Vocalize(Vocalization),
    Caught { position: Vec3 },
}

/// Shared, read-only world access for one tick
#[derive(Clone, Copy)]
pub struct PursuitWorld<'a> {
    pub nav: &'a dyn NavigationPort,
    pub sight: &'a dyn LineOfSight,
    pub target_position: Vec3,
}

/// One antagonist: perception, hearing and the pursuit state machine,
/// steering a navigation agent.
///
/// The host owns the agent's movement; [`Pursuer::tick`] only decides
/// destination, speed and heading.
pub struct Pursuer<A: NavigationAgent> {
    agent: A,
    config: PursuitConfig,
    state: PursuitState,
    heading: Vec3,
    perception: Perception,
    ear: Arc<AgentEar>,
    patrol_points: Vec<Vec3>,
    last_patrol: Option<usize>,
    patrol_timer: f32,
    wait_timer: f32,
    candidates: Vec<Vec3>,
    caught: bool,
    events: Vec<PursuitEvent>,
    rng: StdRng,
}

impl<A: NavigationAgent> Pursuer<A> {
    /// Create a pursuer watching for `target`
    pub fn new(
        agent: A,
        patrol_points: Vec<Vec3>,
        target: BodyId,
        config: PursuitConfig,
    ) -> Result<Self> {
        config.validate()?;
        if patrol_points.is_empty() {
            return Err(AiError::NoPatrolPoints);
        }

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let ear = Arc::new(AgentEar::from_config(&config, agent.position()));

        Ok(Self {
            perception: Perception::new(&config, target),
            agent,
            config,
            state: PursuitState::Initial,
            heading: Vec3::Z,
            ear,
            patrol_points,
            last_patrol: None,
            patrol_timer: 0.0,
            wait_timer: 0.0,
            candidates: Vec::new(),
            caught: false,
            events: Vec::new(),
            rng,
        })
    }

    /// Set the initial heading
    pub fn with_heading(mut self, heading: Vec3) -> Self {
        let heading = heading.horizontal().normalize_or_zero();
        if heading != Vec3::ZERO {
            self.heading = heading;
        }
        self
    }

    pub fn state(&self) -> PursuitState {
        self.state
    }

    pub fn config(&self) -> &PursuitConfig {
        &self.config
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    /// Mutable agent access for the host's movement step
    pub fn agent_mut(&mut self) -> &mut A {
        &mut self.agent
    }

    /// Unit horizontal facing direction
    pub fn heading(&self) -> Vec3 {
        self.heading
    }

    /// Hearing handle to subscribe on an alert bus
    pub fn ear(&self) -> Arc<AgentEar> {
        Arc::clone(&self.ear)
    }

    /// Current suspicion level
    pub fn suspicion(&self) -> f32 {
        self.ear.suspicion()
    }

    /// Last sighting of the target
    pub fn last_known(&self) -> Option<&LastKnownTargetState> {
        self.perception.last_known()
    }

    /// Remaining search points, nearest or best last
    pub fn candidates(&self) -> &[Vec3] {
        &self.candidates
    }

    pub fn patrol_points(&self) -> &[Vec3] {
        &self.patrol_points
    }

    /// Take queued events
    pub fn drain_events(&mut self) -> Vec<PursuitEvent> {
        std::mem::take(&mut self.events)
    }

    /// Evaluate one fixed step
    pub fn tick(&mut self, delta_time: f32, world: &PursuitWorld<'_>) {
        let position = self.agent.position();
        self.ear.sync_position(position);
        self.ear.tick(delta_time);
        // Taken before leaving Initial, whose entry would discard it
        let alert = self.ear.take_alert();

        if self.state == PursuitState::Initial {
            self.switch_to(PursuitState::Patrolling);
        }

        let visible =
            self.perception
                .sense(world.sight, position, self.heading, world.target_position);

        match alert {
            Some(sound) if !visible && self.state != PursuitState::Chasing => {
                self.investigate(world.nav, sound);
            }
            _ => self.evaluate(delta_time, visible, world),
        }

        if self.state != PursuitState::Waiting {
            self.face_steering_target(delta_time);
        }

        self.perception.end_tick(world.target_position);
        self.ear.sync_position(self.agent.position());
    }

    fn evaluate(&mut self, delta_time: f32, visible: bool, world: &PursuitWorld<'_>) {
        match self.state {
            PursuitState::Initial | PursuitState::Patrolling => {
                if visible {
                    self.switch_to(PursuitState::Chasing);
                    return;
                }

                self.patrol_timer += delta_time;
                if timer_elapsed(self.patrol_timer, self.config.patrol_change_period, delta_time)
                    || self.agent.has_reached_destination()
                {
                    self.patrol_timer = 0.0;
                    self.choose_patrol_point(world);
                }
            }

            PursuitState::Chasing => {
                if visible {
                    if !self.agent.set_destination(world.nav, world.target_position) {
                        log::debug!("No path to visible target at {:?}", world.target_position);
                    }

                    let gap = self
                        .agent
                        .position()
                        .horizontal()
                        .distance(world.target_position.horizontal());
                    if gap <= self.agent.reach_radius() {
                        if !self.caught {
                            self.caught = true;
                            log::info!("Target caught at {:?}", world.target_position);
                            self.events.push(PursuitEvent::Caught {
                                position: world.target_position,
                            });
                        }
                    } else {
                        self.caught = false;
                    }
                } else {
                    let from = self.agent.destination().unwrap_or(self.agent.position());
                    let next = overshoot(
                        world.nav,
                        from,
                        self.perception.last_known_velocity(),
                        self.config.lost_walk_distance,
                    );
                    log::debug!("Lost sight of target, running on to {:?}", next);
                    self.agent.set_destination(world.nav, next);
                    self.switch_to(PursuitState::RunningToLastSeen);
                }
            }

            PursuitState::RunningToLastSeen => {
                if visible {
                    self.switch_to(PursuitState::Chasing);
                } else if self.agent.has_reached_destination() {
                    self.begin_search(world.nav);
                }
            }

            PursuitState::Searching => {
                if visible {
                    self.switch_to(PursuitState::Chasing);
                } else if self.agent.has_reached_destination() {
                    let position = self.agent.position();
                    sort_nearest_last(world.nav, position, &mut self.candidates);

                    match self.candidates.pop() {
                        Some(next) => {
                            self.agent.set_destination(world.nav, next);
                        }
                        None => self.switch_to(PursuitState::Waiting),
                    }
                }
            }

            PursuitState::Waiting => {
                if visible {
                    self.switch_to(PursuitState::Chasing);
                    return;
                }

                let turn = radians(self.config.wait_rotation_speed_deg * delta_time);
                self.heading = self.heading.rotate_y(turn);

                self.wait_timer += delta_time;
                if timer_elapsed(self.wait_timer, self.config.wait_duration, delta_time) {
                    self.switch_to(PursuitState::Patrolling);
                }
            }
        }
    }

    /// Sound-forced move to the heard position
    fn investigate(&mut self, nav: &dyn NavigationPort, sound: Vec3) {
        log::info!("Investigating sound at {:?}", sound);
        self.switch_to(PursuitState::RunningToLastSeen);
        self.events.push(PursuitEvent::Vocalize(Vocalization::Alerted));
        if !self.agent.set_destination(nav, sound) {
            log::debug!("Heard sound at {:?} but no path leads there", sound);
        }
    }

    fn begin_search(&mut self, nav: &dyn NavigationPort) {
        let position = self.agent.position();
        let hidden: Vec<Vec3> = self
            .patrol_points
            .iter()
            .copied()
            .filter(|point| nav.raycast(position, *point).is_some())
            .collect();

        let mut selected: Vec<Vec3> = select_search_set(
            nav,
            position,
            hidden,
            self.perception.last_known_velocity(),
            self.config.search_candidate_count,
        )
        .into_iter()
        .map(|candidate| candidate.position)
        .collect();

        match selected.pop() {
            Some(next) => {
                self.switch_to(PursuitState::Searching);
                self.agent.set_destination(nav, next);
                self.candidates = selected;
            }
            None => {
                log::debug!("No hidden reachable points to search from {:?}", position);
                self.switch_to(PursuitState::Waiting);
            }
        }
    }

    fn choose_patrol_point(&mut self, world: &PursuitWorld<'_>) {
        let last = self.last_patrol;
        let others: Vec<usize> = (0..self.patrol_points.len())
            .filter(|index| Some(*index) != last)
            .collect();

        let max_distance = self.config.patrol_max_distance_from_target;
        let near_target: Vec<usize> = others
            .iter()
            .copied()
            .filter(|&index| {
                world
                    .nav
                    .path_length(self.patrol_points[index], world.target_position)
                    .is_some_and(|length| length < max_distance)
            })
            .collect();

        let pool = if !near_target.is_empty() {
            near_target
        } else if !others.is_empty() {
            others
        } else {
            (0..self.patrol_points.len()).collect()
        };

        let Some(&index) = pool.choose(&mut self.rng) else {
            return;
        };

        self.last_patrol = Some(index);
        let point = self.patrol_points[index];
        if self.agent.set_destination(world.nav, point) {
            log::debug!("Patrolling to point {} at {:?}", index, point);
        } else {
            log::warn!("Patrol point {} at {:?} is unreachable", index, point);
        }
    }

    fn face_steering_target(&mut self, delta_time: f32) {
        let to_target = self.agent.steering_target() - self.agent.position();
        let max_turn = radians(self.config.rotation_speed_deg * delta_time);
        self.heading = self.heading.rotate_towards(to_target, max_turn);
    }

    fn switch_to(&mut self, to: PursuitState) {
        let from = self.state;
        self.state = to;
        log::debug!("Pursuit state {:?} -> {:?}", from, to);
        self.events.push(PursuitEvent::StateChanged { from, to });

        match to {
            PursuitState::Initial => {}
            PursuitState::Patrolling => {
                self.patrol_timer = 0.0;
                self.agent.set_speed(self.config.patrol_speed);
            }
            PursuitState::Chasing => {
                self.agent.set_speed(self.config.chase_speed);
                self.events.push(PursuitEvent::Vocalize(Vocalization::Spotted));
            }
            PursuitState::RunningToLastSeen | PursuitState::Searching => {
                self.agent.set_speed(self.config.chase_speed);
            }
            PursuitState::Waiting => {
                self.wait_timer = 0.0;
                self.agent.set_speed(0.0);
            }
        }

        self.candidates.clear();
        self.caught = false;
        self.ear.reset();
    }
}

/// Whether an accumulated `timer` has reached `duration`, to within half a
/// step so summed float steps land on the intended tick.
fn timer_elapsed(timer: f32, duration: f32, delta_time: f32) -> bool {
    timer + delta_time * 0.5 >= duration
}

/// Destination a little past `destination` along `velocity`, stopped at the
/// first navigation boundary.
///
/// The velocity is scaled up and clamped to unit length, so any motion
/// extends by roughly `distance`; a zero velocity does not extend at all.
pub fn overshoot(
    nav: &dyn NavigationPort,
    destination: Vec3,
    velocity: Vec3,
    distance: f32,
) -> Vec3 {
    let next = destination + (velocity * 1000.0).clamp_length(1.0) * distance;
    nav.raycast(destination, next).unwrap_or(next)
}
