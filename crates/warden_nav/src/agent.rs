//! Reference steering agent that walks navigation paths

use crate::path::NavPath;
use crate::port::{NavigationAgent, NavigationPort};
use serde::{Deserialize, Serialize};
use warden_math::Vec3;

/// Arrival tolerance settings for a navigation agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavAgentConfig {
    /// Distance at which the agent stops short of its destination
    pub stopping_distance: f32,
    /// Multiplier on the stopping distance used for the arrival check
    pub reach_factor: f32,
}

impl Default for NavAgentConfig {
    fn default() -> Self {
        Self {
            stopping_distance: 0.5,
            reach_factor: 1.1,
        }
    }
}

impl NavAgentConfig {
    /// Set stopping distance
    pub fn with_stopping_distance(mut self, distance: f32) -> Self {
        self.stopping_distance = distance;
        self
    }

    /// Set reach factor
    pub fn with_reach_factor(mut self, factor: f32) -> Self {
        self.reach_factor = factor;
        self
    }

    /// Radius within which a destination counts as reached
    pub fn reach_radius(&self) -> f32 {
        self.stopping_distance * self.reach_factor
    }
}

/// Navigation agent that follows its path at constant speed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimNavAgent {
    config: NavAgentConfig,
    position: Vec3,
    velocity: Vec3,
    destination: Option<Vec3>,
    path: Option<NavPath>,
    speed: f32,
}

impl SimNavAgent {
    /// Create an idle agent at a position
    pub fn new(position: Vec3, config: NavAgentConfig) -> Self {
        Self {
            config,
            position,
            velocity: Vec3::ZERO,
            destination: None,
            path: None,
            speed: 0.0,
        }
    }

    /// Arrival configuration
    pub fn config(&self) -> &NavAgentConfig {
        &self.config
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Active path, if any
    pub fn path(&self) -> Option<&NavPath> {
        self.path.as_ref()
    }

    /// Teleport the agent, dropping its path but keeping the destination
    pub fn warp(&mut self, position: Vec3) {
        self.position = position;
        self.path = None;
        self.velocity = Vec3::ZERO;
    }

    /// Move along the path for `delta_time` seconds
    pub fn advance(&mut self, delta_time: f32) {
        let start = self.position;
        let mut budget = self.speed * delta_time;

        if let Some(path) = &mut self.path {
            while budget > 0.0 {
                let Some(waypoint) = path.current_waypoint() else {
                    break;
                };
                let to_waypoint = waypoint - self.position;
                let distance = to_waypoint.length();

                if distance <= budget {
                    self.position = waypoint;
                    budget -= distance;
                    path.advance();
                } else {
                    self.position += to_waypoint * (budget / distance);
                    budget = 0.0;
                }
            }

            if path.is_complete() {
                self.path = None;
            }
        }

        self.velocity = if delta_time > 0.0 {
            (self.position - start) / delta_time
        } else {
            Vec3::ZERO
        };
    }
}

impl NavigationAgent for SimNavAgent {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn set_destination(&mut self, nav: &dyn NavigationPort, destination: Vec3) -> bool {
        match nav.find_path(self.position, destination) {
            Some(mut path) => {
                // The first corner is where we already stand
                path.advance();
                self.path = Some(path);
                self.destination = Some(destination);
                true
            }
            None => {
                log::debug!(
                    "No path from {:?} to {:?}, keeping destination {:?}",
                    self.position,
                    destination,
                    self.destination
                );
                false
            }
        }
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn has_reached_destination(&self) -> bool {
        match self.destination {
            Some(destination) => {
                self.position.horizontal().distance(destination.horizontal())
                    <= self.config.reach_radius()
            }
            None => true,
        }
    }

    fn reach_radius(&self) -> f32 {
        self.config.reach_radius()
    }

    fn steering_target(&self) -> Vec3 {
        self.path
            .as_ref()
            .and_then(NavPath::current_waypoint)
            .unwrap_or(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::NavGrid;
    use approx::assert_relative_eq;

    fn corridor() -> NavGrid {
        NavGrid::open(10, 1, 1.0).unwrap()
    }

    #[test]
    fn test_idle_agent_has_arrived() {
        let agent = SimNavAgent::new(Vec3::ground(0.5, 0.5), NavAgentConfig::default());
        assert!(agent.has_reached_destination());
        assert_eq!(agent.steering_target(), agent.position());
    }

    #[test]
    fn test_agent_walks_to_destination() {
        let grid = corridor();
        let mut agent = SimNavAgent::new(Vec3::ground(0.5, 0.5), NavAgentConfig::default());
        agent.set_speed(2.0);

        assert!(agent.set_destination(&grid, Vec3::ground(8.5, 0.5)));
        assert!(!agent.has_reached_destination());
        assert_eq!(agent.steering_target(), Vec3::ground(8.5, 0.5));

        agent.advance(1.0);
        assert_relative_eq!(agent.position().x, 2.5, epsilon = 1e-4);
        assert_relative_eq!(agent.velocity().x, 2.0, epsilon = 1e-4);

        for _ in 0..10 {
            agent.advance(1.0);
        }
        assert!(agent.has_reached_destination());
        assert!(agent.path().is_none());
    }

    #[test]
    fn test_unreachable_destination_keeps_previous() {
        let mut grid = corridor();
        grid.set_walkable(5, 0, false).unwrap();

        let mut agent = SimNavAgent::new(Vec3::ground(0.5, 0.5), NavAgentConfig::default());
        assert!(agent.set_destination(&grid, Vec3::ground(3.5, 0.5)));
        assert!(!agent.set_destination(&grid, Vec3::ground(8.5, 0.5)));
        assert_eq!(agent.destination(), Some(Vec3::ground(3.5, 0.5)));
    }

    #[test]
    fn test_reach_radius_uses_factor() {
        let config = NavAgentConfig::default()
            .with_stopping_distance(1.0)
            .with_reach_factor(1.5);
        assert_relative_eq!(config.reach_radius(), 1.5);

        let grid = corridor();
        let mut agent = SimNavAgent::new(Vec3::ground(0.5, 0.5), config);
        agent.set_destination(&grid, Vec3::ground(1.9, 0.5));
        assert!(agent.has_reached_destination());
    }

    #[test]
    fn test_zero_speed_does_not_move() {
        let grid = corridor();
        let mut agent = SimNavAgent::new(Vec3::ground(0.5, 0.5), NavAgentConfig::default());
        agent.set_destination(&grid, Vec3::ground(8.5, 0.5));
        agent.advance(1.0);
        assert_eq!(agent.position(), Vec3::ground(0.5, 0.5));
        assert_eq!(agent.velocity(), Vec3::ZERO);
    }
}
