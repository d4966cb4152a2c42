//! Pursuer tuning

use crate::error::{AiError, Result};
use serde::{Deserialize, Serialize};
use warden_physics::CollisionGroups;

/// Static configuration of a pursuer.
///
/// Supplied once at construction and never mutated afterwards. Angles are
/// in degrees, distances in world units, durations in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitConfig {
    /// Half-angle of the vision cone
    pub vision_half_angle_deg: f32,
    /// Maximum sight distance
    pub vision_range: f32,
    /// Height of the eyes above the agent position
    pub eye_height: f32,
    /// Layer filter bits the sight ray can hit
    pub vision_mask: u32,

    /// Movement speed while patrolling
    pub patrol_speed: f32,
    /// Movement speed while chasing, running or searching
    pub chase_speed: f32,
    /// Seconds before a new patrol point is picked regardless of arrival
    pub patrol_change_period: f32,
    /// Patrol points farther than this (path length) from the target are avoided
    pub patrol_max_distance_from_target: f32,

    /// Extra distance walked past the last known destination on losing sight
    pub lost_walk_distance: f32,
    /// Number of hidden patrol points kept for the search phase
    pub search_candidate_count: usize,

    /// In-place turn rate while waiting, degrees per second
    pub wait_rotation_speed_deg: f32,
    /// Time spent waiting before patrolling again
    pub wait_duration: f32,
    /// Heading smoothing rate toward the steering point, degrees per second
    pub rotation_speed_deg: f32,

    /// Level at which suspicion forces an investigation
    pub suspicion_threshold: f32,
    /// Multiplier applied to heard volumes
    pub suspicion_sensitivity: f32,
    /// Suspicion lost per second
    pub suspicion_decay: f32,

    /// Seed for patrol point selection; `None` seeds from entropy
    pub rng_seed: Option<u64>,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            vision_half_angle_deg: 60.0,
            vision_range: f32::INFINITY,
            eye_height: 1.6,
            vision_mask: CollisionGroups::ALL.filter,
            patrol_speed: 1.0,
            chase_speed: 2.0,
            patrol_change_period: 10.0,
            patrol_max_distance_from_target: 10.0,
            lost_walk_distance: 2.0,
            search_candidate_count: 3,
            wait_rotation_speed_deg: 90.0,
            wait_duration: 4.0,
            rotation_speed_deg: 360.0,
            suspicion_threshold: 1.0,
            suspicion_sensitivity: 1.0,
            suspicion_decay: 0.25,
            rng_seed: None,
        }
    }
}

impl PursuitConfig {
    /// Set vision cone half-angle
    pub fn with_vision_half_angle(mut self, degrees: f32) -> Self {
        self.vision_half_angle_deg = degrees;
        self
    }

    /// Set vision range
    pub fn with_vision_range(mut self, range: f32) -> Self {
        self.vision_range = range;
        self
    }

    /// Set the layer filter for sight rays
    pub fn with_vision_mask(mut self, mask: u32) -> Self {
        self.vision_mask = mask;
        self
    }

    /// Set patrol and chase speeds
    pub fn with_speeds(mut self, patrol: f32, chase: f32) -> Self {
        self.patrol_speed = patrol;
        self.chase_speed = chase;
        self
    }

    /// Set patrol change period
    pub fn with_patrol_change_period(mut self, seconds: f32) -> Self {
        self.patrol_change_period = seconds;
        self
    }

    /// Set lost walk distance
    pub fn with_lost_walk_distance(mut self, distance: f32) -> Self {
        self.lost_walk_distance = distance;
        self
    }

    /// Set search candidate count
    pub fn with_search_candidate_count(mut self, count: usize) -> Self {
        self.search_candidate_count = count;
        self
    }

    /// Set wait duration
    pub fn with_wait_duration(mut self, seconds: f32) -> Self {
        self.wait_duration = seconds;
        self
    }

    /// Set suspicion threshold, sensitivity and decay
    pub fn with_suspicion(mut self, threshold: f32, sensitivity: f32, decay: f32) -> Self {
        self.suspicion_threshold = threshold;
        self.suspicion_sensitivity = sensitivity;
        self.suspicion_decay = decay;
        self
    }

    /// Set RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Sight ray groups derived from the vision mask
    pub fn sight_groups(&self) -> CollisionGroups {
        CollisionGroups::new(u32::MAX, self.vision_mask)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        fn non_negative(name: &str, value: f32) -> Result<()> {
            if value.is_nan() || value < 0.0 {
                return Err(AiError::InvalidConfig(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
            Ok(())
        }

        if !(0.0..=180.0).contains(&self.vision_half_angle_deg) {
            return Err(AiError::InvalidConfig(format!(
                "vision_half_angle_deg must be within [0, 180], got {}",
                self.vision_half_angle_deg
            )));
        }
        if self.vision_range.is_nan() || self.vision_range <= 0.0 {
            return Err(AiError::InvalidConfig(format!(
                "vision_range must be positive, got {}",
                self.vision_range
            )));
        }
        if self.suspicion_threshold.is_nan() || self.suspicion_threshold <= 0.0 {
            return Err(AiError::InvalidConfig(format!(
                "suspicion_threshold must be positive, got {}",
                self.suspicion_threshold
            )));
        }

        non_negative("eye_height", self.eye_height)?;
        non_negative("patrol_speed", self.patrol_speed)?;
        non_negative("chase_speed", self.chase_speed)?;
        non_negative("patrol_change_period", self.patrol_change_period)?;
        non_negative("patrol_max_distance_from_target", self.patrol_max_distance_from_target)?;
        non_negative("lost_walk_distance", self.lost_walk_distance)?;
        non_negative("wait_rotation_speed_deg", self.wait_rotation_speed_deg)?;
        non_negative("wait_duration", self.wait_duration)?;
        non_negative("rotation_speed_deg", self.rotation_speed_deg)?;
        non_negative("suspicion_sensitivity", self.suspicion_sensitivity)?;
        non_negative("suspicion_decay", self.suspicion_decay)?;
        Ok(())
    }
}
