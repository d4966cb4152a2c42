//! Vision sensing

use crate::config::PursuitConfig;
use serde::{Deserialize, Serialize};
use warden_math::{Ray, Vec3};
use warden_physics::{BodyId, CollisionGroups, LineOfSight};

/// What the pursuer remembers about the target from its last sighting
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LastKnownTargetState {
    /// Target position when last seen
    pub position: Vec3,
    /// One-tick displacement of the target when last seen
    pub velocity: Vec3,
}

/// Vision cone plus occlusion test against a single target body.
///
/// The velocity estimate is the raw target displacement since the previous
/// tick, so only its direction is meaningful.
#[derive(Debug, Clone)]
pub struct Perception {
    half_angle_deg: f32,
    range: f32,
    eye_height: f32,
    groups: CollisionGroups,
    target: BodyId,
    previous_target_position: Option<Vec3>,
    last_known: Option<LastKnownTargetState>,
}

impl Perception {
    /// Create a sensor tuned by `config`, looking for `target`
    pub fn new(config: &PursuitConfig, target: BodyId) -> Self {
        Self {
            half_angle_deg: config.vision_half_angle_deg,
            range: config.vision_range,
            eye_height: config.eye_height,
            groups: config.sight_groups(),
            target,
            previous_target_position: None,
            last_known: None,
        }
    }

    /// Body the sensor is looking for
    pub fn target(&self) -> BodyId {
        self.target
    }

    /// Last sighting, if the target was ever seen
    pub fn last_known(&self) -> Option<&LastKnownTargetState> {
        self.last_known.as_ref()
    }

    /// Last known velocity, zero if never seen
    pub fn last_known_velocity(&self) -> Vec3 {
        self.last_known.map(|state| state.velocity).unwrap_or(Vec3::ZERO)
    }

    /// Pure visibility test
    pub fn can_see(
        &self,
        sight: &dyn LineOfSight,
        position: Vec3,
        forward: Vec3,
        target_position: Vec3,
    ) -> bool {
        let to_target = target_position - position;
        if forward.angle_between_deg(to_target) > self.half_angle_deg {
            return false;
        }

        let eye = position + Vec3::Y * self.eye_height;
        let aim = target_position + Vec3::Y * self.eye_height;
        let ray = Ray::from_points(eye, aim);
        if !ray.is_valid() {
            return false;
        }

        sight.sees(&ray, self.range, self.groups, self.target)
    }

    /// Test visibility and, when visible, refresh the last known state.
    ///
    /// Calling this twice within one tick with the same inputs yields the
    /// same result and the same last known state.
    pub fn sense(
        &mut self,
        sight: &dyn LineOfSight,
        position: Vec3,
        forward: Vec3,
        target_position: Vec3,
    ) -> bool {
        let visible = self.can_see(sight, position, forward, target_position);

        if visible {
            let velocity = self
                .previous_target_position
                .map(|previous| target_position - previous)
                .unwrap_or(Vec3::ZERO);
            self.last_known = Some(LastKnownTargetState {
                position: target_position,
                velocity,
            });
            log::trace!("Target visible at {:?}, velocity {:?}", target_position, velocity);
        }

        visible
    }

    /// Record where the target stood at the end of this tick
    pub fn end_tick(&mut self, target_position: Vec3) {
        self.previous_target_position = Some(target_position);
    }
}
