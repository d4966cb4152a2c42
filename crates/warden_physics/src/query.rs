//! Line-of-sight queries

use crate::layers::CollisionGroups;
use serde::{Deserialize, Serialize};
use warden_math::{Ray, Vec3};

/// Identity of a body that can be hit by a sight ray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u64);

/// First solid surface along a sight ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SightHit {
    /// Body that was hit
    pub body: BodyId,
    /// Hit point in world space
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

/// Anything that can answer first-hit ray queries.
pub trait LineOfSight {
    /// Cast `ray` up to `max_distance` against solid bodies whose layers
    /// pass `groups`, returning the nearest hit.
    fn first_hit(&self, ray: &Ray, max_distance: f32, groups: CollisionGroups) -> Option<SightHit>;

    /// Whether the first hit along `ray` is `body`
    fn sees(&self, ray: &Ray, max_distance: f32, groups: CollisionGroups, body: BodyId) -> bool {
        self.first_hit(ray, max_distance, groups)
            .map(|hit| hit.body == body)
            .unwrap_or(false)
    }
}
