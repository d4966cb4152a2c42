//! Occlusion world - colliders that block or receive sight rays

use crate::collider::{OccluderDesc, OccluderShape};
use crate::error::{PhysicsError, Result};
use crate::layers::{CollisionGroups, CollisionLayer};
use crate::query::{BodyId, LineOfSight, SightHit};
use rapier3d::prelude as rapier;
use std::collections::HashMap;
use warden_math::{Ray, Vec3};

/// Collider set answering first-hit sight queries.
///
/// No dynamics are simulated. Bodies are moved explicitly by the host and
/// the query pipeline is refreshed on every mutation, so queries never see
/// stale positions.
pub struct OcclusionWorld {
    /// Always empty; required by the query API
    bodies: rapier::RigidBodySet,

    /// Collider set
    colliders: rapier::ColliderSet,

    /// Query pipeline
    query_pipeline: rapier::QueryPipeline,

    /// Body identity to collider handle
    handles: HashMap<BodyId, rapier::ColliderHandle>,

    /// Next body identity to hand out
    next_id: u64,
}

impl OcclusionWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self {
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            query_pipeline: rapier::QueryPipeline::new(),
            handles: HashMap::new(),
            next_id: 1,
        }
    }

    /// Insert an occluder and return its identity
    pub fn add_body(&mut self, desc: OccluderDesc) -> Result<BodyId> {
        desc.shape.validate()?;

        let id = BodyId(self.next_id);
        self.next_id += 1;

        let handle = self.colliders.insert(desc.to_rapier_builder(id.0 as u128));
        self.handles.insert(id, handle);
        self.query_pipeline.update(&self.colliders);

        log::trace!("Added occluder {:?} on layer {:?} at {:?}", id, desc.layer, desc.position);
        Ok(id)
    }

    /// Insert a static wall box on the environment layer
    pub fn add_static_box(&mut self, center: Vec3, half_extents: [f32; 3]) -> Result<BodyId> {
        self.add_body(OccluderDesc::new(
            OccluderShape::Box { half_extents },
            center,
            CollisionLayer::ENVIRONMENT,
        ))
    }

    /// Remove an occluder
    pub fn remove_body(&mut self, id: BodyId) -> Result<()> {
        let handle = self.handles.remove(&id).ok_or(PhysicsError::BodyNotFound(id))?;
        let mut islands = rapier::IslandManager::new();
        self.colliders.remove(handle, &mut islands, &mut self.bodies, false);
        self.query_pipeline.update(&self.colliders);
        Ok(())
    }

    /// Move an occluder
    pub fn set_body_position(&mut self, id: BodyId, position: Vec3) -> Result<()> {
        let handle = *self.handles.get(&id).ok_or(PhysicsError::BodyNotFound(id))?;
        let collider = self
            .colliders
            .get_mut(handle)
            .ok_or(PhysicsError::BodyNotFound(id))?;
        collider.set_translation(rapier::Vector::new(position.x, position.y, position.z));
        self.query_pipeline.update(&self.colliders);
        Ok(())
    }

    /// Current position of an occluder
    pub fn body_position(&self, id: BodyId) -> Result<Vec3> {
        self.handles
            .get(&id)
            .and_then(|handle| self.colliders.get(*handle))
            .map(|collider| {
                let t = collider.translation();
                Vec3::new(t.x, t.y, t.z)
            })
            .ok_or(PhysicsError::BodyNotFound(id))
    }

    /// Number of occluders
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the world has no occluders
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Default for OcclusionWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl LineOfSight for OcclusionWorld {
    fn first_hit(&self, ray: &Ray, max_distance: f32, groups: CollisionGroups) -> Option<SightHit> {
        if !ray.is_valid() {
            return None;
        }

        let rapier_ray = rapier::Ray::new(
            rapier::Point::new(ray.origin.x, ray.origin.y, ray.origin.z),
            rapier::Vector::new(ray.direction.x, ray.direction.y, ray.direction.z),
        );

        let filter = rapier::QueryFilter::new()
            .groups(rapier::InteractionGroups::new(
                rapier::Group::from_bits_truncate(groups.memberships),
                rapier::Group::from_bits_truncate(groups.filter),
            ))
            .exclude_sensors();

        let max_toi = max_distance.min(f32::MAX);

        self.query_pipeline
            .cast_ray(&self.bodies, &self.colliders, &rapier_ray, max_toi, true, filter)
            .and_then(|(handle, toi)| {
                let collider = self.colliders.get(handle)?;
                let point = rapier_ray.point_at(toi);
                Some(SightHit {
                    body: BodyId(collider.user_data as u64),
                    point: Vec3::new(point.x, point.y, point.z),
                    distance: toi,
                })
            })
    }
}
