//! Occluder shapes and descriptions

use crate::error::{PhysicsError, Result};
use crate::layers::{CollisionGroups, CollisionLayer};
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};
use warden_math::Vec3;

/// Shape of a sight-blocking collider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OccluderShape {
    /// Sphere with radius
    Sphere { radius: f32 },
    /// Box with half-extents
    Box { half_extents: [f32; 3] },
    /// Capsule aligned along Y axis
    CapsuleY { half_height: f32, radius: f32 },
}

impl OccluderShape {
    /// Create a sphere shape
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Create a box shape from half-extents
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Box {
            half_extents: [hx, hy, hz],
        }
    }

    /// Create a capsule shape (Y-aligned)
    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self::CapsuleY { half_height, radius }
    }

    /// Reject degenerate dimensions
    pub fn validate(&self) -> Result<()> {
        let dims: &[f32] = match self {
            Self::Sphere { radius } => std::slice::from_ref(radius),
            Self::Box { half_extents } => half_extents,
            Self::CapsuleY { radius, .. } => std::slice::from_ref(radius),
        };
        if dims.iter().all(|d| d.is_finite() && *d > 0.0) {
            Ok(())
        } else {
            Err(PhysicsError::InvalidShape(format!("{:?}", self)))
        }
    }

    /// Build a Rapier shared shape
    pub(crate) fn to_rapier(&self) -> rapier::SharedShape {
        match self {
            Self::Sphere { radius } => rapier::SharedShape::ball(*radius),
            Self::Box { half_extents } => {
                rapier::SharedShape::cuboid(half_extents[0], half_extents[1], half_extents[2])
            }
            Self::CapsuleY { half_height, radius } => {
                rapier::SharedShape::capsule_y(half_height.max(0.0), *radius)
            }
        }
    }
}

/// Description for inserting an occluder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccluderDesc {
    /// Collision shape
    pub shape: OccluderShape,
    /// World position of the shape centre
    pub position: Vec3,
    /// Layer the occluder belongs to
    pub layer: CollisionLayer,
}

impl OccluderDesc {
    /// Create a description
    pub fn new(shape: OccluderShape, position: Vec3, layer: CollisionLayer) -> Self {
        Self {
            shape,
            position,
            layer,
        }
    }

    /// Build a Rapier collider tagged with `user_data`
    pub(crate) fn to_rapier_builder(&self, user_data: u128) -> rapier::ColliderBuilder {
        let groups = CollisionGroups::occluder(self.layer);
        rapier::ColliderBuilder::new(self.shape.to_rapier())
            .translation(rapier::Vector::new(
                self.position.x,
                self.position.y,
                self.position.z,
            ))
            .collision_groups(rapier::InteractionGroups::new(
                rapier::Group::from_bits_truncate(groups.memberships),
                rapier::Group::from_bits_truncate(groups.filter),
            ))
            .user_data(user_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_validation() {
        assert!(OccluderShape::cuboid(1.0, 2.0, 0.5).validate().is_ok());
        assert!(OccluderShape::sphere(0.0).validate().is_err());
        assert!(OccluderShape::cuboid(1.0, f32::NAN, 1.0).validate().is_err());
        assert!(OccluderShape::capsule(0.5, 0.3).validate().is_ok());
    }
}
