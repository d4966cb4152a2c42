//! Warden Physics - Line of sight over Rapier 3D
//!
//! Perception only needs one question answered: "casting a ray from here,
//! what is the first solid thing it hits?". This crate defines that
//! question as the [`LineOfSight`] trait and answers it with
//! [`OcclusionWorld`], a static/kinematic Rapier collider set.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────┐
//! │            OcclusionWorld             │
//! │  ┌─────────────┐  ┌────────────────┐  │
//! │  │ ColliderSet │  │ QueryPipeline  │  │
//! │  └─────────────┘  └────────────────┘  │
//! └───────────────────────────────────────┘
//!                    │ first_hit(ray, range, groups)
//!                    ▼
//!              ┌──────────┐
//!              │ SightHit │  body id, point, distance
//!              └──────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use warden_physics::prelude::*;
//!
//! let mut world = OcclusionWorld::new();
//! world.add_static_box(Vec3::new(5.0, 1.5, 0.0), [0.5, 1.5, 5.0])?;
//! let target = world.add_body(OccluderDesc::new(
//!     OccluderShape::capsule(0.6, 0.3),
//!     Vec3::new(10.0, 1.0, 0.0),
//!     CollisionLayer::TARGET,
//! ))?;
//!
//! let ray = Ray::from_points(Vec3::new(0.0, 1.6, 0.0), Vec3::new(10.0, 1.6, 0.0));
//! let hit = world.first_hit(&ray, 50.0, CollisionGroups::ALL);
//! assert_ne!(hit.map(|h| h.body), Some(target));
//! ```

pub mod collider;
pub mod error;
pub mod layers;
pub mod query;
pub mod world;

pub mod prelude {
    //! Common imports for line-of-sight functionality
    pub use crate::collider::{OccluderDesc, OccluderShape};
    pub use crate::error::{PhysicsError, Result};
    pub use crate::layers::{CollisionGroups, CollisionLayer};
    pub use crate::query::{BodyId, LineOfSight, SightHit};
    pub use crate::world::OcclusionWorld;
    pub use warden_math::{Ray, Vec3};
}

pub use prelude::*;
