//! Sight layers and query masks

use serde::{Deserialize, Serialize};

/// Layer an occluder belongs to, one bit of a 32-bit mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    /// The pursued target
    pub const TARGET: Self = Self(1);
    /// Walls and other static geometry
    pub const ENVIRONMENT: Self = Self(5);
    /// Movable props that block sight
    pub const PROPS: Self = Self(6);

    pub fn as_mask(&self) -> u32 {
        1 << (self.0 & 31)
    }
}

/// Membership and filter bits, matched the way Rapier matches interaction
/// groups: two groups interact when each one's membership passes the
/// other's filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionGroups {
    pub memberships: u32,
    pub filter: u32,
}

impl CollisionGroups {
    /// Sees every layer
    pub const ALL: Self = Self {
        memberships: u32::MAX,
        filter: u32::MAX,
    };

    pub fn new(memberships: u32, filter: u32) -> Self {
        Self { memberships, filter }
    }

    /// Groups of an occluder on `layer`, visible to any query
    pub fn occluder(layer: CollisionLayer) -> Self {
        Self::new(layer.as_mask(), u32::MAX)
    }

    /// Query mask that only sees the given layers
    pub fn seeing(layers: &[CollisionLayer]) -> Self {
        Self::new(u32::MAX, layers.iter().fold(0, |acc, l| acc | l.as_mask()))
    }

    /// Whether a query with these groups hits an occluder with `other`
    pub fn can_see(&self, other: &CollisionGroups) -> bool {
        (self.memberships & other.filter) != 0 && (other.memberships & self.filter) != 0
    }
}

impl Default for CollisionGroups {
    fn default() -> Self {
        Self::ALL
    }
}
