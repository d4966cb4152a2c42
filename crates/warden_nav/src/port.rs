//! Navigation ports consumed by the pursuit core

use crate::path::NavPath;
use warden_math::Vec3;

/// Shared, read-only navigation mesh queries.
///
/// Implementations must be side-effect free; the same port is queried by
/// every agent and by the alert bus.
pub trait NavigationPort {
    /// Compute a traversable route, or `None` when no route exists.
    fn find_path(&self, from: Vec3, to: Vec3) -> Option<NavPath>;

    /// Walk the straight segment `from -> to` on the mesh.
    ///
    /// Returns the last traversable point before the first boundary, or
    /// `None` when the whole segment is traversable.
    fn raycast(&self, from: Vec3, to: Vec3) -> Option<Vec3>;

    /// Path length between two points, `None` when unreachable
    fn path_length(&self, from: Vec3, to: Vec3) -> Option<f32> {
        self.find_path(from, to).map(|path| path.length())
    }
}

/// Per-agent steering handle.
pub trait NavigationAgent {
    /// Current agent position
    fn position(&self) -> Vec3;

    /// Active destination, if any
    fn destination(&self) -> Option<Vec3>;

    /// Request a new destination.
    ///
    /// Returns `false` without touching the active destination when no
    /// path exists.
    fn set_destination(&mut self, nav: &dyn NavigationPort, destination: Vec3) -> bool;

    /// Commanded movement speed
    fn speed(&self) -> f32;

    /// Set the commanded movement speed
    fn set_speed(&mut self, speed: f32);

    /// Whether the agent is within its arrival tolerance of the destination
    fn has_reached_destination(&self) -> bool;

    /// Horizontal distance within which a point counts as reached
    fn reach_radius(&self) -> f32;

    /// Immediate next waypoint the agent is steering toward
    fn steering_target(&self) -> Vec3;
}
