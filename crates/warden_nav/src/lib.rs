//! Warden Nav - Navigation queries and steering agents
//!
//! The pursuit core never computes paths itself. It talks to two ports:
//!
//! - [`NavigationPort`]: shared, read-only mesh queries (paths, lengths,
//!   straight-line walkability).
//! - [`NavigationAgent`]: the per-agent steering handle (destination,
//!   speed, arrival, next steering point).
//!
//! [`NavGrid`] and [`SimNavAgent`] are reference implementations backed by
//! a walkable-cell grid, used by the simulation binary and the tests.
//!
//! # Example
//!
//! ```ignore
//! use warden_nav::prelude::*;
//!
//! let grid = NavGrid::from_ascii("....\n.##.\n....", 1.0)?;
//! let mut agent = SimNavAgent::new(Vec3::ground(0.5, 0.5), NavAgentConfig::default());
//! agent.set_speed(2.0);
//! agent.set_destination(&grid, Vec3::ground(3.5, 2.5));
//! agent.advance(0.1);
//! ```

pub mod agent;
pub mod error;
pub mod grid;
pub mod path;
pub mod port;

pub mod prelude {
    pub use crate::agent::{NavAgentConfig, SimNavAgent};
    pub use crate::error::{NavError, Result};
    pub use crate::grid::NavGrid;
    pub use crate::path::NavPath;
    pub use crate::port::{NavigationAgent, NavigationPort};
    pub use warden_math::Vec3;
}

pub use prelude::*;
