//! Warden AI - Perception-driven pursuit and search
//!
//! Every tick a [`Pursuer`] senses the target (vision cone plus an
//! occlusion ray), reads any alert latched by its [`AgentEar`], then runs
//! one step of its state machine and issues at most one destination update
//! to its navigation agent.
//!
//! # States
//!
//! ```text
//!   Initial ──► Patrolling ──see──► Chasing ──lose──► RunningToLastSeen
//!                   ▲                  ▲                 │ arrive
//!                   │                  └──────see────────┤
//!                   │                                    ▼
//!                Waiting ◄──no candidates / exhausted── Searching
//! ```
//!
//! A tripped suspicion meter sends any state except Chasing straight to
//! RunningToLastSeen with the heard position as destination.
//!
//! # Example
//!
//! ```ignore
//! use warden_ai::prelude::*;
//!
//! let bus = AlertAggregator::new();
//! let agent = SimNavAgent::new(spawn, NavAgentConfig::default());
//! let mut pursuer = Pursuer::new(agent, patrol_points, target_body, PursuitConfig::default())?;
//! bus.subscribe(pursuer.ear());
//!
//! pursuer.tick(dt, &PursuitWorld { nav: &grid, sight: &occlusion, target_position });
//! pursuer.agent_mut().advance(dt);
//! for event in pursuer.drain_events() { /* play audio, end game, ... */ }
//! ```

pub mod alert;
pub mod config;
pub mod error;
pub mod perception;
pub mod pursuit;
pub mod scoring;
pub mod suspicion;

pub mod prelude {
    pub use crate::alert::{attenuate, AgentEar, AlertAggregator, SoundListener};
    pub use crate::config::PursuitConfig;
    pub use crate::error::{AiError, Result};
    pub use crate::perception::{LastKnownTargetState, Perception};
    pub use crate::pursuit::{
        overshoot, PursuitEvent, PursuitState, PursuitWorld, Pursuer, Vocalization,
    };
    pub use crate::scoring::{relevance, select_search_set, sort_nearest_last, Candidate};
    pub use crate::suspicion::SuspicionMeter;
    pub use warden_math::Vec3;
    pub use warden_nav::{NavAgentConfig, NavGrid, NavigationAgent, NavigationPort, SimNavAgent};
    pub use warden_physics::{BodyId, LineOfSight};
}

pub use prelude::*;
