//! Error types for the occlusion world

use crate::query::BodyId;
use thiserror::Error;

/// Occlusion world errors
#[derive(Debug, Error, PartialEq)]
pub enum PhysicsError {
    /// Body not found
    #[error("Body not found: {0:?}")]
    BodyNotFound(BodyId),

    /// Shape has a non-positive or non-finite dimension
    #[error("Invalid occluder shape: {0}")]
    InvalidShape(String),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
