//! Error types for pursuer construction

use thiserror::Error;

/// Errors raised while building a pursuer.
///
/// Per-tick evaluation never fails; only construction is validated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AiError {
    #[error("Invalid pursuit config: {0}")]
    InvalidConfig(String),

    #[error("Pursuer needs at least one patrol point")]
    NoPatrolPoints,
}

/// Result type for AI operations
pub type Result<T> = std::result::Result<T, AiError>;
