//! Error types for navigation setup

use thiserror::Error;

/// Navigation construction errors
#[derive(Debug, Error, PartialEq)]
pub enum NavError {
    /// Map has no rows or no columns
    #[error("Navigation grid is empty")]
    EmptyGrid,

    /// A map row has a different width than the first row
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Cell size must be a positive finite number
    #[error("Invalid cell size: {0}")]
    InvalidCellSize(f32),

    /// Cell coordinates outside the grid
    #[error("Unknown cell ({0}, {1})")]
    UnknownCell(usize, usize),
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavError>;
