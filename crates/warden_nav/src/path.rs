//! Paths returned by navigation queries

use serde::{Deserialize, Serialize};
use warden_math::Vec3;

/// An ordered sequence of path corners, start first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavPath {
    /// Corners along the path
    pub corners: Vec<Vec3>,
    /// Index of the corner currently being steered toward
    pub current_index: usize,
}

impl NavPath {
    /// Create a path from its corners
    pub fn new(corners: Vec<Vec3>) -> Self {
        Self {
            corners,
            current_index: 0,
        }
    }

    /// Check if path is empty
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// Check if every corner has been passed
    pub fn is_complete(&self) -> bool {
        self.current_index >= self.corners.len()
    }

    /// Get current corner
    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.corners.get(self.current_index).copied()
    }

    /// Get final corner
    pub fn destination(&self) -> Option<Vec3> {
        self.corners.last().copied()
    }

    /// Advance to next corner
    pub fn advance(&mut self) {
        if self.current_index < self.corners.len() {
            self.current_index += 1;
        }
    }

    /// Sum of consecutive corner distances
    pub fn length(&self) -> f32 {
        self.corners
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }

    /// Direction of the first committed leg (second corner minus first).
    ///
    /// Zero for paths with fewer than two corners.
    pub fn initial_direction(&self) -> Vec3 {
        match self.corners.as_slice() {
            [first, second, ..] => *second - *first,
            _ => Vec3::ZERO,
        }
    }

    /// Distance left from the current corner to the end
    pub fn remaining_distance(&self) -> f32 {
        if self.is_complete() {
            return 0.0;
        }
        self.corners[self.current_index..]
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}
