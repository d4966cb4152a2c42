//! Suspicion accumulator fed by heard sounds

use crate::config::PursuitConfig;
use serde::{Deserialize, Serialize};

/// Decaying scalar in `[0, threshold]`.
///
/// Reaching the threshold trips the meter once. A tripped meter stays
/// pinned at the threshold, ignores further input and does not decay
/// until [`SuspicionMeter::reset`] is called.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuspicionMeter {
    level: f32,
    threshold: f32,
    sensitivity: f32,
    decay: f32,
    tripped: bool,
}

impl SuspicionMeter {
    /// Create an empty meter
    pub fn new(threshold: f32, sensitivity: f32, decay: f32) -> Self {
        Self {
            level: 0.0,
            threshold: threshold.max(f32::EPSILON),
            sensitivity: sensitivity.max(0.0),
            decay: decay.max(0.0),
            tripped: false,
        }
    }

    /// Create a meter tuned by `config`
    pub fn from_config(config: &PursuitConfig) -> Self {
        Self::new(
            config.suspicion_threshold,
            config.suspicion_sensitivity,
            config.suspicion_decay,
        )
    }

    /// Current level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Trip level
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Whether the threshold was crossed since the last reset
    pub fn is_tripped(&self) -> bool {
        self.tripped
    }

    /// Decay over `delta_time` seconds
    pub fn tick(&mut self, delta_time: f32) {
        if self.tripped {
            return;
        }
        self.level = (self.level - self.decay * delta_time.max(0.0)).max(0.0);
    }

    /// Add a heard volume; returns `true` only on the call that trips the meter
    pub fn on_listen(&mut self, volume: f32) -> bool {
        if self.tripped {
            return false;
        }

        self.level = (self.level + volume * self.sensitivity).max(0.0);
        if self.level >= self.threshold {
            self.level = self.threshold;
            self.tripped = true;
            return true;
        }
        false
    }

    /// Back to zero and untripped
    pub fn reset(&mut self) {
        self.level = 0.0;
        self.tripped = false;
    }
}

impl Default for SuspicionMeter {
    fn default() -> Self {
        Self::from_config(&PursuitConfig::default())
    }
}
