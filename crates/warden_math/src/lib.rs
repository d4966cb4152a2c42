//! # warden_math - Vector math for agents on a navigation plane
//!
//! Small value types used by navigation, perception and scoring. Agents
//! live on the XZ plane with Y up; yaw is measured around +Y with 0
//! pointing down +Z.

pub mod ray;
pub mod vector;

pub use ray::*;
pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

/// Clamp value between min and max
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min { min }
    else if value > max { max }
    else { value }
}

/// Linearly remap `value` from `[src_min, src_max]` to `[dst_min, dst_max]`
/// without clamping.
#[inline]
pub fn map_unclamped(value: f32, src_min: f32, src_max: f32, dst_min: f32, dst_max: f32) -> f32 {
    (value - src_min) / (src_max - src_min) * (dst_max - dst_min) + dst_min
}

/// Linearly remap `value` from `[src_min, src_max]` to `[dst_min, dst_max]`,
/// clamping the input to the source range first.
///
/// Infinite inputs clamp to the nearest source bound, so an unreachable
/// distance mapped over `[0, r] -> [1, 0]` yields exactly `0`.
#[inline]
pub fn map_clamped(value: f32, src_min: f32, src_max: f32, dst_min: f32, dst_max: f32) -> f32 {
    let v = clamp(value, src_min.min(src_max), src_min.max(src_max));
    map_unclamped(v, src_min, src_max, dst_min, dst_max)
}

pub mod prelude {
    pub use crate::ray::Ray;
    pub use crate::vector::Vec3;
    pub use crate::{clamp, degrees, map_clamped, map_unclamped, radians};
}
