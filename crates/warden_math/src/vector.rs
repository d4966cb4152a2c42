//! 3D vector used for positions, headings and velocities

use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// 3D vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);
    pub const NEG_X: Self = Self::new(-1.0, 0.0, 0.0);
    pub const NEG_Z: Self = Self::new(0.0, 0.0, -1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Point on the ground plane
    #[inline]
    pub const fn ground(x: f32, z: f32) -> Self {
        Self::new(x, 0.0, z)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > 0.0 { self / len } else { Self::ZERO }
    }

    #[inline]
    pub fn normalize_or_zero(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > 1e-10 {
            self / len_sq.sqrt()
        } else {
            Self::ZERO
        }
    }

    /// Scale down to `max` length if longer, otherwise return unchanged.
    #[inline]
    pub fn clamp_length(self, max: f32) -> Self {
        let len_sq = self.length_squared();
        if len_sq > max * max {
            self * (max / len_sq.sqrt())
        } else {
            self
        }
    }

    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Drop the vertical component
    #[inline]
    pub fn horizontal(self) -> Self {
        Self::new(self.x, 0.0, self.z)
    }

    /// Unsigned angle to `other` in degrees, in `[0, 180]`.
    ///
    /// Returns 0 when either vector is degenerate.
    pub fn angle_between_deg(self, other: Self) -> f32 {
        let denom = (self.length_squared() * other.length_squared()).sqrt();
        if denom < 1e-15 {
            return 0.0;
        }
        let cos = (self.dot(other) / denom).clamp(-1.0, 1.0);
        cos.acos() * crate::consts::RAD_TO_DEG
    }

    /// Heading around +Y in radians, 0 along +Z
    #[inline]
    pub fn yaw(self) -> f32 {
        self.x.atan2(self.z)
    }

    /// Unit horizontal heading for a yaw in radians
    #[inline]
    pub fn from_yaw(yaw: f32) -> Self {
        Self::new(yaw.sin(), 0.0, yaw.cos())
    }

    /// Rotate around +Y by `angle` radians
    #[inline]
    pub fn rotate_y(self, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(self.x * c + self.z * s, self.y, -self.x * s + self.z * c)
    }

    /// Turn this horizontal heading toward `target` by at most `max_radians`.
    ///
    /// A degenerate target leaves the heading unchanged.
    pub fn rotate_towards(self, target: Self, max_radians: f32) -> Self {
        let target = target.horizontal();
        if target.length_squared() < 1e-10 {
            return self;
        }
        let from = self.yaw();
        let mut delta = target.yaw() - from;
        while delta > crate::consts::PI {
            delta -= crate::consts::TAU;
        }
        while delta < -crate::consts::PI {
            delta += crate::consts::TAU;
        }
        let step = delta.clamp(-max_radians.abs(), max_radians.abs());
        Self::from_yaw(from + step)
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline] fn add(self, rhs: Self) -> Self { Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z) }
}
impl Sub for Vec3 {
    type Output = Self;
    #[inline] fn sub(self, rhs: Self) -> Self { Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z) }
}
impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline] fn mul(self, rhs: f32) -> Self { Self::new(self.x * rhs, self.y * rhs, self.z * rhs) }
}
impl Mul<Vec3> for f32 {
    type Output = Vec3;
    #[inline] fn mul(self, rhs: Vec3) -> Vec3 { Vec3::new(self * rhs.x, self * rhs.y, self * rhs.z) }
}
impl Div<f32> for Vec3 {
    type Output = Self;
    #[inline] fn div(self, rhs: f32) -> Self { Self::new(self.x / rhs, self.y / rhs, self.z / rhs) }
}
impl Neg for Vec3 {
    type Output = Self;
    #[inline] fn neg(self) -> Self { Self::new(-self.x, -self.y, -self.z) }
}
impl AddAssign for Vec3 {
    #[inline] fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}
impl SubAssign for Vec3 {
    #[inline] fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
}
impl MulAssign<f32> for Vec3 {
    #[inline] fn mul_assign(&mut self, rhs: f32) { *self = *self * rhs; }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_vec3_normalize() {
        let v = Vec3::new(3.0, 0.0, 4.0);
        let n = v.normalize();
        assert_relative_eq!(n.length(), 1.0, epsilon = 1e-6);
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn test_clamp_length() {
        let v = Vec3::new(300.0, 0.0, 400.0).clamp_length(1.0);
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(v.x, 0.6, epsilon = 1e-6);

        let short = Vec3::new(0.1, 0.0, 0.0);
        assert_eq!(short.clamp_length(1.0), short);
    }

    #[test]
    fn test_angle_between() {
        assert_relative_eq!(Vec3::X.angle_between_deg(Vec3::Z), 90.0, epsilon = 1e-4);
        assert_relative_eq!(Vec3::X.angle_between_deg(Vec3::NEG_X), 180.0, epsilon = 1e-4);
        assert_relative_eq!(Vec3::X.angle_between_deg(Vec3::X * 5.0), 0.0, epsilon = 1e-3);
        assert_eq!(Vec3::X.angle_between_deg(Vec3::ZERO), 0.0);
    }

    #[test]
    fn test_yaw_round_trip() {
        let heading = Vec3::from_yaw(Vec3::X.yaw());
        assert_relative_eq!(heading.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(heading.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotate_towards_is_rate_limited() {
        let heading = Vec3::Z;
        let step = heading.rotate_towards(Vec3::X, crate::radians(45.0));
        assert_relative_eq!(step.angle_between_deg(Vec3::Z), 45.0, epsilon = 1e-3);

        let done = heading.rotate_towards(Vec3::X, crate::radians(180.0));
        assert_relative_eq!(done.angle_between_deg(Vec3::X), 0.0, epsilon = 1e-2);
    }

    #[test]
    fn test_rotate_towards_degenerate_target() {
        let heading = Vec3::Z;
        assert_eq!(heading.rotate_towards(Vec3::Y, 1.0), heading);
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        let v = Vec3::Z.rotate_y(crate::radians(90.0));
        assert_relative_eq!(v.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(v.z, 0.0, epsilon = 1e-6);
    }
}
