//! Value types crossing the host boundary.
//!
//! Everything here is passed by value, `repr(C)` with fixed-width `f32`
//! fields so the layout is stable regardless of which side constructs it.
//! No ownership, no failure modes.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

mod geometry;

pub use geometry::Geometry;

/// 3D vector, `f32` components.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs, z: self.z * rhs }
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Unit quaternion rotation, `xyzw` order.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn identity() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }

    pub fn normalized(self) -> Self {
        let len = (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt();
        if len > 1e-6 {
            let inv = 1.0 / len;
            Self { x: self.x * inv, y: self.y * inv, z: self.z * inv, w: self.w * inv }
        } else {
            Self::identity()
        }
    }

    /// Hamilton product `self * rhs`.
    pub fn mul(self, rhs: Quat) -> Quat {
        Quat {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }

    /// First-order integration of an angular velocity over `dt`, renormalized.
    pub fn integrated(self, angular_velocity: Vec3, dt: f32) -> Quat {
        let half = 0.5 * dt;
        let omega = Quat::new(
            angular_velocity.x * half,
            angular_velocity.y * half,
            angular_velocity.z * half,
            0.0,
        );
        let dq = omega.mul(self);
        Quat {
            x: self.x + dq.x,
            y: self.y + dq.y,
            z: self.z + dq.z,
            w: self.w + dq.w,
        }
        .normalized()
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

/// Rigid pose: position plus rotation.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn identity() -> Self {
        Self { position: Vec3::zero(), rotation: Quat::identity() }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self { position, rotation: Quat::identity() }
    }

    pub fn is_finite(self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_zero_position_identity_rotation() {
        let t = Transform::new(Vec3::new(0.0, 0.0, 0.0), Quat::identity());
        assert_eq!(t, Transform::identity());
    }

    #[test]
    fn identity_quat_leaves_rotation_unchanged() {
        let q = Quat::new(0.1, 0.2, 0.3, 0.9).normalized();
        let composed = Quat::identity().mul(q);
        assert!((composed.x - q.x).abs() < 1e-6);
        assert!((composed.y - q.y).abs() < 1e-6);
        assert!((composed.z - q.z).abs() < 1e-6);
        assert!((composed.w - q.w).abs() < 1e-6);
    }

    #[test]
    fn integrating_zero_angular_velocity_is_a_noop() {
        let q = Quat::new(0.0, 0.7071, 0.0, 0.7071).normalized();
        let out = q.integrated(Vec3::zero(), 1.0 / 60.0);
        assert!((out.y - q.y).abs() < 1e-5);
        assert!((out.w - q.w).abs() < 1e-5);
    }

    #[test]
    fn vec3_ops() {
        let v = Vec3::new(1.0, 2.0, 3.0) + Vec3::new(1.0, 1.0, 1.0) * 2.0;
        assert_eq!(v, Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(Vec3::new(3.0, 4.0, 0.0).length(), 5.0);
    }
}
