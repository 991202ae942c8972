//! Step integration.
//!
//! Contract-level dynamics only: accumulated forces and gravity integrate
//! into velocity and pose, kinematic actors move to their pending target.
//! Contact generation and collision response live below this boundary.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::math::{Transform, Vec3};

use super::{BodyInput, BodyOutput};

pub(crate) fn integrate(inputs: &[BodyInput], gravity: Vec3, dt: f32) -> Vec<BodyOutput> {
    #[cfg(feature = "parallel")]
    {
        inputs.par_iter().map(|b| integrate_body(b, gravity, dt)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        inputs.iter().map(|b| integrate_body(b, gravity, dt)).collect()
    }
}

fn integrate_body(body: &BodyInput, gravity: Vec3, dt: f32) -> BodyOutput {
    if body.kinematic {
        // Kinematic actors ignore forces and gravity; they arrive at the
        // target by the end of the step.
        let pose = body.kinematic_target.unwrap_or(body.pose);
        return BodyOutput {
            handle: body.handle,
            pose,
            linear_velocity: body.linear_velocity,
            angular_velocity: body.angular_velocity,
        };
    }

    let linear_velocity =
        body.linear_velocity + body.velocity_delta + (body.acceleration + gravity) * dt;
    let position = body.pose.position + linear_velocity * dt;
    let rotation = body.pose.rotation.integrated(body.angular_velocity, dt);

    BodyOutput {
        handle: body.handle,
        pose: Transform::new(position, rotation),
        linear_velocity,
        angular_velocity: body.angular_velocity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handles::RigidDynamicHandle;
    use crate::math::Quat;

    fn input(pose: Transform) -> BodyInput {
        BodyInput {
            handle: RigidDynamicHandle::from_raw(0),
            pose,
            linear_velocity: Vec3::zero(),
            angular_velocity: Vec3::zero(),
            kinematic: false,
            kinematic_target: None,
            velocity_delta: Vec3::zero(),
            acceleration: Vec3::zero(),
        }
    }

    #[test]
    fn gravity_pulls_a_resting_body_down() {
        let dt = 1.0 / 60.0;
        let gravity = Vec3::new(0.0, -9.81, 0.0);
        let start = Transform::from_position(Vec3::new(0.0, 10.0, 0.0));

        let out = integrate(&[input(start)], gravity, dt);
        assert_eq!(out.len(), 1);
        let y = out[0].pose.position.y;
        assert!(y < 10.0);
        // One free-fall step from rest: dy = g*dt*dt.
        assert!(y > 10.0 - 9.81 * dt * dt * 1.5);
        assert!(out[0].linear_velocity.y < 0.0);
    }

    #[test]
    fn kinematic_body_moves_to_target_and_ignores_gravity() {
        let mut b = input(Transform::identity());
        b.kinematic = true;
        let target = Transform::from_position(Vec3::new(5.0, 5.0, 5.0));
        b.kinematic_target = Some(target);

        let out = integrate(&[b], Vec3::new(0.0, -9.81, 0.0), 1.0 / 60.0);
        assert_eq!(out[0].pose, target);
        assert_eq!(out[0].linear_velocity, Vec3::zero());
    }

    #[test]
    fn kinematic_body_without_target_holds_pose() {
        let mut b = input(Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));
        b.kinematic = true;
        let out = integrate(&[b], Vec3::new(0.0, -9.81, 0.0), 1.0 / 60.0);
        assert_eq!(out[0].pose.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn velocity_delta_applies_before_position_update() {
        let mut b = input(Transform::identity());
        b.velocity_delta = Vec3::new(60.0, 0.0, 0.0);
        let out = integrate(&[b], Vec3::zero(), 1.0 / 60.0);
        assert!((out[0].pose.position.x - 1.0).abs() < 1e-5);
        assert_eq!(out[0].linear_velocity.x, 60.0);
    }

    #[test]
    fn angular_velocity_spins_the_rotation() {
        let mut b = input(Transform::identity());
        b.angular_velocity = Vec3::new(0.0, 1.0, 0.0);
        let out = integrate(&[b], Vec3::zero(), 0.1);
        assert_ne!(out[0].pose.rotation, Quat::identity());
        // Still a unit quaternion after integration.
        let q = out[0].pose.rotation;
        let norm = (q.x * q.x + q.y * q.y + q.z * q.z + q.w * q.w).sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
