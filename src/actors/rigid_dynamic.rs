use crate::handles::{MaterialHandle, PhysicsHandle, SceneHandle, ShapeHandle};
use crate::math::{Transform, Vec3};

use super::ForceMode;

/// Movable actor integrated by the solver, or driven by kinematic targets.
pub struct RigidDynamic {
    pub physics: PhysicsHandle,
    pub pose: Transform,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub kinematic: bool,
    /// Pose the next step moves a kinematic actor to; cleared once reached.
    pub kinematic_target: Option<Transform>,

    // Force state accumulated between steps and consumed by the next one.
    // Impulse/velocity-change contributions are velocity deltas already;
    // force/acceleration contributions still need scaling by dt.
    pub(crate) accum_velocity_delta: Vec3,
    pub(crate) accum_acceleration: Vec3,

    pub(crate) shapes: Vec<ShapeHandle>,
    pub(crate) scene: Option<SceneHandle>,
    pub(crate) owned_shapes: Vec<ShapeHandle>,
    pub(crate) owned_materials: Vec<MaterialHandle>,
}

impl RigidDynamic {
    pub fn new(physics: PhysicsHandle, pose: Transform) -> Self {
        Self {
            physics,
            pose,
            linear_velocity: Vec3::zero(),
            angular_velocity: Vec3::zero(),
            mass: 1.0,
            kinematic: false,
            kinematic_target: None,
            accum_velocity_delta: Vec3::zero(),
            accum_acceleration: Vec3::zero(),
            shapes: Vec::new(),
            scene: None,
            owned_shapes: Vec::new(),
            owned_materials: Vec::new(),
        }
    }

    /// Accumulates a force for the next step. Mass must be positive, which
    /// `set_mass` guarantees.
    pub(crate) fn add_force(&mut self, force: Vec3, mode: ForceMode) {
        let inv_mass = 1.0 / self.mass;
        match mode {
            ForceMode::Force => self.accum_acceleration += force * inv_mass,
            ForceMode::Acceleration => self.accum_acceleration += force,
            ForceMode::Impulse => self.accum_velocity_delta += force * inv_mass,
            ForceMode::VelocityChange => self.accum_velocity_delta += force,
        }
    }

    /// Hands the accumulated force state to a step and resets it.
    pub(crate) fn take_accumulated(&mut self) -> (Vec3, Vec3) {
        let out = (self.accum_velocity_delta, self.accum_acceleration);
        self.accum_velocity_delta = Vec3::zero();
        self.accum_acceleration = Vec3::zero();
        out
    }

    pub fn shapes(&self) -> &[ShapeHandle] {
        &self.shapes
    }

    pub fn scene(&self) -> Option<SceneHandle> {
        self.scene
    }
}
