use crate::handles::{MaterialHandle, PhysicsHandle, SceneHandle, ShapeHandle};
use crate::math::Transform;

/// Immovable actor: a fixed pose plus attached shapes.
///
/// The pose never changes after creation; simulation steps ignore statics.
pub struct RigidStatic {
    pub physics: PhysicsHandle,
    pub pose: Transform,
    pub(crate) shapes: Vec<ShapeHandle>,
    pub(crate) scene: Option<SceneHandle>,
    /// Resources deep-copied out of a collection template; released with the
    /// actor.
    pub(crate) owned_shapes: Vec<ShapeHandle>,
    pub(crate) owned_materials: Vec<MaterialHandle>,
}

impl RigidStatic {
    pub fn new(physics: PhysicsHandle, pose: Transform) -> Self {
        Self {
            physics,
            pose,
            shapes: Vec::new(),
            scene: None,
            owned_shapes: Vec::new(),
            owned_materials: Vec::new(),
        }
    }

    pub fn shapes(&self) -> &[ShapeHandle] {
        &self.shapes
    }

    pub fn scene(&self) -> Option<SceneHandle> {
        self.scene
    }
}
