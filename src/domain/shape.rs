use crate::error::EngineResult;
use crate::handles::{MaterialHandle, PhysicsHandle};
use crate::math::Geometry;

/// Collision geometry bound to a material.
///
/// An exclusive shape belongs to at most one actor; a shared shape may be
/// attached to many actors and must outlive all of them.
#[derive(Clone, Copy, Debug)]
pub struct Shape {
    pub physics: PhysicsHandle,
    pub geometry: Geometry,
    pub material: MaterialHandle,
    pub exclusive: bool,
}

impl Shape {
    pub fn new(
        physics: PhysicsHandle,
        geometry: Geometry,
        material: MaterialHandle,
        exclusive: bool,
    ) -> EngineResult<Self> {
        geometry.validate()?;
        Ok(Self {
            physics,
            geometry,
            material,
            exclusive,
        })
    }
}
