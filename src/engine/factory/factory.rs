//! Materials and shapes.
//!
//! Both are created against a physics instance and must be released after
//! everything that references them: shapes keep their material alive, actors
//! keep their shapes alive.

use crate::domain::{Material, Shape};
use crate::error::{EngineError, EngineResult};
use crate::handles::{MaterialHandle, PhysicsHandle, ShapeHandle};
use crate::math::Geometry;

use super::EngineCore;

pub(super) fn create_material(
    core: &mut EngineCore,
    physics: PhysicsHandle,
    static_friction: f32,
    dynamic_friction: f32,
    restitution: f32,
) -> EngineResult<MaterialHandle> {
    core.physics_ref(physics)?;
    let material = Material::new(physics, static_friction, dynamic_friction, restitution)?;
    Ok(MaterialHandle(core.materials.insert(material)))
}

pub(super) fn release_material(core: &mut EngineCore, handle: MaterialHandle) -> EngineResult<()> {
    if !core.materials.contains(handle.0) {
        return Err(EngineError::StaleHandle { kind: "material" });
    }
    let dependents = core
        .shapes
        .iter()
        .filter(|(_, s)| s.material == handle)
        .count();
    if dependents > 0 {
        return Err(EngineError::DependentsAlive {
            kind: "material",
            dependents,
        });
    }
    core.materials.remove(handle.0);
    Ok(())
}

pub(super) fn create_shape(
    core: &mut EngineCore,
    physics: PhysicsHandle,
    geometry: Geometry,
    material: MaterialHandle,
    is_exclusive: bool,
) -> EngineResult<ShapeHandle> {
    core.physics_ref(physics)?;
    let bound = core
        .materials
        .get(material.0)
        .ok_or(EngineError::StaleHandle { kind: "material" })?;
    if bound.physics != physics {
        return Err(EngineError::Validation(
            "material belongs to a different physics instance".to_string(),
        ));
    }
    let shape = Shape::new(physics, geometry, material, is_exclusive)?;
    Ok(ShapeHandle(core.shapes.insert(shape)))
}

pub(super) fn release_shape(core: &mut EngineCore, handle: ShapeHandle) -> EngineResult<()> {
    if !core.shapes.contains(handle.0) {
        return Err(EngineError::StaleHandle { kind: "shape" });
    }
    let dependents = core.shape_attachments(handle);
    if dependents > 0 {
        return Err(EngineError::DependentsAlive {
            kind: "shape",
            dependents,
        });
    }
    core.shapes.remove(handle.0);
    Ok(())
}
