//! Actor creation, attachment and per-actor state access.
//!
//! Every read or write of a dynamic actor goes through the mid-step guard:
//! while the owning scene has a step in flight the actor's state is torn
//! between snapshot and result, so access is rejected outright rather than
//! answering with stale values.

use crate::actors::{ForceMode, RigidDynamic, RigidStatic};
use crate::error::{EngineError, EngineResult};
use crate::handles::{PhysicsHandle, RigidDynamicHandle, RigidStaticHandle, ShapeHandle};
use crate::math::{Transform, Vec3};
use crate::scene::Scene;

use super::{stale, EngineCore};

pub(super) fn create_rigid_static(
    core: &mut EngineCore,
    physics: PhysicsHandle,
    pose: Transform,
) -> EngineResult<RigidStaticHandle> {
    core.physics_ref(physics)?;
    ensure_finite_pose(pose)?;
    Ok(RigidStaticHandle(
        core.statics.insert(RigidStatic::new(physics, pose)),
    ))
}

pub(super) fn create_rigid_dynamic(
    core: &mut EngineCore,
    physics: PhysicsHandle,
    pose: Transform,
) -> EngineResult<RigidDynamicHandle> {
    core.physics_ref(physics)?;
    ensure_finite_pose(pose)?;
    Ok(RigidDynamicHandle(
        core.dynamics.insert(RigidDynamic::new(physics, pose)),
    ))
}

pub(super) fn release_rigid_static(
    core: &mut EngineCore,
    handle: RigidStaticHandle,
) -> EngineResult<()> {
    let (scene, owned_shapes, owned_materials) = {
        let actor = core.statics.get(handle.0).ok_or(stale("rigid static"))?;
        (
            actor.scene,
            actor.owned_shapes.clone(),
            actor.owned_materials.clone(),
        )
    };
    if let Some(scene_handle) = scene {
        let scene = core.scenes.get_mut(scene_handle.0).ok_or(stale("scene"))?;
        if scene.is_simulating() {
            return Err(EngineError::ProtocolViolation {
                op: "release actor",
                reason: "owning scene is simulating",
            });
        }
        scene.statics.retain(|&s| s != handle);
    }
    core.statics.remove(handle.0);
    release_owned(core, &owned_shapes, &owned_materials);
    Ok(())
}

pub(super) fn release_rigid_dynamic(
    core: &mut EngineCore,
    handle: RigidDynamicHandle,
) -> EngineResult<()> {
    let (scene, owned_shapes, owned_materials) = {
        let actor = core.dynamics.get(handle.0).ok_or(stale("rigid dynamic"))?;
        (
            actor.scene,
            actor.owned_shapes.clone(),
            actor.owned_materials.clone(),
        )
    };
    if let Some(scene_handle) = scene {
        let scene = core.scenes.get_mut(scene_handle.0).ok_or(stale("scene"))?;
        if scene.is_simulating() {
            return Err(EngineError::ProtocolViolation {
                op: "release actor",
                reason: "owning scene is simulating",
            });
        }
        scene.dynamics.retain(|&d| d != handle);
    }
    core.dynamics.remove(handle.0);
    release_owned(core, &owned_shapes, &owned_materials);
    Ok(())
}

/// Cascade for collection-instantiated actors: their deep-copied shapes and
/// materials have no other owner.
fn release_owned(core: &mut EngineCore, shapes: &[ShapeHandle], materials: &[crate::handles::MaterialHandle]) {
    for &shape in shapes {
        core.shapes.remove(shape.0);
    }
    for &material in materials {
        core.materials.remove(material.0);
    }
}

pub(super) fn attach_shape_static(
    core: &mut EngineCore,
    actor: RigidStaticHandle,
    shape: ShapeHandle,
) -> EngineResult<()> {
    let (physics, already_attached, in_simulating_scene) = {
        let a = core.statics.get(actor.0).ok_or(stale("rigid static"))?;
        (
            a.physics,
            a.shapes.contains(&shape),
            scene_simulating(core, a.scene),
        )
    };
    if in_simulating_scene {
        return Err(EngineError::ProtocolViolation {
            op: "attach shape",
            reason: "owning scene is simulating",
        });
    }
    validate_attachment(core, physics, shape, already_attached)?;
    core.statics
        .get_mut(actor.0)
        .ok_or(stale("rigid static"))?
        .shapes
        .push(shape);
    Ok(())
}

pub(super) fn attach_shape_dynamic(
    core: &mut EngineCore,
    actor: RigidDynamicHandle,
    shape: ShapeHandle,
) -> EngineResult<()> {
    core.guard_dynamic(actor, "attach shape")?;
    let (physics, already_attached) = {
        let a = core.dynamics.get(actor.0).ok_or(stale("rigid dynamic"))?;
        (a.physics, a.shapes.contains(&shape))
    };
    validate_attachment(core, physics, shape, already_attached)?;
    core.dynamics
        .get_mut(actor.0)
        .ok_or(stale("rigid dynamic"))?
        .shapes
        .push(shape);
    Ok(())
}

fn validate_attachment(
    core: &EngineCore,
    actor_physics: PhysicsHandle,
    shape: ShapeHandle,
    already_attached: bool,
) -> EngineResult<()> {
    let s = core.shapes.get(shape.0).ok_or(stale("shape"))?;
    if s.physics != actor_physics {
        return Err(EngineError::Validation(
            "shape belongs to a different physics instance".to_string(),
        ));
    }
    if already_attached {
        return Err(EngineError::Validation(
            "shape is already attached to this actor".to_string(),
        ));
    }
    if s.exclusive && core.shape_attachments(shape) > 0 {
        return Err(EngineError::Validation(
            "exclusive shape is already attached to an actor".to_string(),
        ));
    }
    Ok(())
}

pub(super) fn rigid_static_global_pose(
    core: &EngineCore,
    actor: RigidStaticHandle,
) -> EngineResult<Transform> {
    Ok(core.statics.get(actor.0).ok_or(stale("rigid static"))?.pose)
}

pub(super) fn global_pose(
    core: &EngineCore,
    actor: RigidDynamicHandle,
) -> EngineResult<Transform> {
    core.guard_dynamic(actor, "get pose")?;
    Ok(core.dynamics.get(actor.0).ok_or(stale("rigid dynamic"))?.pose)
}

pub(super) fn set_global_pose(
    core: &mut EngineCore,
    actor: RigidDynamicHandle,
    pose: Transform,
) -> EngineResult<()> {
    core.guard_dynamic(actor, "set pose")?;
    ensure_finite_pose(pose)?;
    core.dynamics
        .get_mut(actor.0)
        .ok_or(stale("rigid dynamic"))?
        .pose = pose;
    Ok(())
}

pub(super) fn mass(core: &EngineCore, actor: RigidDynamicHandle) -> EngineResult<f32> {
    core.guard_dynamic(actor, "get mass")?;
    Ok(core.dynamics.get(actor.0).ok_or(stale("rigid dynamic"))?.mass)
}

pub(super) fn set_mass(
    core: &mut EngineCore,
    actor: RigidDynamicHandle,
    mass: f32,
) -> EngineResult<()> {
    core.guard_dynamic(actor, "set mass")?;
    let a = core.dynamics.get_mut(actor.0).ok_or(stale("rigid dynamic"))?;
    if a.kinematic {
        return Err(EngineError::Validation(
            "cannot set mass on a kinematic actor".to_string(),
        ));
    }
    if !(mass.is_finite() && mass > 0.0) {
        return Err(EngineError::Validation(format!(
            "mass must be positive, got {}",
            mass
        )));
    }
    a.mass = mass;
    Ok(())
}

pub(super) fn linear_velocity(
    core: &EngineCore,
    actor: RigidDynamicHandle,
) -> EngineResult<Vec3> {
    core.guard_dynamic(actor, "get velocity")?;
    Ok(core
        .dynamics
        .get(actor.0)
        .ok_or(stale("rigid dynamic"))?
        .linear_velocity)
}

pub(super) fn set_linear_velocity(
    core: &mut EngineCore,
    actor: RigidDynamicHandle,
    velocity: Vec3,
) -> EngineResult<()> {
    core.guard_dynamic(actor, "set velocity")?;
    ensure_finite_vec(velocity, "linear velocity")?;
    core.dynamics
        .get_mut(actor.0)
        .ok_or(stale("rigid dynamic"))?
        .linear_velocity = velocity;
    Ok(())
}

pub(super) fn angular_velocity(
    core: &EngineCore,
    actor: RigidDynamicHandle,
) -> EngineResult<Vec3> {
    core.guard_dynamic(actor, "get velocity")?;
    Ok(core
        .dynamics
        .get(actor.0)
        .ok_or(stale("rigid dynamic"))?
        .angular_velocity)
}

pub(super) fn set_angular_velocity(
    core: &mut EngineCore,
    actor: RigidDynamicHandle,
    velocity: Vec3,
) -> EngineResult<()> {
    core.guard_dynamic(actor, "set velocity")?;
    ensure_finite_vec(velocity, "angular velocity")?;
    core.dynamics
        .get_mut(actor.0)
        .ok_or(stale("rigid dynamic"))?
        .angular_velocity = velocity;
    Ok(())
}

pub(super) fn add_force(
    core: &mut EngineCore,
    actor: RigidDynamicHandle,
    force: Vec3,
    mode: ForceMode,
) -> EngineResult<()> {
    core.guard_dynamic(actor, "add force")?;
    ensure_finite_vec(force, "force")?;
    let a = core.dynamics.get_mut(actor.0).ok_or(stale("rigid dynamic"))?;
    if a.kinematic {
        return Err(EngineError::Validation(
            "cannot add force to a kinematic actor".to_string(),
        ));
    }
    a.add_force(force, mode);
    Ok(())
}

pub(super) fn is_kinematic(core: &EngineCore, actor: RigidDynamicHandle) -> EngineResult<bool> {
    core.guard_dynamic(actor, "get kinematic flag")?;
    Ok(core
        .dynamics
        .get(actor.0)
        .ok_or(stale("rigid dynamic"))?
        .kinematic)
}

pub(super) fn set_kinematic(
    core: &mut EngineCore,
    actor: RigidDynamicHandle,
    kinematic: bool,
) -> EngineResult<()> {
    core.guard_dynamic(actor, "set kinematic flag")?;
    let a = core.dynamics.get_mut(actor.0).ok_or(stale("rigid dynamic"))?;
    a.kinematic = kinematic;
    if !kinematic {
        // A pending target is meaningless once the actor is solver-driven.
        a.kinematic_target = None;
    }
    Ok(())
}

pub(super) fn set_kinematic_target(
    core: &mut EngineCore,
    actor: RigidDynamicHandle,
    target: Transform,
) -> EngineResult<()> {
    core.guard_dynamic(actor, "set kinematic target")?;
    ensure_finite_pose(target)?;
    let a = core.dynamics.get_mut(actor.0).ok_or(stale("rigid dynamic"))?;
    if !a.kinematic {
        return Err(EngineError::Validation(
            "cannot set a kinematic target on a non-kinematic actor".to_string(),
        ));
    }
    a.kinematic_target = Some(target);
    Ok(())
}

fn scene_simulating(core: &EngineCore, scene: Option<crate::handles::SceneHandle>) -> bool {
    scene
        .and_then(|s| core.scenes.get(s.0))
        .map(Scene::is_simulating)
        .unwrap_or(false)
}

fn ensure_finite_pose(pose: Transform) -> EngineResult<()> {
    if !pose.is_finite() {
        return Err(EngineError::Validation(
            "pose must be finite".to_string(),
        ));
    }
    Ok(())
}

fn ensure_finite_vec(v: Vec3, what: &str) -> EngineResult<()> {
    if !v.is_finite() {
        return Err(EngineError::Validation(format!("{} must be finite", what)));
    }
    Ok(())
}
