//! Collection loading and template instantiation.
//!
//! A loaded collection is immutable; instantiation deep-copies the indexed
//! template into fresh materials, exclusive shapes and an actor, so the
//! collection can be released without affecting anything spawned from it.
//! The copied resources are owned by the actor and die with it.

use crate::actors::{RigidDynamic, RigidStatic};
use crate::domain::{ActorTemplate, CollectionData, Material, MaterialTemplate, Shape};
use crate::error::{EngineError, EngineResult};
use crate::handles::{
    CollectionHandle, CookingHandle, MaterialHandle, PhysicsHandle, RigidDynamicHandle,
    RigidStaticHandle, SceneHandle, ShapeHandle,
};
use crate::math::Transform;

use super::{stale, Collection, EngineCore};

pub(super) fn load_from_file(
    core: &mut EngineCore,
    path: &str,
    physics: PhysicsHandle,
    cooking: CookingHandle,
) -> EngineResult<CollectionHandle> {
    validate_load_context(core, physics, cooking)?;
    let data = CollectionData::from_file(path)?;
    log::info!(
        "collection loaded from {} ({} templates)",
        path,
        data.template_count()
    );
    Ok(CollectionHandle(core.collections.insert(Collection {
        physics,
        cooking,
        data,
    })))
}

pub(super) fn load_from_memory(
    core: &mut EngineCore,
    bytes: &[u8],
    physics: PhysicsHandle,
    cooking: CookingHandle,
) -> EngineResult<CollectionHandle> {
    validate_load_context(core, physics, cooking)?;
    let data = CollectionData::from_bytes(bytes)?;
    log::info!(
        "collection loaded from memory ({} templates)",
        data.template_count()
    );
    Ok(CollectionHandle(core.collections.insert(Collection {
        physics,
        cooking,
        data,
    })))
}

fn validate_load_context(
    core: &EngineCore,
    physics: PhysicsHandle,
    cooking: CookingHandle,
) -> EngineResult<()> {
    let p = core.physics_ref(physics)?;
    let c = core.cooking_ref(cooking)?;
    if p.foundation != c.foundation {
        return Err(EngineError::Validation(
            "physics and cooking belong to different foundations".to_string(),
        ));
    }
    Ok(())
}

pub(super) fn release_collection(
    core: &mut EngineCore,
    handle: CollectionHandle,
) -> EngineResult<()> {
    // Instantiated actors hold copies, never references into the bundle.
    core.collections
        .remove(handle.0)
        .map(|_| ())
        .ok_or(stale("collection"))
}

pub(super) fn template_count(core: &EngineCore, handle: CollectionHandle) -> EngineResult<usize> {
    Ok(core
        .collections
        .get(handle.0)
        .ok_or(stale("collection"))?
        .data
        .template_count())
}

pub(super) fn instantiate_static(
    core: &mut EngineCore,
    scene: SceneHandle,
    collection: CollectionHandle,
    index: u32,
    transform: Transform,
) -> EngineResult<RigidStaticHandle> {
    let (physics, template, materials) =
        validate_instantiation(core, scene, collection, index, transform)?;
    let (shapes, owned_materials) = build_resources(core, physics, &template, &materials);

    let mut actor = RigidStatic::new(physics, transform);
    actor.shapes = shapes.clone();
    actor.owned_shapes = shapes;
    actor.owned_materials = owned_materials;
    actor.scene = Some(scene);
    let handle = RigidStaticHandle(core.statics.insert(actor));
    core.scenes
        .get_mut(scene.0)
        .ok_or(stale("scene"))?
        .statics
        .push(handle);
    Ok(handle)
}

pub(super) fn instantiate_dynamic(
    core: &mut EngineCore,
    scene: SceneHandle,
    collection: CollectionHandle,
    index: u32,
    transform: Transform,
    kinematic: bool,
) -> EngineResult<RigidDynamicHandle> {
    let (physics, template, materials) =
        validate_instantiation(core, scene, collection, index, transform)?;
    let (shapes, owned_materials) = build_resources(core, physics, &template, &materials);

    let mut actor = RigidDynamic::new(physics, transform);
    actor.mass = template.mass;
    actor.kinematic = kinematic;
    actor.shapes = shapes.clone();
    actor.owned_shapes = shapes;
    actor.owned_materials = owned_materials;
    actor.scene = Some(scene);
    let handle = RigidDynamicHandle(core.dynamics.insert(actor));
    core.scenes
        .get_mut(scene.0)
        .ok_or(stale("scene"))?
        .dynamics
        .push(handle);
    Ok(handle)
}

fn validate_instantiation(
    core: &EngineCore,
    scene: SceneHandle,
    collection: CollectionHandle,
    index: u32,
    transform: Transform,
) -> EngineResult<(PhysicsHandle, ActorTemplate, Vec<MaterialTemplate>)> {
    let s = core.scene_ref(scene)?;
    if s.is_simulating() {
        return Err(EngineError::ProtocolViolation {
            op: "instantiate",
            reason: "scene is simulating",
        });
    }
    let c = core
        .collections
        .get(collection.0)
        .ok_or(stale("collection"))?;
    if c.physics != s.physics {
        return Err(EngineError::Validation(
            "collection belongs to a different physics instance".to_string(),
        ));
    }
    if !transform.is_finite() {
        return Err(EngineError::Validation(
            "pose must be finite".to_string(),
        ));
    }
    let len = c.data.actors.len() as u32;
    if index >= len {
        return Err(EngineError::IndexOutOfRange { index, len });
    }
    Ok((
        s.physics,
        c.data.actors[index as usize].clone(),
        c.data.materials.clone(),
    ))
}

/// Deep copy of a template's shapes: one fresh material per distinct bundle
/// material the template references, plus exclusive shapes bound to them.
/// Bundle data was validated at load time, so construction cannot fail.
fn build_resources(
    core: &mut EngineCore,
    physics: PhysicsHandle,
    template: &ActorTemplate,
    materials: &[MaterialTemplate],
) -> (Vec<ShapeHandle>, Vec<MaterialHandle>) {
    let mut created_materials: Vec<Option<MaterialHandle>> = vec![None; materials.len()];
    let mut shapes = Vec::with_capacity(template.shapes.len());

    for shape_template in &template.shapes {
        let material = *created_materials[shape_template.material].get_or_insert_with(|| {
            let m = &materials[shape_template.material];
            MaterialHandle(core.materials.insert(Material {
                physics,
                static_friction: m.static_friction,
                dynamic_friction: m.dynamic_friction,
                restitution: m.restitution,
            }))
        });
        shapes.push(ShapeHandle(core.shapes.insert(Shape {
            physics,
            geometry: shape_template.geometry,
            material,
            exclusive: true,
        })));
    }

    let owned_materials = created_materials.into_iter().flatten().collect();
    (shapes, owned_materials)
}
