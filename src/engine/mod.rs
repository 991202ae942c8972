//! EngineCore - the resource graph behind the handle boundary.
//!
//! One generational registry per resource kind; every operation validates
//! handle liveness before touching anything, and release operations walk the
//! dependency graph so children always go before parents:
//! Foundation -> {Pvd, Physics, Cooking} -> {Scene, Material, Collection}
//! -> Shape -> Actor.
//!
//! The facade in `api/` is a thin delegating layer; all semantics live here.

use crate::actors::{ForceMode, RigidDynamic, RigidStatic};
use crate::domain::{CollectionData, Material, Shape};
use crate::error::{EngineError, EngineResult};
use crate::handles::{
    CollectionHandle, CookingHandle, FoundationHandle, HandleRegistry, MaterialHandle,
    PhysicsHandle, PvdHandle, RigidDynamicHandle, RigidStaticHandle, SceneHandle, ShapeHandle,
};
use crate::math::{Geometry, Transform, Vec3};
use crate::pvd::Pvd;
use crate::scene::{Scene, SceneDesc};

#[path = "lifecycle/lifecycle.rs"]
mod lifecycle;
#[path = "factory/factory.rs"]
mod factory;
#[path = "actor_ops/actor_ops.rs"]
mod actor_ops;
#[path = "scene_ops/scene_ops.rs"]
mod scene_ops;
#[path = "collections/collections.rs"]
mod collections;

/// Process-wide engine root; everything else is created against one.
pub struct Foundation {
    pub version: u32,
    pub allocator: String,
}

/// Simulation subsystem instance.
pub struct Physics {
    pub foundation: FoundationHandle,
    pub tolerance_scale: f32,
    pub pvd: Option<PvdHandle>,
}

/// Offline baking context used to interpret serialized collections.
pub struct Cooking {
    pub foundation: FoundationHandle,
    pub version: u32,
}

/// Loaded, immutable bundle of actor templates.
pub struct Collection {
    pub physics: PhysicsHandle,
    pub cooking: CookingHandle,
    pub data: CollectionData,
}

pub struct EngineCore {
    foundations: HandleRegistry<Foundation>,
    pvds: HandleRegistry<Pvd>,
    physics: HandleRegistry<Physics>,
    cookings: HandleRegistry<Cooking>,
    materials: HandleRegistry<Material>,
    shapes: HandleRegistry<Shape>,
    statics: HandleRegistry<RigidStatic>,
    dynamics: HandleRegistry<RigidDynamic>,
    scenes: HandleRegistry<Scene>,
    collections: HandleRegistry<Collection>,
}

impl EngineCore {
    pub fn new() -> Self {
        Self {
            foundations: HandleRegistry::new(),
            pvds: HandleRegistry::new(),
            physics: HandleRegistry::new(),
            cookings: HandleRegistry::new(),
            materials: HandleRegistry::new(),
            shapes: HandleRegistry::new(),
            statics: HandleRegistry::new(),
            dynamics: HandleRegistry::new(),
            scenes: HandleRegistry::new(),
            collections: HandleRegistry::new(),
        }
    }

    /// Total live resources across all registries.
    pub fn live_resource_count(&self) -> usize {
        self.foundations.len()
            + self.pvds.len()
            + self.physics.len()
            + self.cookings.len()
            + self.materials.len()
            + self.shapes.len()
            + self.statics.len()
            + self.dynamics.len()
            + self.scenes.len()
            + self.collections.len()
    }

    // === FOUNDATION / PHYSICS / COOKING / PVD ===

    pub fn create_foundation(
        &mut self,
        version: u32,
        allocator: &str,
    ) -> EngineResult<FoundationHandle> {
        lifecycle::create_foundation(self, version, allocator)
    }

    pub fn release_foundation(&mut self, handle: FoundationHandle) -> EngineResult<()> {
        lifecycle::release_foundation(self, handle)
    }

    pub fn create_pvd(&mut self, foundation: FoundationHandle) -> EngineResult<PvdHandle> {
        lifecycle::create_pvd(self, foundation)
    }

    /// Attempts a debugger connection; `Ok(false)` on refusal, never an
    /// error for an unreachable endpoint.
    pub fn pvd_connect(&mut self, handle: PvdHandle, host: &str, port: u16) -> EngineResult<bool> {
        lifecycle::pvd_connect(self, handle, host, port)
    }

    pub fn release_pvd(&mut self, handle: PvdHandle) -> EngineResult<()> {
        lifecycle::release_pvd(self, handle)
    }

    pub fn create_physics(
        &mut self,
        version: u32,
        foundation: FoundationHandle,
        tolerance_scale: f32,
        pvd: Option<PvdHandle>,
    ) -> EngineResult<PhysicsHandle> {
        lifecycle::create_physics(self, version, foundation, tolerance_scale, pvd)
    }

    pub fn release_physics(&mut self, handle: PhysicsHandle) -> EngineResult<()> {
        lifecycle::release_physics(self, handle)
    }

    pub fn create_cooking(
        &mut self,
        version: u32,
        foundation: FoundationHandle,
    ) -> EngineResult<CookingHandle> {
        lifecycle::create_cooking(self, version, foundation)
    }

    pub fn release_cooking(&mut self, handle: CookingHandle) -> EngineResult<()> {
        lifecycle::release_cooking(self, handle)
    }

    // === MATERIALS & SHAPES ===

    pub fn create_material(
        &mut self,
        physics: PhysicsHandle,
        static_friction: f32,
        dynamic_friction: f32,
        restitution: f32,
    ) -> EngineResult<MaterialHandle> {
        factory::create_material(self, physics, static_friction, dynamic_friction, restitution)
    }

    pub fn release_material(&mut self, handle: MaterialHandle) -> EngineResult<()> {
        factory::release_material(self, handle)
    }

    pub fn create_shape(
        &mut self,
        physics: PhysicsHandle,
        geometry: Geometry,
        material: MaterialHandle,
        is_exclusive: bool,
    ) -> EngineResult<ShapeHandle> {
        factory::create_shape(self, physics, geometry, material, is_exclusive)
    }

    pub fn release_shape(&mut self, handle: ShapeHandle) -> EngineResult<()> {
        factory::release_shape(self, handle)
    }

    // === ACTORS ===

    pub fn create_rigid_static(
        &mut self,
        physics: PhysicsHandle,
        pose: Transform,
    ) -> EngineResult<RigidStaticHandle> {
        actor_ops::create_rigid_static(self, physics, pose)
    }

    pub fn release_rigid_static(&mut self, handle: RigidStaticHandle) -> EngineResult<()> {
        actor_ops::release_rigid_static(self, handle)
    }

    pub fn create_rigid_dynamic(
        &mut self,
        physics: PhysicsHandle,
        pose: Transform,
    ) -> EngineResult<RigidDynamicHandle> {
        actor_ops::create_rigid_dynamic(self, physics, pose)
    }

    pub fn release_rigid_dynamic(&mut self, handle: RigidDynamicHandle) -> EngineResult<()> {
        actor_ops::release_rigid_dynamic(self, handle)
    }

    pub fn attach_shape_static(
        &mut self,
        actor: RigidStaticHandle,
        shape: ShapeHandle,
    ) -> EngineResult<()> {
        actor_ops::attach_shape_static(self, actor, shape)
    }

    pub fn attach_shape_dynamic(
        &mut self,
        actor: RigidDynamicHandle,
        shape: ShapeHandle,
    ) -> EngineResult<()> {
        actor_ops::attach_shape_dynamic(self, actor, shape)
    }

    pub fn rigid_static_global_pose(&self, actor: RigidStaticHandle) -> EngineResult<Transform> {
        actor_ops::rigid_static_global_pose(self, actor)
    }

    pub fn global_pose(&self, actor: RigidDynamicHandle) -> EngineResult<Transform> {
        actor_ops::global_pose(self, actor)
    }

    /// Teleport: overwrites the pose without involving the solver.
    pub fn set_global_pose(
        &mut self,
        actor: RigidDynamicHandle,
        pose: Transform,
    ) -> EngineResult<()> {
        actor_ops::set_global_pose(self, actor, pose)
    }

    pub fn mass(&self, actor: RigidDynamicHandle) -> EngineResult<f32> {
        actor_ops::mass(self, actor)
    }

    pub fn set_mass(&mut self, actor: RigidDynamicHandle, mass: f32) -> EngineResult<()> {
        actor_ops::set_mass(self, actor, mass)
    }

    pub fn linear_velocity(&self, actor: RigidDynamicHandle) -> EngineResult<Vec3> {
        actor_ops::linear_velocity(self, actor)
    }

    pub fn set_linear_velocity(
        &mut self,
        actor: RigidDynamicHandle,
        velocity: Vec3,
    ) -> EngineResult<()> {
        actor_ops::set_linear_velocity(self, actor, velocity)
    }

    pub fn angular_velocity(&self, actor: RigidDynamicHandle) -> EngineResult<Vec3> {
        actor_ops::angular_velocity(self, actor)
    }

    pub fn set_angular_velocity(
        &mut self,
        actor: RigidDynamicHandle,
        velocity: Vec3,
    ) -> EngineResult<()> {
        actor_ops::set_angular_velocity(self, actor, velocity)
    }

    /// Accumulates a force for the next step; rejected on kinematic actors.
    pub fn add_force(
        &mut self,
        actor: RigidDynamicHandle,
        force: Vec3,
        mode: ForceMode,
    ) -> EngineResult<()> {
        actor_ops::add_force(self, actor, force, mode)
    }

    pub fn is_kinematic(&self, actor: RigidDynamicHandle) -> EngineResult<bool> {
        actor_ops::is_kinematic(self, actor)
    }

    pub fn set_kinematic(&mut self, actor: RigidDynamicHandle, kinematic: bool) -> EngineResult<()> {
        actor_ops::set_kinematic(self, actor, kinematic)
    }

    /// Arms the pose a kinematic actor moves to over the next step.
    pub fn set_kinematic_target(
        &mut self,
        actor: RigidDynamicHandle,
        target: Transform,
    ) -> EngineResult<()> {
        actor_ops::set_kinematic_target(self, actor, target)
    }

    // === SCENES & STEPPING ===

    pub fn create_scene(
        &mut self,
        physics: PhysicsHandle,
        desc: SceneDesc,
    ) -> EngineResult<SceneHandle> {
        scene_ops::create_scene(self, physics, desc)
    }

    pub fn release_scene(&mut self, handle: SceneHandle) -> EngineResult<()> {
        scene_ops::release_scene(self, handle)
    }

    pub fn add_actor(
        &mut self,
        scene: SceneHandle,
        actor: RigidDynamicHandle,
    ) -> EngineResult<()> {
        scene_ops::add_actor(self, scene, actor)
    }

    pub fn remove_actor(
        &mut self,
        scene: SceneHandle,
        actor: RigidDynamicHandle,
    ) -> EngineResult<()> {
        scene_ops::remove_actor(self, scene, actor)
    }

    pub fn add_static_actor(
        &mut self,
        scene: SceneHandle,
        actor: RigidStaticHandle,
    ) -> EngineResult<()> {
        scene_ops::add_static_actor(self, scene, actor)
    }

    pub fn remove_static_actor(
        &mut self,
        scene: SceneHandle,
        actor: RigidStaticHandle,
    ) -> EngineResult<()> {
        scene_ops::remove_static_actor(self, scene, actor)
    }

    /// Begins an asynchronous step of length `dt`; valid only while idle.
    pub fn simulate(&mut self, scene: SceneHandle, dt: f32) -> EngineResult<()> {
        scene_ops::simulate(self, scene, dt)
    }

    /// Completes the in-flight step. `block=false` polls and returns
    /// `Ok(false)` while the solve is still running.
    pub fn fetch_results(&mut self, scene: SceneHandle, block: bool) -> EngineResult<bool> {
        scene_ops::fetch_results(self, scene, block)
    }

    pub fn scene_is_simulating(&self, scene: SceneHandle) -> EngineResult<bool> {
        Ok(self.scene_ref(scene)?.is_simulating())
    }

    pub fn scene_sim_time(&self, scene: SceneHandle) -> EngineResult<f64> {
        Ok(self.scene_ref(scene)?.sim_time)
    }

    pub fn scene_frame(&self, scene: SceneHandle) -> EngineResult<u64> {
        Ok(self.scene_ref(scene)?.frame)
    }

    pub fn scene_actor_count(&self, scene: SceneHandle) -> EngineResult<usize> {
        Ok(self.scene_ref(scene)?.actor_count())
    }

    pub fn scene_desc(&self, scene: SceneHandle) -> EngineResult<SceneDesc> {
        Ok(self.scene_ref(scene)?.desc)
    }

    // === COLLECTIONS ===

    pub fn load_collection_from_file(
        &mut self,
        path: &str,
        physics: PhysicsHandle,
        cooking: CookingHandle,
    ) -> EngineResult<CollectionHandle> {
        collections::load_from_file(self, path, physics, cooking)
    }

    pub fn load_collection_from_memory(
        &mut self,
        bytes: &[u8],
        physics: PhysicsHandle,
        cooking: CookingHandle,
    ) -> EngineResult<CollectionHandle> {
        collections::load_from_memory(self, bytes, physics, cooking)
    }

    pub fn release_collection(&mut self, handle: CollectionHandle) -> EngineResult<()> {
        collections::release_collection(self, handle)
    }

    pub fn collection_template_count(&self, handle: CollectionHandle) -> EngineResult<usize> {
        collections::template_count(self, handle)
    }

    pub fn instantiate_static(
        &mut self,
        scene: SceneHandle,
        collection: CollectionHandle,
        index: u32,
        transform: Transform,
    ) -> EngineResult<RigidStaticHandle> {
        collections::instantiate_static(self, scene, collection, index, transform)
    }

    pub fn instantiate_dynamic(
        &mut self,
        scene: SceneHandle,
        collection: CollectionHandle,
        index: u32,
        transform: Transform,
    ) -> EngineResult<RigidDynamicHandle> {
        collections::instantiate_dynamic(self, scene, collection, index, transform, false)
    }

    pub fn instantiate_kinematic(
        &mut self,
        scene: SceneHandle,
        collection: CollectionHandle,
        index: u32,
        transform: Transform,
    ) -> EngineResult<RigidDynamicHandle> {
        collections::instantiate_dynamic(self, scene, collection, index, transform, true)
    }
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new()
    }
}

// Shared lookup helpers. Stale handles are always a distinguished error.
impl EngineCore {
    fn foundation_ref(&self, h: FoundationHandle) -> EngineResult<&Foundation> {
        self.foundations.get(h.0).ok_or(stale("foundation"))
    }

    fn physics_ref(&self, h: PhysicsHandle) -> EngineResult<&Physics> {
        self.physics.get(h.0).ok_or(stale("physics"))
    }

    fn cooking_ref(&self, h: CookingHandle) -> EngineResult<&Cooking> {
        self.cookings.get(h.0).ok_or(stale("cooking"))
    }

    fn scene_ref(&self, h: SceneHandle) -> EngineResult<&Scene> {
        self.scenes.get(h.0).ok_or(stale("scene"))
    }

    /// A dynamic actor may only be touched while its scene (if any) has no
    /// step in flight; mid-step state is not readable or writable.
    fn guard_dynamic(&self, h: RigidDynamicHandle, op: &'static str) -> EngineResult<()> {
        let actor = self.dynamics.get(h.0).ok_or(stale("rigid dynamic"))?;
        if let Some(scene) = actor.scene {
            if self
                .scenes
                .get(scene.0)
                .map(Scene::is_simulating)
                .unwrap_or(false)
            {
                return Err(EngineError::ProtocolViolation {
                    op,
                    reason: "owning scene is simulating",
                });
            }
        }
        Ok(())
    }

    /// Number of live actors a shape is currently attached to.
    fn shape_attachments(&self, h: ShapeHandle) -> usize {
        let on_statics = self
            .statics
            .iter()
            .filter(|(_, a)| a.shapes.contains(&h))
            .count();
        let on_dynamics = self
            .dynamics
            .iter()
            .filter(|(_, a)| a.shapes.contains(&h))
            .count();
        on_statics + on_dynamics
    }
}

fn stale(kind: &'static str) -> EngineError {
    EngineError::StaleHandle { kind }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
