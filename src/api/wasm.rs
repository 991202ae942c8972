//! Flat wasm boundary over [`EngineCore`].
//!
//! Handles cross as packed `u64` tokens (0 is the null sentinel), poses as
//! seven flat floats (`px py pz qx qy qz qw`), force modes as integer codes.
//! Errors flatten to `JsValue` strings; the typed variants live in
//! [`crate::EngineError`].

use wasm_bindgen::prelude::*;

use crate::actors::ForceMode;
use crate::engine::EngineCore;
use crate::error::EngineError;
use crate::handles::{
    CollectionHandle, CookingHandle, FoundationHandle, MaterialHandle, PhysicsHandle, PvdHandle,
    RigidDynamicHandle, RigidStaticHandle, SceneHandle, ShapeHandle,
};
use crate::math::{Geometry, Quat, Transform, Vec3};
use crate::scene::SceneDesc;

/// Initialize logging and panic reporting. Call once before anything else.
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    crate::set_panic_hook();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("engine initialized (version {})", version());
}

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[wasm_bindgen(js_name = foundationVersion)]
pub fn foundation_version() -> u32 {
    crate::FOUNDATION_VERSION
}

#[wasm_bindgen(js_name = physicsVersion)]
pub fn physics_version() -> u32 {
    crate::PHYSICS_VERSION
}

// Force mode codes for hosts that prefer names over numbers.
#[wasm_bindgen(js_name = forceModeForce)]
pub fn force_mode_force() -> u32 {
    ForceMode::Force.code()
}
#[wasm_bindgen(js_name = forceModeImpulse)]
pub fn force_mode_impulse() -> u32 {
    ForceMode::Impulse.code()
}
#[wasm_bindgen(js_name = forceModeVelocityChange)]
pub fn force_mode_velocity_change() -> u32 {
    ForceMode::VelocityChange.code()
}
#[wasm_bindgen(js_name = forceModeAcceleration)]
pub fn force_mode_acceleration() -> u32 {
    ForceMode::Acceleration.code()
}

#[wasm_bindgen]
pub struct Engine {
    core: EngineCore,
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            core: EngineCore::new(),
        }
    }

    // === LIFECYCLE ===

    #[wasm_bindgen(js_name = createFoundation)]
    pub fn create_foundation(&mut self, version: u32, allocator: &str) -> Result<u64, JsValue> {
        self.core
            .create_foundation(version, allocator)
            .map(FoundationHandle::raw)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = releaseFoundation)]
    pub fn release_foundation(&mut self, handle: u64) -> Result<(), JsValue> {
        self.core
            .release_foundation(FoundationHandle::from_raw(handle))
            .map_err(err)
    }

    #[wasm_bindgen(js_name = createPvd)]
    pub fn create_pvd(&mut self, foundation: u64) -> Result<u64, JsValue> {
        self.core
            .create_pvd(FoundationHandle::from_raw(foundation))
            .map(PvdHandle::raw)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = pvdConnect)]
    pub fn pvd_connect(&mut self, pvd: u64, host: &str, port: u16) -> Result<bool, JsValue> {
        self.core
            .pvd_connect(PvdHandle::from_raw(pvd), host, port)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = releasePvd)]
    pub fn release_pvd(&mut self, handle: u64) -> Result<(), JsValue> {
        self.core
            .release_pvd(PvdHandle::from_raw(handle))
            .map_err(err)
    }

    /// `pvd = 0` means no debugger attachment.
    #[wasm_bindgen(js_name = createPhysics)]
    pub fn create_physics(
        &mut self,
        version: u32,
        foundation: u64,
        tolerance_scale: f32,
        pvd: u64,
    ) -> Result<u64, JsValue> {
        let pvd = (pvd != 0).then(|| PvdHandle::from_raw(pvd));
        self.core
            .create_physics(
                version,
                FoundationHandle::from_raw(foundation),
                tolerance_scale,
                pvd,
            )
            .map(PhysicsHandle::raw)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = releasePhysics)]
    pub fn release_physics(&mut self, handle: u64) -> Result<(), JsValue> {
        self.core
            .release_physics(PhysicsHandle::from_raw(handle))
            .map_err(err)
    }

    #[wasm_bindgen(js_name = createCooking)]
    pub fn create_cooking(&mut self, version: u32, foundation: u64) -> Result<u64, JsValue> {
        self.core
            .create_cooking(version, FoundationHandle::from_raw(foundation))
            .map(CookingHandle::raw)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = releaseCooking)]
    pub fn release_cooking(&mut self, handle: u64) -> Result<(), JsValue> {
        self.core
            .release_cooking(CookingHandle::from_raw(handle))
            .map_err(err)
    }

    // === MATERIALS & SHAPES ===

    #[wasm_bindgen(js_name = createMaterial)]
    pub fn create_material(
        &mut self,
        physics: u64,
        static_friction: f32,
        dynamic_friction: f32,
        restitution: f32,
    ) -> Result<u64, JsValue> {
        self.core
            .create_material(
                PhysicsHandle::from_raw(physics),
                static_friction,
                dynamic_friction,
                restitution,
            )
            .map(MaterialHandle::raw)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = releaseMaterial)]
    pub fn release_material(&mut self, handle: u64) -> Result<(), JsValue> {
        self.core
            .release_material(MaterialHandle::from_raw(handle))
            .map_err(err)
    }

    #[wasm_bindgen(js_name = createSphereShape)]
    pub fn create_sphere_shape(
        &mut self,
        physics: u64,
        radius: f32,
        material: u64,
        is_exclusive: bool,
    ) -> Result<u64, JsValue> {
        self.create_shape(physics, Geometry::Sphere { radius }, material, is_exclusive)
    }

    #[wasm_bindgen(js_name = createBoxShape)]
    pub fn create_box_shape(
        &mut self,
        physics: u64,
        hx: f32,
        hy: f32,
        hz: f32,
        material: u64,
        is_exclusive: bool,
    ) -> Result<u64, JsValue> {
        let geometry = Geometry::Box {
            half_extents: Vec3::new(hx, hy, hz),
        };
        self.create_shape(physics, geometry, material, is_exclusive)
    }

    #[wasm_bindgen(js_name = createCapsuleShape)]
    pub fn create_capsule_shape(
        &mut self,
        physics: u64,
        radius: f32,
        half_height: f32,
        material: u64,
        is_exclusive: bool,
    ) -> Result<u64, JsValue> {
        let geometry = Geometry::Capsule {
            radius,
            half_height,
        };
        self.create_shape(physics, geometry, material, is_exclusive)
    }

    #[wasm_bindgen(js_name = releaseShape)]
    pub fn release_shape(&mut self, handle: u64) -> Result<(), JsValue> {
        self.core
            .release_shape(ShapeHandle::from_raw(handle))
            .map_err(err)
    }

    // === ACTORS ===

    #[wasm_bindgen(js_name = createRigidStatic)]
    #[allow(clippy::too_many_arguments)]
    pub fn create_rigid_static(
        &mut self,
        physics: u64,
        px: f32,
        py: f32,
        pz: f32,
        qx: f32,
        qy: f32,
        qz: f32,
        qw: f32,
    ) -> Result<u64, JsValue> {
        self.core
            .create_rigid_static(
                PhysicsHandle::from_raw(physics),
                pose(px, py, pz, qx, qy, qz, qw),
            )
            .map(RigidStaticHandle::raw)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = releaseRigidStatic)]
    pub fn release_rigid_static(&mut self, handle: u64) -> Result<(), JsValue> {
        self.core
            .release_rigid_static(RigidStaticHandle::from_raw(handle))
            .map_err(err)
    }

    #[wasm_bindgen(js_name = createRigidDynamic)]
    #[allow(clippy::too_many_arguments)]
    pub fn create_rigid_dynamic(
        &mut self,
        physics: u64,
        px: f32,
        py: f32,
        pz: f32,
        qx: f32,
        qy: f32,
        qz: f32,
        qw: f32,
    ) -> Result<u64, JsValue> {
        self.core
            .create_rigid_dynamic(
                PhysicsHandle::from_raw(physics),
                pose(px, py, pz, qx, qy, qz, qw),
            )
            .map(RigidDynamicHandle::raw)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = releaseRigidDynamic)]
    pub fn release_rigid_dynamic(&mut self, handle: u64) -> Result<(), JsValue> {
        self.core
            .release_rigid_dynamic(RigidDynamicHandle::from_raw(handle))
            .map_err(err)
    }

    #[wasm_bindgen(js_name = attachShapeToStatic)]
    pub fn attach_shape_to_static(&mut self, actor: u64, shape: u64) -> Result<(), JsValue> {
        self.core
            .attach_shape_static(
                RigidStaticHandle::from_raw(actor),
                ShapeHandle::from_raw(shape),
            )
            .map_err(err)
    }

    #[wasm_bindgen(js_name = attachShapeToDynamic)]
    pub fn attach_shape_to_dynamic(&mut self, actor: u64, shape: u64) -> Result<(), JsValue> {
        self.core
            .attach_shape_dynamic(
                RigidDynamicHandle::from_raw(actor),
                ShapeHandle::from_raw(shape),
            )
            .map_err(err)
    }

    #[wasm_bindgen(js_name = staticGlobalPose)]
    pub fn static_global_pose(&self, actor: u64) -> Result<Vec<f32>, JsValue> {
        self.core
            .rigid_static_global_pose(RigidStaticHandle::from_raw(actor))
            .map(flat_pose)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = globalPose)]
    pub fn global_pose(&self, actor: u64) -> Result<Vec<f32>, JsValue> {
        self.core
            .global_pose(RigidDynamicHandle::from_raw(actor))
            .map(flat_pose)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = setGlobalPose)]
    #[allow(clippy::too_many_arguments)]
    pub fn set_global_pose(
        &mut self,
        actor: u64,
        px: f32,
        py: f32,
        pz: f32,
        qx: f32,
        qy: f32,
        qz: f32,
        qw: f32,
    ) -> Result<(), JsValue> {
        self.core
            .set_global_pose(
                RigidDynamicHandle::from_raw(actor),
                pose(px, py, pz, qx, qy, qz, qw),
            )
            .map_err(err)
    }

    pub fn mass(&self, actor: u64) -> Result<f32, JsValue> {
        self.core.mass(RigidDynamicHandle::from_raw(actor)).map_err(err)
    }

    #[wasm_bindgen(js_name = setMass)]
    pub fn set_mass(&mut self, actor: u64, mass: f32) -> Result<(), JsValue> {
        self.core
            .set_mass(RigidDynamicHandle::from_raw(actor), mass)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = linearVelocity)]
    pub fn linear_velocity(&self, actor: u64) -> Result<Vec<f32>, JsValue> {
        self.core
            .linear_velocity(RigidDynamicHandle::from_raw(actor))
            .map(flat_vec)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = setLinearVelocity)]
    pub fn set_linear_velocity(
        &mut self,
        actor: u64,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), JsValue> {
        self.core
            .set_linear_velocity(RigidDynamicHandle::from_raw(actor), Vec3::new(x, y, z))
            .map_err(err)
    }

    #[wasm_bindgen(js_name = angularVelocity)]
    pub fn angular_velocity(&self, actor: u64) -> Result<Vec<f32>, JsValue> {
        self.core
            .angular_velocity(RigidDynamicHandle::from_raw(actor))
            .map(flat_vec)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = setAngularVelocity)]
    pub fn set_angular_velocity(
        &mut self,
        actor: u64,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), JsValue> {
        self.core
            .set_angular_velocity(RigidDynamicHandle::from_raw(actor), Vec3::new(x, y, z))
            .map_err(err)
    }

    #[wasm_bindgen(js_name = addForce)]
    pub fn add_force(
        &mut self,
        actor: u64,
        x: f32,
        y: f32,
        z: f32,
        mode: u32,
    ) -> Result<(), JsValue> {
        let mode = ForceMode::from_code(mode)
            .ok_or_else(|| JsValue::from_str(&format!("unknown force mode code {}", mode)))?;
        self.core
            .add_force(RigidDynamicHandle::from_raw(actor), Vec3::new(x, y, z), mode)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = isKinematic)]
    pub fn is_kinematic(&self, actor: u64) -> Result<bool, JsValue> {
        self.core
            .is_kinematic(RigidDynamicHandle::from_raw(actor))
            .map_err(err)
    }

    #[wasm_bindgen(js_name = setKinematic)]
    pub fn set_kinematic(&mut self, actor: u64, kinematic: bool) -> Result<(), JsValue> {
        self.core
            .set_kinematic(RigidDynamicHandle::from_raw(actor), kinematic)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = setKinematicTarget)]
    #[allow(clippy::too_many_arguments)]
    pub fn set_kinematic_target(
        &mut self,
        actor: u64,
        px: f32,
        py: f32,
        pz: f32,
        qx: f32,
        qy: f32,
        qz: f32,
        qw: f32,
    ) -> Result<(), JsValue> {
        self.core
            .set_kinematic_target(
                RigidDynamicHandle::from_raw(actor),
                pose(px, py, pz, qx, qy, qz, qw),
            )
            .map_err(err)
    }

    // === SCENES ===

    #[wasm_bindgen(js_name = createScene)]
    pub fn create_scene(
        &mut self,
        physics: u64,
        gx: f32,
        gy: f32,
        gz: f32,
        max_actors: u32,
        enable_ccd: bool,
    ) -> Result<u64, JsValue> {
        let desc = SceneDesc {
            gravity: Vec3::new(gx, gy, gz),
            max_actors,
            enable_ccd,
        };
        self.core
            .create_scene(PhysicsHandle::from_raw(physics), desc)
            .map(SceneHandle::raw)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = releaseScene)]
    pub fn release_scene(&mut self, handle: u64) -> Result<(), JsValue> {
        self.core
            .release_scene(SceneHandle::from_raw(handle))
            .map_err(err)
    }

    #[wasm_bindgen(js_name = addActor)]
    pub fn add_actor(&mut self, scene: u64, actor: u64) -> Result<(), JsValue> {
        self.core
            .add_actor(
                SceneHandle::from_raw(scene),
                RigidDynamicHandle::from_raw(actor),
            )
            .map_err(err)
    }

    #[wasm_bindgen(js_name = removeActor)]
    pub fn remove_actor(&mut self, scene: u64, actor: u64) -> Result<(), JsValue> {
        self.core
            .remove_actor(
                SceneHandle::from_raw(scene),
                RigidDynamicHandle::from_raw(actor),
            )
            .map_err(err)
    }

    #[wasm_bindgen(js_name = addStaticActor)]
    pub fn add_static_actor(&mut self, scene: u64, actor: u64) -> Result<(), JsValue> {
        self.core
            .add_static_actor(
                SceneHandle::from_raw(scene),
                RigidStaticHandle::from_raw(actor),
            )
            .map_err(err)
    }

    #[wasm_bindgen(js_name = removeStaticActor)]
    pub fn remove_static_actor(&mut self, scene: u64, actor: u64) -> Result<(), JsValue> {
        self.core
            .remove_static_actor(
                SceneHandle::from_raw(scene),
                RigidStaticHandle::from_raw(actor),
            )
            .map_err(err)
    }

    pub fn simulate(&mut self, scene: u64, dt: f32) -> Result<(), JsValue> {
        self.core
            .simulate(SceneHandle::from_raw(scene), dt)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = fetchResults)]
    pub fn fetch_results(&mut self, scene: u64, block: bool) -> Result<bool, JsValue> {
        self.core
            .fetch_results(SceneHandle::from_raw(scene), block)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = sceneSimTime)]
    pub fn scene_sim_time(&self, scene: u64) -> Result<f64, JsValue> {
        self.core
            .scene_sim_time(SceneHandle::from_raw(scene))
            .map_err(err)
    }

    #[wasm_bindgen(js_name = sceneFrame)]
    pub fn scene_frame(&self, scene: u64) -> Result<u64, JsValue> {
        self.core
            .scene_frame(SceneHandle::from_raw(scene))
            .map_err(err)
    }

    #[wasm_bindgen(js_name = sceneActorCount)]
    pub fn scene_actor_count(&self, scene: u64) -> Result<u32, JsValue> {
        self.core
            .scene_actor_count(SceneHandle::from_raw(scene))
            .map(|n| n as u32)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = sceneIsSimulating)]
    pub fn scene_is_simulating(&self, scene: u64) -> Result<bool, JsValue> {
        self.core
            .scene_is_simulating(SceneHandle::from_raw(scene))
            .map_err(err)
    }

    // === COLLECTIONS ===

    #[wasm_bindgen(js_name = loadCollection)]
    pub fn load_collection(
        &mut self,
        bytes: &[u8],
        physics: u64,
        cooking: u64,
    ) -> Result<u64, JsValue> {
        self.core
            .load_collection_from_memory(
                bytes,
                PhysicsHandle::from_raw(physics),
                CookingHandle::from_raw(cooking),
            )
            .map(CollectionHandle::raw)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = releaseCollection)]
    pub fn release_collection(&mut self, handle: u64) -> Result<(), JsValue> {
        self.core
            .release_collection(CollectionHandle::from_raw(handle))
            .map_err(err)
    }

    #[wasm_bindgen(js_name = collectionTemplateCount)]
    pub fn collection_template_count(&self, handle: u64) -> Result<u32, JsValue> {
        self.core
            .collection_template_count(CollectionHandle::from_raw(handle))
            .map(|n| n as u32)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = instantiateStatic)]
    #[allow(clippy::too_many_arguments)]
    pub fn instantiate_static(
        &mut self,
        scene: u64,
        collection: u64,
        index: u32,
        px: f32,
        py: f32,
        pz: f32,
        qx: f32,
        qy: f32,
        qz: f32,
        qw: f32,
    ) -> Result<u64, JsValue> {
        self.core
            .instantiate_static(
                SceneHandle::from_raw(scene),
                CollectionHandle::from_raw(collection),
                index,
                pose(px, py, pz, qx, qy, qz, qw),
            )
            .map(RigidStaticHandle::raw)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = instantiateDynamic)]
    #[allow(clippy::too_many_arguments)]
    pub fn instantiate_dynamic(
        &mut self,
        scene: u64,
        collection: u64,
        index: u32,
        px: f32,
        py: f32,
        pz: f32,
        qx: f32,
        qy: f32,
        qz: f32,
        qw: f32,
    ) -> Result<u64, JsValue> {
        self.core
            .instantiate_dynamic(
                SceneHandle::from_raw(scene),
                CollectionHandle::from_raw(collection),
                index,
                pose(px, py, pz, qx, qy, qz, qw),
            )
            .map(RigidDynamicHandle::raw)
            .map_err(err)
    }

    #[wasm_bindgen(js_name = instantiateKinematic)]
    #[allow(clippy::too_many_arguments)]
    pub fn instantiate_kinematic(
        &mut self,
        scene: u64,
        collection: u64,
        index: u32,
        px: f32,
        py: f32,
        pz: f32,
        qx: f32,
        qy: f32,
        qz: f32,
        qw: f32,
    ) -> Result<u64, JsValue> {
        self.core
            .instantiate_kinematic(
                SceneHandle::from_raw(scene),
                CollectionHandle::from_raw(collection),
                index,
                pose(px, py, pz, qx, qy, qz, qw),
            )
            .map(RigidDynamicHandle::raw)
            .map_err(err)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    fn create_shape(
        &mut self,
        physics: u64,
        geometry: Geometry,
        material: u64,
        is_exclusive: bool,
    ) -> Result<u64, JsValue> {
        self.core
            .create_shape(
                PhysicsHandle::from_raw(physics),
                geometry,
                MaterialHandle::from_raw(material),
                is_exclusive,
            )
            .map(ShapeHandle::raw)
            .map_err(err)
    }
}

fn pose(px: f32, py: f32, pz: f32, qx: f32, qy: f32, qz: f32, qw: f32) -> Transform {
    Transform::new(Vec3::new(px, py, pz), Quat::new(qx, qy, qz, qw))
}

fn flat_pose(t: Transform) -> Vec<f32> {
    vec![
        t.position.x,
        t.position.y,
        t.position.z,
        t.rotation.x,
        t.rotation.y,
        t.rotation.z,
        t.rotation.w,
    ]
}

fn flat_vec(v: Vec3) -> Vec<f32> {
    vec![v.x, v.y, v.z]
}

fn err(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
