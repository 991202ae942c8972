//! Kinetica Engine - rigid-body simulation behind an opaque handle boundary.
//!
//! Hosts never touch engine memory. Every resource (foundation, physics,
//! scene, actor, shape, material, collection) is addressed by a packed `u64`
//! handle validated on every call, and scenes step through an explicit
//! two-phase `simulate` / `fetch_results` protocol so the host can overlap
//! its own work with the solve.
//!
//! Architecture:
//! - math/      - boundary value types (Vec3, Quat, Transform, Geometry)
//! - handles/   - packed handles and the generational registry
//! - domain/    - materials, shapes, collection bundles
//! - actors/    - rigid statics and dynamics
//! - scene/     - worlds, the step state machine, the solver
//! - pvd/       - optional live-diagnostics stream
//! - engine/    - orchestration: EngineCore ties the registries together
//! - api/       - wasm boundary facade

pub mod actors;
pub mod api;
pub mod domain;
pub mod engine;
pub mod error;
pub mod handles;
pub mod math;
pub mod pvd;
pub mod scene;

pub use actors::ForceMode;
pub use engine::EngineCore;
pub use error::{EngineError, EngineResult};
pub use handles::{
    CollectionHandle, CookingHandle, FoundationHandle, MaterialHandle, PhysicsHandle, PvdHandle,
    RigidDynamicHandle, RigidStaticHandle, SceneHandle, ShapeHandle,
};
pub use math::{Geometry, Quat, Transform, Vec3};
pub use scene::{SceneDesc, StepState};

#[cfg(target_arch = "wasm32")]
pub use api::wasm::Engine;

/// Compatibility token a host must pass to `create_foundation`.
pub const FOUNDATION_VERSION: u32 = 0x0100_0000;

/// Compatibility token a host must pass to `create_physics` and
/// `create_cooking`.
pub const PHYSICS_VERSION: u32 = 0x0304_0200;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}
