#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use kinetica_engine::{Engine, FOUNDATION_VERSION, PHYSICS_VERSION};

#[wasm_bindgen_test]
fn facade_runs_a_gravity_step() {
    let mut engine = Engine::new();

    let foundation = engine.create_foundation(FOUNDATION_VERSION, "default").unwrap();
    let physics = engine
        .create_physics(PHYSICS_VERSION, foundation, 0.1, 0)
        .unwrap();
    let scene = engine
        .create_scene(physics, 0.0, -9.81, 0.0, 10, false)
        .unwrap();
    let material = engine.create_material(physics, 0.5, 0.5, 0.1).unwrap();
    let shape = engine
        .create_sphere_shape(physics, 1.0, material, true)
        .unwrap();
    let ball = engine
        .create_rigid_dynamic(physics, 0.0, 10.0, 0.0, 0.0, 0.0, 0.0, 1.0)
        .unwrap();
    engine.attach_shape_to_dynamic(ball, shape).unwrap();
    engine.add_actor(scene, ball).unwrap();

    engine.simulate(scene, 1.0 / 60.0).unwrap();
    // Steps complete inline on wasm; the first fetch applies them.
    assert!(engine.fetch_results(scene, true).unwrap());

    let pose = engine.global_pose(ball).unwrap();
    assert!(pose[1] < 10.0);
    assert_eq!(engine.scene_frame(scene).unwrap(), 1);
}

#[wasm_bindgen_test]
fn handles_are_nonzero_and_stale_after_release() {
    let mut engine = Engine::new();
    let foundation = engine.create_foundation(FOUNDATION_VERSION, "default").unwrap();
    assert_ne!(foundation, 0);

    engine.release_foundation(foundation).unwrap();
    assert!(engine.release_foundation(foundation).is_err());
}

#[wasm_bindgen_test]
fn pvd_is_unavailable_on_wasm() {
    let mut engine = Engine::new();
    let foundation = engine.create_foundation(FOUNDATION_VERSION, "default").unwrap();
    let pvd = engine.create_pvd(foundation).unwrap();
    assert_eq!(engine.pvd_connect(pvd, "127.0.0.1", 5425).unwrap(), false);
}
