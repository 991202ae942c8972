use kinetica_engine::{
    EngineCore, EngineError, Geometry, Transform, Vec3, FOUNDATION_VERSION, PHYSICS_VERSION,
};
use kinetica_engine::scene::SceneDesc;

#[test]
fn full_lifecycle_builds_and_tears_down_cleanly() {
    let mut core = EngineCore::new();

    let foundation = core
        .create_foundation(FOUNDATION_VERSION, "default")
        .expect("foundation should come up");
    let pvd = core.create_pvd(foundation).unwrap();
    let physics = core
        .create_physics(PHYSICS_VERSION, foundation, 0.1, Some(pvd))
        .expect("physics should come up");
    let cooking = core.create_cooking(PHYSICS_VERSION, foundation).unwrap();

    let scene = core
        .create_scene(
            physics,
            SceneDesc {
                gravity: Vec3::new(0.0, -9.81, 0.0),
                max_actors: 10,
                enable_ccd: false,
            },
        )
        .unwrap();

    let material = core.create_material(physics, 0.5, 0.5, 0.1).unwrap();
    let shape = core
        .create_shape(physics, Geometry::Sphere { radius: 1.0 }, material, true)
        .unwrap();
    let actor = core
        .create_rigid_dynamic(physics, Transform::from_position(Vec3::new(0.0, 10.0, 0.0)))
        .unwrap();
    core.attach_shape_dynamic(actor, shape).unwrap();
    core.add_actor(scene, actor).unwrap();

    // Children before parents, all the way down.
    core.remove_actor(scene, actor).unwrap();
    core.release_rigid_dynamic(actor).unwrap();
    core.release_shape(shape).unwrap();
    core.release_material(material).unwrap();
    core.release_scene(scene).unwrap();
    core.release_cooking(cooking).unwrap();
    core.release_physics(physics).unwrap();
    core.release_pvd(pvd).unwrap();
    core.release_foundation(foundation).unwrap();

    assert_eq!(core.live_resource_count(), 0);
}

#[test]
fn release_order_is_enforced() {
    let mut core = EngineCore::new();
    let foundation = core.create_foundation(FOUNDATION_VERSION, "default").unwrap();
    let physics = core
        .create_physics(PHYSICS_VERSION, foundation, 1.0, None)
        .unwrap();
    let material = core.create_material(physics, 0.4, 0.4, 0.2).unwrap();

    assert!(matches!(
        core.release_foundation(foundation),
        Err(EngineError::DependentsAlive { kind: "foundation", .. })
    ));
    assert!(matches!(
        core.release_physics(physics),
        Err(EngineError::DependentsAlive { kind: "physics", .. })
    ));

    core.release_material(material).unwrap();
    core.release_physics(physics).unwrap();
    core.release_foundation(foundation).unwrap();
}

#[test]
fn stale_handles_stay_dead_after_slot_reuse() {
    let mut core = EngineCore::new();
    let first = core.create_foundation(FOUNDATION_VERSION, "default").unwrap();
    core.release_foundation(first).unwrap();

    // The replacement may reuse the slot; the old token must not see it.
    let second = core.create_foundation(FOUNDATION_VERSION, "default").unwrap();
    assert_ne!(first.raw(), second.raw());
    assert!(matches!(
        core.create_physics(PHYSICS_VERSION, first, 1.0, None),
        Err(EngineError::StaleHandle { kind: "foundation" })
    ));
    core.release_foundation(second).unwrap();
}

#[test]
fn version_tokens_gate_creation() {
    let mut core = EngineCore::new();
    assert!(matches!(
        core.create_foundation(FOUNDATION_VERSION + 1, "default"),
        Err(EngineError::VersionMismatch { kind: "foundation", .. })
    ));
    let foundation = core.create_foundation(FOUNDATION_VERSION, "default").unwrap();
    assert!(matches!(
        core.create_physics(PHYSICS_VERSION ^ 0xff, foundation, 1.0, None),
        Err(EngineError::VersionMismatch { kind: "physics", .. })
    ));
    assert!(matches!(
        core.create_cooking(0, foundation),
        Err(EngineError::VersionMismatch { kind: "cooking", .. })
    ));
}

#[test]
fn pvd_connect_to_dead_endpoint_reports_false_not_error() {
    let mut core = EngineCore::new();
    let foundation = core.create_foundation(FOUNDATION_VERSION, "default").unwrap();
    let pvd = core.create_pvd(foundation).unwrap();
    // Port 1 is essentially never listening.
    assert_eq!(core.pvd_connect(pvd, "127.0.0.1", 1).unwrap(), false);
}

#[test]
fn pvd_from_another_foundation_is_rejected() {
    let mut core = EngineCore::new();
    let a = core.create_foundation(FOUNDATION_VERSION, "default").unwrap();
    let b = core.create_foundation(FOUNDATION_VERSION, "default").unwrap();
    let pvd = core.create_pvd(a).unwrap();
    assert!(matches!(
        core.create_physics(PHYSICS_VERSION, b, 1.0, Some(pvd)),
        Err(EngineError::Validation(_))
    ));
}
