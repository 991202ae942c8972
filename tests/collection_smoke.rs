use std::fs;

use kinetica_engine::scene::SceneDesc;
use kinetica_engine::{
    CollectionHandle, CookingHandle, EngineCore, EngineError, PhysicsHandle, SceneHandle,
    Transform, Vec3, FOUNDATION_VERSION, PHYSICS_VERSION,
};

const BUNDLE: &str = r#"{
    "formatVersion": 1,
    "name": "props",
    "materials": [
        {"staticFriction": 0.6, "dynamicFriction": 0.4, "restitution": 0.2},
        {"staticFriction": 0.1, "dynamicFriction": 0.1, "restitution": 0.9}
    ],
    "actors": [
        {"name": "crate", "mass": 10.0,
         "shapes": [{"geometry": {"type": "box", "halfExtents": {"x": 0.5, "y": 0.5, "z": 0.5}}, "material": 0}]},
        {"name": "ball", "mass": 2.0,
         "shapes": [{"geometry": {"type": "sphere", "radius": 0.25}, "material": 1}]},
        {"name": "pill",
         "shapes": [{"geometry": {"type": "capsule", "radius": 0.3, "halfHeight": 0.6}, "material": 0},
                    {"geometry": {"type": "sphere", "radius": 0.3}, "material": 0}]}
    ]
}"#;

fn world() -> (EngineCore, PhysicsHandle, CookingHandle, SceneHandle) {
    let mut core = EngineCore::new();
    let foundation = core.create_foundation(FOUNDATION_VERSION, "default").unwrap();
    let physics = core
        .create_physics(PHYSICS_VERSION, foundation, 0.1, None)
        .unwrap();
    let cooking = core.create_cooking(PHYSICS_VERSION, foundation).unwrap();
    let scene = core
        .create_scene(
            physics,
            SceneDesc {
                gravity: Vec3::new(0.0, -9.81, 0.0),
                max_actors: 32,
                enable_ccd: false,
            },
        )
        .unwrap();
    (core, physics, cooking, scene)
}

fn load(core: &mut EngineCore, physics: PhysicsHandle, cooking: CookingHandle) -> CollectionHandle {
    core.load_collection_from_memory(BUNDLE.as_bytes(), physics, cooking)
        .expect("bundle should parse")
}

#[test]
fn loads_from_memory_and_reports_templates() {
    let (mut core, physics, cooking, _) = world();
    let collection = load(&mut core, physics, cooking);
    assert_eq!(core.collection_template_count(collection).unwrap(), 3);
}

#[test]
fn loads_from_file() {
    let (mut core, physics, cooking, _) = world();
    let path = std::env::temp_dir().join("kinetica_collection_smoke.json");
    fs::write(&path, BUNDLE).unwrap();

    let collection = core
        .load_collection_from_file(path.to_str().unwrap(), physics, cooking)
        .expect("bundle file should load");
    assert_eq!(core.collection_template_count(collection).unwrap(), 3);

    let _ = fs::remove_file(&path);
}

#[test]
fn missing_file_is_an_io_error() {
    let (mut core, physics, cooking, _) = world();
    assert!(matches!(
        core.load_collection_from_file("/nonexistent/bundle.json", physics, cooking),
        Err(EngineError::Io(_))
    ));
}

#[test]
fn instantiates_all_three_actor_kinds() {
    let (mut core, physics, cooking, scene) = world();
    let collection = load(&mut core, physics, cooking);

    let wall = core
        .instantiate_static(scene, collection, 0, Transform::identity())
        .unwrap();
    let ball = core
        .instantiate_dynamic(
            scene,
            collection,
            1,
            Transform::from_position(Vec3::new(0.0, 5.0, 0.0)),
        )
        .unwrap();
    let lift = core
        .instantiate_kinematic(scene, collection, 2, Transform::identity())
        .unwrap();

    assert_eq!(core.scene_actor_count(scene).unwrap(), 3);
    assert_eq!(core.mass(ball).unwrap(), 2.0);
    assert!(!core.is_kinematic(ball).unwrap());
    assert!(core.is_kinematic(lift).unwrap());
    assert_eq!(
        core.rigid_static_global_pose(wall).unwrap(),
        Transform::identity()
    );

    // A stepped scene moves only the dynamic one.
    core.simulate(scene, 1.0 / 60.0).unwrap();
    core.fetch_results(scene, true).unwrap();
    assert!(core.global_pose(ball).unwrap().position.y < 5.0);
    assert_eq!(core.global_pose(lift).unwrap(), Transform::identity());
}

#[test]
fn out_of_range_template_index_is_a_range_error() {
    let (mut core, physics, cooking, scene) = world();
    let collection = load(&mut core, physics, cooking);
    assert!(matches!(
        core.instantiate_dynamic(scene, collection, 3, Transform::identity()),
        Err(EngineError::IndexOutOfRange { index: 3, len: 3 })
    ));
}

#[test]
fn instances_are_independent_of_the_bundle_and_each_other() {
    let (mut core, physics, cooking, scene) = world();
    let collection = load(&mut core, physics, cooking);

    let a = core
        .instantiate_dynamic(scene, collection, 1, Transform::identity())
        .unwrap();
    let b = core
        .instantiate_dynamic(scene, collection, 1, Transform::identity())
        .unwrap();

    assert_ne!(a, b);
    core.set_global_pose(a, Transform::from_position(Vec3::new(7.0, 0.0, 0.0)))
        .unwrap();
    assert_eq!(core.global_pose(b).unwrap(), Transform::identity());

    core.set_mass(a, 99.0).unwrap();
    assert_eq!(core.mass(b).unwrap(), 2.0);

    core.release_collection(collection).unwrap();
    assert_eq!(core.mass(a).unwrap(), 99.0);

    // Each instance owns its deep copies; releasing one leaves the other.
    core.release_rigid_dynamic(a).unwrap();
    assert_eq!(core.mass(b).unwrap(), 2.0);
}

#[test]
fn kinematic_instance_enforces_kinematic_rules() {
    let (mut core, physics, cooking, scene) = world();
    let collection = load(&mut core, physics, cooking);
    let lift = core
        .instantiate_kinematic(scene, collection, 2, Transform::identity())
        .unwrap();

    assert!(core.set_mass(lift, 5.0).is_err());
    core.set_kinematic_target(lift, Transform::from_position(Vec3::new(0.0, 1.0, 0.0)))
        .unwrap();

    let ball = core
        .instantiate_dynamic(scene, collection, 1, Transform::identity())
        .unwrap();
    assert!(core
        .set_kinematic_target(ball, Transform::identity())
        .is_err());
}

#[test]
fn malformed_bundles_are_parse_errors() {
    let (mut core, physics, cooking, _) = world();
    for json in [
        "not json at all",
        r#"{"formatVersion": 2, "actors": []}"#,
        r#"{"formatVersion": 1, "actors": [{"shapes": []}]}"#,
    ] {
        assert!(matches!(
            core.load_collection_from_memory(json.as_bytes(), physics, cooking),
            Err(EngineError::Parse(_))
        ));
    }
}
